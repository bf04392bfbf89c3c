//! JSON configuration file holding the stored admin credential.
//!
//! Keys use the same PascalCase names as the mail admin configuration, so
//! an existing file can be pointed at directly. Keys this crate does not
//! know about are carried through a save untouched.

use anyhow::{Context, Result};
use chrono::Local;
use directories::ProjectDirs;
use getrandom::fill;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crypto::Rounds;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rounds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password_changed: Option<String>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

impl Config {
    /// Reads and validates the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// names an out-of-range `Rounds` value.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_slice(&data)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.rounds()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields an empty config.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Writes the configuration to `path` atomically.
    ///
    /// Data goes to a randomly named sibling first, is synced, then renamed
    /// over the target. Parent directories are created as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut data = serde_json::to_vec_pretty(self)?;
        data.push(b'\n');

        let tmp_path = random_tmp_path(path)?;
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .context("failed to create temporary file")?;
        tmp_file.write_all(&data)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).context("failed to replace config file");
        }

        if let Some(parent) = path.parent() {
            File::open(parent)?.sync_all()?;
        }

        Ok(())
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, username: &str) {
        self.username = Some(username.to_string());
    }

    /// The stored encoded hash, if any.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Replaces the stored hash and stamps the change time.
    pub fn set_password(&mut self, encoded: String) {
        self.password = Some(encoded);
        self.password_changed = Some(Local::now().to_string());
    }

    pub fn password_changed(&self) -> Option<&str> {
        self.password_changed.as_deref()
    }

    /// Configured rounds, or the default when unset.
    pub fn rounds(&self) -> Result<Rounds> {
        match self.rounds {
            Some(n) => Rounds::new(n).context("invalid Rounds in config"),
            None => Ok(Rounds::default()),
        }
    }

    pub fn set_rounds(&mut self, rounds: Rounds) {
        self.rounds = Some(rounds.get());
    }
}

/// `<platform config dir>/sha512crypt/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "sha512crypt")
        .context("could not determine platform directories")?;

    Ok(project_dirs.config_dir().join("config.json"))
}

/// Format: `filename.tmp.<randomhex>`
fn random_tmp_path(path: &Path) -> Result<PathBuf> {
    let mut buf = [0u8; 8];
    fill(&mut buf).map_err(|_| anyhow::anyhow!("OS random generator unavailable"))?;

    let suffix: String = buf.iter().map(|b| format!("{b:02x}")).collect();
    let file_name = path
        .file_name()
        .context("config path has no file name")?
        .to_string_lossy();

    Ok(path.with_file_name(format!("{file_name}.tmp.{suffix}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.set_username("admin");
        config.set_password("$6$salt$digest".to_string());
        config.set_rounds(Rounds::new(10_000).unwrap());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.username(), Some("admin"));
        assert_eq!(loaded.password(), Some("$6$salt$digest"));
        assert_eq!(loaded.rounds().unwrap().get(), 10_000);
        assert!(loaded.password_changed().is_some());
    }

    #[test]
    fn reads_mail_admin_style_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"Username": "admin", "Password": "$6$blah$blah", "ServerPort": "8080"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.username(), Some("admin"));
        assert_eq!(config.password(), Some("$6$blah$blah"));
        assert!(config.rounds().unwrap().is_default());
    }

    #[test]
    fn unknown_keys_survive_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"Password": "old", "DBName": "mail"}"#).unwrap();

        let mut config = Config::load(&path).unwrap();
        config.set_password("new".to_string());
        config.save(&path).unwrap();

        let raw: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["DBName"], "mail");
        assert_eq!(raw["Password"], "new");
    }

    #[test]
    fn out_of_range_rounds_rejected_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"Rounds": 10}"#).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn load_fails_if_file_does_not_exist() {
        let dir = tempdir().unwrap();
        assert!(Config::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_creates_parent_dirs_and_leaves_no_tmp() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = nested.join("config.json");

        Config::default().save(&path).unwrap();

        let entries: Vec<_> = fs::read_dir(&nested)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], "config.json");
    }

    #[test]
    fn tmp_names_are_unique_siblings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let a = random_tmp_path(&path).unwrap();
        let b = random_tmp_path(&path).unwrap();

        assert_ne!(a, b);
        assert_eq!(a.parent(), path.parent());
    }
}
