//! Textual hash record handling.
//!
//! Provides version-aware parsing and serialization of
//! `$<version>$[rounds=N$]<salt>$<digest>` records.

use std::fmt;
use std::str::FromStr;

use crate::crypto::{Rounds, validate_salt};
use crate::error::{Error, Result};

pub mod v6;

/// Leading marker of every record.
pub const PREFIX: char = '$';
/// Separator between the header, salt and digest.
pub const SEPARATOR: char = '$';
/// Latest record version
pub const CURRENT_VERSION: char = v6::VERSION;

/// A parsed `$6$` hash record.
///
/// Salt and digest are kept exactly as they appear in the text; neither is
/// decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    rounds: Rounds,
    salt: String,
    digest: String,
}

impl HashRecord {
    /// Builds a record, checking the salt against the crypt alphabet.
    pub fn new(rounds: Rounds, salt: impl Into<String>, digest: impl Into<String>) -> Result<Self> {
        let salt = salt.into();
        validate_salt(&salt)?;
        Ok(Self {
            rounds,
            salt,
            digest: digest.into(),
        })
    }

    pub fn version(&self) -> char {
        CURRENT_VERSION
    }

    pub fn rounds(&self) -> Rounds {
        self.rounds
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Same rounds and salt, different digest.
    pub(crate) fn with_digest(&self, digest: String) -> Self {
        Self {
            rounds: self.rounds,
            salt: self.salt.clone(),
            digest,
        }
    }
}

impl fmt::Display for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}

impl FromStr for HashRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parses a hash record.
///
/// Checks the `$`, the version tag and the salt delimiter in that order,
/// then hands the remainder to the version's grammar.
///
/// # Errors
///
/// Returns an error if:
/// - The text ends before the three header characters
/// - The first character is not `$`
/// - The version tag is not supported
/// - The third character is not `$`
/// - The versioned body is malformed
pub fn parse(text: &str) -> Result<HashRecord> {
    let mut chars = text.chars();

    match chars.next() {
        None => return Err(Error::TruncatedRecord),
        Some(PREFIX) => {}
        Some(c) => return Err(Error::MalformedPrefix(c)),
    }

    let version = chars.next().ok_or(Error::TruncatedRecord)?;
    if version != v6::VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    match chars.next() {
        None => return Err(Error::TruncatedRecord),
        Some(SEPARATOR) => {}
        Some(c) => return Err(Error::MalformedSaltDelimiter(c)),
    }

    v6::parse(chars.as_str())
}

/// Serializes a record to its canonical text.
pub fn serialize(record: &HashRecord) -> String {
    v6::serialize(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLMINE: &str = "$6$bpKfXE60l8fkqZtO$Um5EJkQJMczwkJU5Flonw7n244dJIhTbYOgu507juLnN3H/i433cd0i/uP25Bfw9m0Ce7PqgmY93JxYhC1Lp1.";

    #[test]
    fn record_roundtrip() {
        let record = parse(ALLMINE).unwrap();
        assert_eq!(record.version(), '6');
        assert_eq!(record.rounds(), Rounds::default());
        assert_eq!(record.salt(), "bpKfXE60l8fkqZtO");
        assert_eq!(record.digest().len(), 86);
        assert_eq!(serialize(&record), ALLMINE);
        assert_eq!(parse(&serialize(&record)).unwrap(), record);
    }

    #[test]
    fn display_and_from_str_agree() {
        let record: HashRecord = ALLMINE.parse().unwrap();
        assert_eq!(record.to_string(), ALLMINE);
    }

    #[test]
    fn invalid_prefix_fails() {
        assert_eq!(parse("%6$bla$bla"), Err(Error::MalformedPrefix('%')));
    }

    #[test]
    fn unsupported_version_fails() {
        assert_eq!(parse("$3$bla$bla"), Err(Error::UnsupportedVersion('3')));
        assert_eq!(parse("$5$bla$bla"), Err(Error::UnsupportedVersion('5')));
    }

    #[test]
    fn invalid_salt_delimiter_fails() {
        assert_eq!(parse("$6#bla$bla"), Err(Error::MalformedSaltDelimiter('#')));
    }

    #[test]
    fn too_short_fails() {
        assert_eq!(parse(""), Err(Error::TruncatedRecord));
        assert_eq!(parse("$"), Err(Error::TruncatedRecord));
        assert_eq!(parse("$6"), Err(Error::TruncatedRecord));
        assert_eq!(parse("$6$"), Err(Error::TruncatedRecord));
        assert_eq!(parse("$6$saltonly"), Err(Error::TruncatedRecord));
    }

    #[test]
    fn new_rejects_bad_salt() {
        assert_eq!(
            HashRecord::new(Rounds::default(), "not a salt", "x"),
            Err(Error::InvalidSalt)
        );
    }
}
