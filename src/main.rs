use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
mod auth;
use sha512crypt::{Config, HashRecord, Rounds, default_config_path};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn resolve_config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => default_config_path(),
    }
}

/// Rounds from the flag, else from the config file if one exists.
fn resolve_rounds(flag: Option<u32>, config_path: Option<PathBuf>) -> Result<Rounds> {
    if let Some(n) = flag {
        return Ok(Rounds::new(n)?);
    }
    let path = resolve_config_path(config_path)?;
    Config::load_or_default(&path)?.rounds()
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG=
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Parser)]
#[command(name = "sha512crypt")]
#[command(version, about = "Generate and verify SHA-512 crypt ($6$) password hashes.")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, global = true, value_name = "PATH", env = "SHA512CRYPT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints a new hash for the given password
    Hash {
        /// Mixing rounds, 1000..=999999999 (default: config value or 5000)
        #[arg(long)]
        rounds: Option<u32>,
    },

    /// Checks a password against a hash, or against the stored one
    Verify {
        /// Encoded hash; read from the config file when omitted
        hash: Option<String>,
    },

    /// Hashes a new password and stores it in the config file
    Passwd {
        /// Name stored next to the password
        #[arg(long)]
        username: Option<String>,

        /// Mixing rounds, also remembered in the config file
        #[arg(long)]
        rounds: Option<u32>,
    },

    /// Shows information about the config file
    Info,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Hash { rounds } => {
            let rounds = resolve_rounds(rounds, args.config.clone())?;
            let password = auth::read_new_password_with_confirmation()?;
            let hash = sha512crypt::generate_with_rounds(password.as_bytes(), rounds)?;
            println!("{hash}");
        }

        Commands::Verify { hash } => {
            let stored = match hash {
                Some(h) => h,
                None => {
                    let path = resolve_config_path(args.config.clone())?;
                    let config = Config::load(&path)?;
                    config
                        .password()
                        .context("no password stored in config")?
                        .to_string()
                }
            };

            let password = auth::read_password()?;
            if let Err(e) = sha512crypt::verify_secret(&stored, password.as_bytes()) {
                debug!(
                    error = %e,
                    malformed = e.is_malformed(),
                    mismatch = e.is_mismatch(),
                    "verification rejected"
                );
                bail!("verification failed");
            }
            println!("password verified");
        }

        Commands::Passwd { username, rounds } => {
            let path = resolve_config_path(args.config.clone())?;
            let mut config = Config::load_or_default(&path)?;

            let rounds = match rounds {
                Some(n) => {
                    let rounds = Rounds::new(n)?;
                    config.set_rounds(rounds);
                    rounds
                }
                None => config.rounds()?,
            };
            if let Some(name) = username {
                config.set_username(&name);
            }

            let password = auth::read_new_password_with_confirmation()?;
            let hash = sha512crypt::generate_with_rounds(password.as_bytes(), rounds)?;
            drop(password);

            config.set_password(hash);
            config.save(&path)?;
            println!("password changed");
        }

        Commands::Info => {
            let path = resolve_config_path(args.config.clone())?;
            let config = Config::load(&path)?;

            println!("Config:    {}", path.display());
            println!("Username:  {}", config.username().unwrap_or("-"));
            println!("Rounds:    {}", config.rounds()?);

            match config.password() {
                Some(stored) => {
                    println!("Password:  stored");
                    match stored.parse::<HashRecord>() {
                        Ok(record) => {
                            println!("  Scheme:  ${}$", record.version());
                            println!("  Rounds:  {}", record.rounds());
                            println!("  Salt:    {} chars", record.salt().len());
                        }
                        Err(e) => println!("  Invalid: {e}"),
                    }
                    if let Some(changed) = config.password_changed() {
                        println!("  Changed: {changed}");
                    }
                }
                None => println!("Password:  not set"),
            }
        }
    }

    Ok(())
}
