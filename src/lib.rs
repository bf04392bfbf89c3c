//! glibc-compatible SHA-512 crypt (`$6$`) password hashing.
//!
//! Callers need two operations: [`generate_from_secret`] when a credential
//! is created or changed, and [`verify_secret`] when it is presented again.
//! Every failure of [`verify_secret`] should be treated as an
//! authentication failure; [`Error`] keeps the kinds apart so they can be
//! logged separately.

mod config;
pub mod crypto;
mod error;
pub mod format;

pub use crate::config::{Config, default_config_path};
pub use crate::crypto::Rounds;
pub use crate::error::{Error, Result};
pub use crate::format::HashRecord;

use tracing::{debug, instrument};

/// Hashes `secret` with a fresh random salt and the default rounds.
///
/// # Errors
///
/// Fails only with [`Error::RandomnessUnavailable`].
pub fn generate_from_secret(secret: impl AsRef<[u8]>) -> Result<String> {
    generate_with_rounds(secret, Rounds::default())
}

/// Hashes `secret` with a fresh random salt and the given rounds.
#[instrument(skip_all, fields(rounds = rounds.get()))]
pub fn generate_with_rounds(secret: impl AsRef<[u8]>, rounds: Rounds) -> Result<String> {
    let salt = crypto::generate_salt()?;
    let digest = crypto::crypt(secret.as_ref(), salt.as_bytes(), rounds.get());

    let record = HashRecord::new(rounds, salt, digest)?;
    debug!("generated hash record");

    Ok(format::serialize(&record))
}

/// Checks `secret` against a previously generated `encoded` record.
///
/// The stored and recomputed records are compared in full, in constant time.
///
/// # Errors
///
/// Parse errors are returned unchanged. A well-formed record that does not
/// match yields [`Error::Mismatch`].
#[instrument(skip_all)]
pub fn verify_secret(encoded: &str, secret: impl AsRef<[u8]>) -> Result<()> {
    let stored = format::parse(encoded).inspect_err(|e| {
        debug!(error = %e, "rejecting malformed hash record");
    })?;

    let digest = crypto::crypt(
        secret.as_ref(),
        stored.salt().as_bytes(),
        stored.rounds().get(),
    );
    let recomputed = stored.with_digest(digest);

    let expected = format::serialize(&stored);
    let actual = format::serialize(&recomputed);

    if crypto::constant_time_eq(expected.as_bytes(), actual.as_bytes()) {
        Ok(())
    } else {
        debug!("secret does not match hash record");
        Err(Error::Mismatch)
    }
}
