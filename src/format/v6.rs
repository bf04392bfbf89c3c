//! Record format v6 (SHA-512 crypt).
//!
//! ```text
//! $6$[rounds=N$]SALT$DIGEST
//! ```
//!
//! The `rounds=N$` segment is omitted when N is the default of 5000, but a
//! record that spells it out still parses to the same value.

use tracing::debug;

use super::{HashRecord, SEPARATOR};
use crate::crypto::Rounds;
use crate::error::{Error, Result};

/// Version tag of this format.
pub const VERSION: char = '6';
/// Full record header.
pub const MAGIC: &str = "$6$";

const ROUNDS_PREFIX: &str = "rounds=";

/// Parses the text following the `$6$` header.
///
/// # Errors
///
/// Returns an error if the rounds segment or the salt is unterminated, if
/// the rounds digits do not parse (reported as [`Error::TruncatedRecord`]),
/// if rounds are out of range, or if the salt is invalid.
pub fn parse(body: &str) -> Result<HashRecord> {
    let (rounds, rest) = parse_rounds(body)?;

    let (salt, digest) = rest
        .split_once(SEPARATOR)
        .ok_or(Error::TruncatedRecord)?;

    debug!(rounds = rounds.get(), salt_len = salt.len(), "parsed hash record");
    HashRecord::new(rounds, salt, digest)
}

fn parse_rounds(body: &str) -> Result<(Rounds, &str)> {
    let Some(tail) = body.strip_prefix(ROUNDS_PREFIX) else {
        return Ok((Rounds::default(), body));
    };

    let (digits, rest) = tail
        .split_once(SEPARATOR)
        .ok_or(Error::TruncatedRecord)?;

    let value: i32 = digits.parse().map_err(|_| Error::TruncatedRecord)?;
    let rounds = Rounds::from_i64(i64::from(value))?;

    Ok((rounds, rest))
}

/// Serializes a record to v6 text.
pub fn serialize(record: &HashRecord) -> String {
    let mut out = String::with_capacity(
        MAGIC.len() + ROUNDS_PREFIX.len() + 10 + record.salt().len() + 1 + record.digest().len(),
    );

    out.push_str(MAGIC);
    if !record.rounds().is_default() {
        out.push_str(ROUNDS_PREFIX);
        out.push_str(&record.rounds().to_string());
        out.push(SEPARATOR);
    }
    out.push_str(record.salt());
    out.push(SEPARATOR);
    out.push_str(record.digest());

    out
}
