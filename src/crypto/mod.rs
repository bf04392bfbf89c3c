//! The SHA-512 crypt primitive.
//!
//! Provides the alphabet codec, the digest engine, rounds validation and
//! salt generation.

pub mod alphabet;
pub mod digest;
pub mod rounds;
pub mod salt;

pub use digest::{crypt, digest, encode_digest};
pub use rounds::Rounds;
pub use salt::{generate_salt, validate_salt};

/// Length of a raw SHA-512 digest (64 bytes).
pub const DIGEST_LEN: usize = 64;
/// Length of an encoded digest (86 characters).
pub const ENCODED_DIGEST_LEN: usize = alphabet::encoded_len(DIGEST_LEN);
/// Maximum salt length in encoded characters.
pub const MAX_SALT_LEN: usize = 16;
/// Lowest accepted rounds value.
pub const MIN_ROUNDS: u32 = 1000;
/// Highest accepted rounds value.
pub const MAX_ROUNDS: u32 = 999_999_999;
/// Rounds used when a record carries no `rounds=` segment.
pub const DEFAULT_ROUNDS: u32 = 5000;

/// Compares two byte strings in time independent of where they differ.
///
/// Only the lengths, which are public for encoded records, short-circuit.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
