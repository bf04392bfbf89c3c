//! The `crypt(3)` base64 variant.
//!
//! Bytes are consumed three at a time as a little-endian word and emitted
//! six bits at a time, least significant first. A trailing 2-byte group
//! yields 3 characters and a trailing 1-byte group yields 2. There is no
//! padding. This is not interchangeable with RFC 4648 base64.

/// `.` = 0, `/` = 1, digits 2..=11, `A-Z` 12..=37, `a-z` 38..=63.
pub const ALPHABET: &[u8; 64] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of characters produced for `len` input bytes.
pub const fn encoded_len(len: usize) -> usize {
    (len * 8).div_ceil(6)
}

/// Returns `true` if `c` belongs to [`ALPHABET`].
pub fn contains(c: u8) -> bool {
    matches!(c, b'.' | b'/' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z')
}

pub fn encode(src: &[u8]) -> String {
    let mut out = String::with_capacity(encoded_len(src.len()));

    for chunk in src.chunks(3) {
        let (mut w, count) = match *chunk {
            [b0, b1, b2] => (u32::from(b0) | (u32::from(b1) << 8) | (u32::from(b2) << 16), 4),
            [b0, b1] => (u32::from(b0) | (u32::from(b1) << 8), 3),
            [b0] => (u32::from(b0), 2),
            _ => unreachable!("chunks(3) yields 1..=3 bytes"),
        };

        for _ in 0..count {
            out.push(char::from(ALPHABET[(w & 0x3f) as usize]));
            w >>= 6;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_order() {
        assert_eq!(ALPHABET[0], b'.');
        assert_eq!(ALPHABET[1], b'/');
        assert_eq!(ALPHABET[2], b'0');
        assert_eq!(ALPHABET[11], b'9');
        assert_eq!(ALPHABET[12], b'A');
        assert_eq!(ALPHABET[37], b'Z');
        assert_eq!(ALPHABET[38], b'a');
        assert_eq!(ALPHABET[63], b'z');
    }

    #[test]
    fn contains_matches_table() {
        for c in 0u8..=255 {
            assert_eq!(contains(c), ALPHABET.contains(&c), "byte {c}");
        }
    }

    #[test]
    fn full_group_is_little_endian() {
        // w = 0x030201 -> 6-bit digits 1, 8, 48, 0
        assert_eq!(encode(&[0x01, 0x02, 0x03]), "/6k.");
    }

    #[test]
    fn short_tail_groups() {
        assert_eq!(encode(&[0xff]), "z1");
        assert_eq!(encode(&[0xff, 0xff]), "zzD");
        assert_eq!(encode(&[0x00, 0x00, 0x00, 0x00]), "......");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn digest_sized_input_yields_86_chars() {
        assert_eq!(encode(&[0u8; 64]).len(), 86);
        assert_eq!(encoded_len(64), 86);
        assert_eq!(encoded_len(16), 22);
    }
}
