use getrandom::fill;
use zeroize::Zeroizing;

use super::{MAX_SALT_LEN, alphabet};
use crate::error::{Error, Result};

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| Error::RandomnessUnavailable)
}

/// Generate a fresh 16-character salt.
///
/// 16 random bytes are encoded and the result cut to 16 characters, which
/// matches the salts already stored by existing deployments.
pub fn generate_salt() -> Result<String> {
    let mut raw = Zeroizing::new([0u8; MAX_SALT_LEN]);
    secure_random(raw.as_mut_slice())?;

    let mut salt = alphabet::encode(raw.as_slice());
    salt.truncate(MAX_SALT_LEN);
    Ok(salt)
}

/// Checks length and character set of a salt taken from a record.
pub fn validate_salt(salt: &str) -> Result<()> {
    if salt.len() > MAX_SALT_LEN || !salt.bytes().all(alphabet::contains) {
        return Err(Error::InvalidSalt);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_salt_is_16_alphabet_chars() {
        let salt = generate_salt().unwrap();
        assert_eq!(salt.len(), MAX_SALT_LEN);
        assert!(validate_salt(&salt).is_ok());
    }

    #[test]
    fn generated_salts_differ() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }

    #[test]
    fn validate_accepts_short_and_empty() {
        assert!(validate_salt("").is_ok());
        assert!(validate_salt("saltstring").is_ok());
        assert!(validate_salt("./09AZaz").is_ok());
    }

    #[test]
    fn validate_rejects_long_or_foreign() {
        assert_eq!(
            validate_salt("saltstringsaltstring"),
            Err(Error::InvalidSalt)
        );
        assert_eq!(validate_salt("bad salt"), Err(Error::InvalidSalt));
        assert_eq!(validate_salt("ab+c"), Err(Error::InvalidSalt));
    }
}
