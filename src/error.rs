use thiserror::Error;

/// Failure kinds produced while parsing, generating or verifying a hash.
///
/// Parse errors describe a corrupt or foreign record and are never worth
/// retrying. [`Error::Mismatch`] is the ordinary "wrong password" outcome.
/// [`Error::RandomnessUnavailable`] is the only transient condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("hashes must start with '$', but the record started with {0:?}")]
    MalformedPrefix(char),

    #[error("crypt algorithm version must be '6', but the record has {0:?}")]
    UnsupportedVersion(char),

    #[error("salt must start with '$', but the record has {0:?}")]
    MalformedSaltDelimiter(char),

    #[error("record too short to be a sha512-crypt hash")]
    TruncatedRecord,

    #[error("rounds {0} is outside allowed range (1000, 999999999)")]
    RoundsOutOfRange(i64),

    #[error("salt must be at most 16 characters from the crypt alphabet")]
    InvalidSalt,

    #[error("hashed password is not the hash of the given password")]
    Mismatch,

    #[error("OS random generator unavailable")]
    RandomnessUnavailable,
}

impl Error {
    /// `true` when the secret simply did not match a well-formed record.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Error::Mismatch)
    }

    /// `true` for every kind that points at a corrupt or foreign record.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::MalformedPrefix(_)
                | Error::UnsupportedVersion(_)
                | Error::MalformedSaltDelimiter(_)
                | Error::TruncatedRecord
                | Error::RoundsOutOfRange(_)
                | Error::InvalidSalt
        )
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RandomnessUnavailable)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
