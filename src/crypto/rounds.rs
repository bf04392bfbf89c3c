use crate::error::{Error, Result};

use super::{DEFAULT_ROUNDS, MAX_ROUNDS, MIN_ROUNDS};

/// Iteration count of the mixing loop, validated against
/// [`MIN_ROUNDS`]..=[`MAX_ROUNDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rounds(u32);

impl Default for Rounds {
    fn default() -> Self {
        Self(DEFAULT_ROUNDS)
    }
}

impl Rounds {
    pub fn new(rounds: u32) -> Result<Self> {
        Self::from_i64(i64::from(rounds))
    }

    /// Range check shared with the record parser, which reads signed values.
    pub(crate) fn from_i64(rounds: i64) -> Result<Self> {
        if rounds < i64::from(MIN_ROUNDS) || rounds > i64::from(MAX_ROUNDS) {
            return Err(Error::RoundsOutOfRange(rounds));
        }
        Ok(Self(rounds as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Default-rounds records omit the `rounds=N$` segment.
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_ROUNDS
    }
}

impl TryFrom<u32> for Rounds {
    type Error = Error;

    fn try_from(rounds: u32) -> Result<Self> {
        Self::new(rounds)
    }
}

impl std::fmt::Display for Rounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
