//! Error type shared by `Vector` and `ChainedHashMap`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Insert of a key that is already present. The table is unchanged.
    #[error("key already present")]
    DuplicateKey,

    /// Erase of a key that is not present.
    #[error("key not found")]
    NotFound,

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Backing storage could not be (re)allocated. Whatever structural change
    /// was in progress has been rolled back.
    #[error("allocation of {bytes} bytes failed")]
    OutOfMemory { bytes: usize },
}

impl Error {
    pub fn out_of_memory(bytes: usize) -> Self {
        Self::OutOfMemory { bytes }
    }

    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// True for failures caused by resource exhaustion rather than by the
    /// arguments of the call.
    pub fn is_alloc_failure(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        assert_eq!(
            Error::out_of_bounds(4, 2).to_string(),
            "index 4 out of bounds for length 2"
        );
        assert_eq!(
            Error::out_of_memory(128).to_string(),
            "allocation of 128 bytes failed"
        );
    }

    #[test]
    fn only_oom_is_alloc_failure() {
        assert!(Error::out_of_memory(1).is_alloc_failure());
        assert!(!Error::DuplicateKey.is_alloc_failure());
        assert!(!Error::NotFound.is_alloc_failure());
        assert!(!Error::out_of_bounds(0, 0).is_alloc_failure());
    }
}
