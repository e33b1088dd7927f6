use std::path::PathBuf;

use crate::keypair::KeyKind;

#[derive(thiserror::Error, Debug)]
pub enum CryptoModuleError {
    /// Bad argument at a call boundary (bad key size, undersized order, malformed key scalar).
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),
    /// Error when a random range is empty or one of its bounds is zero.
    #[error("InvalidRange: {0}")]
    InvalidRange(String),
    /// Domain-parameter search exhausted its retry budget.
    #[error("GenerationFailed: {0}")]
    GenerationFailed(String),

    #[error("Wrong key kind: expected a {expected} key, got a {actual} key")]
    WrongKeyKind { expected: KeyKind, actual: KeyKind },
    #[error("Block must be exactly 16 bytes, got {0}")]
    InvalidBlockSize(usize),

    #[error("Empty or invalid input: {0}")]
    EmptyOrInvalidInput(String),
    /// Arithmetic or encoding failure inside an asymmetric operation.
    #[error("Bad parameters: {0}")]
    BadParameters(String),

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CryptoModuleError {
    /// Whether the caller may retry the operation after fixing the environment
    /// (e.g. a file held open by another process).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CryptoModuleError::Io { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CryptoModuleError::Io {
            path: path.into(),
            source,
        }
    }
}
