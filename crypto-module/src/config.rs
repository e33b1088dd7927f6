//! Runtime tuning knobs shared by parameter generation and file streaming.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::CryptoModuleError;
use crate::prime::DEFAULT_MILLER_RABIN_ROUNDS;

/// Largest accepted `file_chunk_blocks`; keeps one chunk buffer well under a gigabyte.
pub const MAX_FILE_CHUNK_BLOCKS: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Miller–Rabin rounds used while searching for safe primes.
    pub miller_rabin_rounds: u32,
    /// Upper bound on `q` candidates drawn before giving up on a safe prime.
    pub max_prime_attempts: u64,
    /// Upper bound on generator candidates drawn for a fixed `p`.
    pub max_generator_attempts: u64,
    /// Number of cipher blocks processed per file chunk.
    pub file_chunk_blocks: usize,
    /// ECB inputs with at least this many blocks are split across worker threads.
    pub ecb_parallel_threshold: usize,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            miller_rabin_rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            max_prime_attempts: 1_000_000,
            max_generator_attempts: 10_000,
            file_chunk_blocks: 1024,
            ecb_parallel_threshold: 4096,
        }
    }
}

impl CryptoConfig {
    /// Parses a config from JSON. Missing fields fall back to [`CryptoConfig::default`].
    ///
    /// # Example
    ///
    /// ```
    /// # use crypto_module::config::CryptoConfig;
    /// let config = CryptoConfig::from_json_str(r#"{ "file_chunk_blocks": 8 }"#).unwrap();
    /// assert_eq!(config.file_chunk_blocks, 8);
    /// assert_eq!(config.miller_rabin_rounds, 40);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, CryptoModuleError> {
        let config: CryptoConfig = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CryptoModuleError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| CryptoModuleError::io(path, e))?;

        Self::from_json_str(&raw)
    }

    /// Checks every knob against its accepted range.
    ///
    /// The fields are public, so the file entry points call this again before using them.
    pub fn validate(&self) -> Result<(), CryptoModuleError> {
        if self.miller_rabin_rounds == 0 {
            return Err(CryptoModuleError::InvalidArgument(
                "miller_rabin_rounds must be > 0".to_string(),
            ));
        }

        if self.file_chunk_blocks == 0 || self.file_chunk_blocks > MAX_FILE_CHUNK_BLOCKS {
            return Err(CryptoModuleError::InvalidArgument(format!(
                "file_chunk_blocks must be in [1, {}], got {}",
                MAX_FILE_CHUNK_BLOCKS, self.file_chunk_blocks
            )));
        }

        if self.max_prime_attempts == 0 || self.max_generator_attempts == 0 {
            return Err(CryptoModuleError::InvalidArgument(
                "Attempt caps must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Byte size of one file chunk holding `file_chunk_blocks + extra_blocks` blocks of
    /// `block_size` bytes.
    pub(crate) fn chunk_size(
        &self,
        block_size: usize,
        extra_blocks: usize,
    ) -> Result<usize, CryptoModuleError> {
        self.validate()?;

        self.file_chunk_blocks
            .checked_add(extra_blocks)
            .and_then(|blocks| blocks.checked_mul(block_size))
            .filter(|&size| size > 0)
            .ok_or_else(|| {
                CryptoModuleError::InvalidArgument(format!(
                    "Chunk of {} blocks of {} bytes is out of range",
                    self.file_chunk_blocks, block_size
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = CryptoConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CryptoConfig::default());
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let result = CryptoConfig::from_json_str(r#"{ "file_chunk_blocks": 0 }"#);
        assert!(matches!(result, Err(CryptoModuleError::InvalidArgument(_))));
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let result = CryptoConfig::from_json_str(r#"{ "file_chunk_blocks": 1152921504606846976 }"#);
        assert!(matches!(result, Err(CryptoModuleError::InvalidArgument(_))));

        let at_cap = format!(r#"{{ "file_chunk_blocks": {} }}"#, MAX_FILE_CHUNK_BLOCKS);
        assert!(CryptoConfig::from_json_str(&at_cap).is_ok());
    }

    #[test]
    fn test_chunk_size_revalidates_public_fields() {
        let config = CryptoConfig {
            file_chunk_blocks: 0,
            ..CryptoConfig::default()
        };
        assert!(matches!(
            config.chunk_size(16, 0),
            Err(CryptoModuleError::InvalidArgument(_))
        ));

        let config = CryptoConfig {
            file_chunk_blocks: usize::MAX,
            ..CryptoConfig::default()
        };
        assert!(config.chunk_size(16, 1).is_err());

        let config = CryptoConfig {
            file_chunk_blocks: 4,
            ..CryptoConfig::default()
        };
        assert_eq!(config.chunk_size(3, 1).unwrap(), 15);
        assert!(config.chunk_size(0, 0).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let result = CryptoConfig::from_json_str("{ not json");
        assert!(matches!(
            result,
            Err(CryptoModuleError::SerializationError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CryptoConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.is_recoverable());
    }
}
