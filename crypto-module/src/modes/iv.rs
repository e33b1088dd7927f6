use crate::errors::CryptoModuleError;
use crate::rc6::{BLOCK_SIZE, Block};

use rand::{CryptoRng, RngCore};

/// Initialization vector for the chained modes, one block wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iv(Block);

impl Iv {
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with<R>(rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        let mut bytes = [0u8; BLOCK_SIZE];
        rng.fill_bytes(&mut bytes);
        Iv(bytes)
    }

    /// Uses caller-supplied bytes, e.g. the IV a file was encrypted under.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, CryptoModuleError> {
        let block: Block = bytes.try_into().map_err(|_| {
            CryptoModuleError::InvalidArgument(format!(
                "IV must be {} bytes, got {}",
                BLOCK_SIZE,
                bytes.len()
            ))
        })?;

        Ok(Iv(block))
    }

    pub fn as_bytes(&self) -> &Block {
        &self.0
    }
}

impl From<Block> for Iv {
    fn from(block: Block) -> Self {
        Iv(block)
    }
}
