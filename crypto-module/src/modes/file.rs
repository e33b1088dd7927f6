//! File encryption for [`ModeOfOperation`] sessions.
//!
//! Files are read in chunks of `BLOCK_SIZE * file_chunk_blocks` bytes and the chaining state
//! carries across chunks, so the output is byte-for-byte what [`ModeOfOperation::encrypt`]
//! would produce for the whole file. The IV is not written to the output.

use std::path::Path;

use super::{Direction, ModeOfOperation};
use crate::config::CryptoConfig;
use crate::errors::CryptoModuleError;
use crate::rc6::BLOCK_SIZE;
use crate::stream::transform_file;

impl ModeOfOperation {
    /// Encrypts the file at `input` into `output`.
    ///
    /// `on_progress` receives the percentage of input consumed after every chunk. Returns the
    /// number of bytes written.
    ///
    /// # Errors
    ///
    /// * `CryptoModuleError::InvalidArgument` if `config` gives an empty or oversized chunk;
    ///   no file is touched.
    /// * `CryptoModuleError::Io` if either file cannot be read or written.
    pub fn encrypt_file<P>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        on_progress: P,
    ) -> Result<u64, CryptoModuleError>
    where
        P: FnMut(u8),
    {
        self.encrypt_file_with(input, output, &CryptoConfig::default(), on_progress)
    }

    pub fn encrypt_file_with<P>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        config: &CryptoConfig,
        on_progress: P,
    ) -> Result<u64, CryptoModuleError>
    where
        P: FnMut(u8),
    {
        self.process_file(Direction::Encrypt, input.as_ref(), output.as_ref(), config, on_progress)
    }

    /// Decrypts a file produced by [`ModeOfOperation::encrypt_file`] under the same key, mode
    /// and IV.
    ///
    /// # Errors
    ///
    /// * `CryptoModuleError::InvalidArgument` if `config` gives an empty or oversized chunk;
    ///   no file is touched.
    /// * `CryptoModuleError::Io` if either file cannot be read or written.
    pub fn decrypt_file<P>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        on_progress: P,
    ) -> Result<u64, CryptoModuleError>
    where
        P: FnMut(u8),
    {
        self.decrypt_file_with(input, output, &CryptoConfig::default(), on_progress)
    }

    pub fn decrypt_file_with<P>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        config: &CryptoConfig,
        on_progress: P,
    ) -> Result<u64, CryptoModuleError>
    where
        P: FnMut(u8),
    {
        self.process_file(Direction::Decrypt, input.as_ref(), output.as_ref(), config, on_progress)
    }

    fn process_file<P>(
        &self,
        direction: Direction,
        input: &Path,
        output: &Path,
        config: &CryptoConfig,
        on_progress: P,
    ) -> Result<u64, CryptoModuleError>
    where
        P: FnMut(u8),
    {
        let chunk_size = config.chunk_size(BLOCK_SIZE, 0)?;
        log::debug!("{:?} {} in {} mode", direction, input.display(), self.kind());

        let mut chain = self.chain(direction);
        transform_file(
            input,
            output,
            chunk_size,
            |chunk| Ok(chain.process(chunk)),
            on_progress,
        )
    }
}
