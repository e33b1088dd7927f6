//! File encryption with ElGamal keys.
//!
//! The input is processed in bounded chunks. Each plaintext chunk of
//! `max_plain_block_size * file_chunk_blocks` bytes becomes one self-contained segment with
//! its own `r` block, so decryption reads `max_cipher_block_size * (file_chunk_blocks + 1)`
//! bytes at a time.

use std::path::Path;

use crate::config::CryptoConfig;
use crate::errors::CryptoModuleError;
use crate::keypair::{ElGamalKey, KeyKind};
use crate::stream::transform_file;

use rand::{CryptoRng, RngCore};

impl ElGamalKey {
    /// Encrypts the file at `input` into `output` with this public key.
    ///
    /// `on_progress` is called with the percentage of input consumed after every chunk.
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// * `CryptoModuleError::WrongKeyKind` if this is a private key; no file is touched.
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
        self.encrypt_file_with(
            &mut rand::rng(),
            input,
            output,
            &CryptoConfig::default(),
            on_progress,
        )
    }

    pub fn encrypt_file_with<R, P>(
        &self,
        rng: &mut R,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        config: &CryptoConfig,
        on_progress: P,
    ) -> Result<u64, CryptoModuleError>
    where
        R: RngCore + CryptoRng,
        P: FnMut(u8),
    {
        self.require_kind(KeyKind::Public)?;

        let chunk_size = config.chunk_size(self.max_plain_block_size(), 0)?;
        transform_file(
            input.as_ref(),
            output.as_ref(),
            chunk_size,
            |chunk| self.encrypt_segment(&mut *rng, chunk),
            on_progress,
        )
    }

    /// Decrypts a file produced by [`ElGamalKey::encrypt_file`] with this private key.
    ///
    /// # Errors
    ///
    /// * `CryptoModuleError::WrongKeyKind` if this is a public key; no file is touched.
    /// * `CryptoModuleError::Io` if either file cannot be read or written.
    /// * `CryptoModuleError::BadParameters` if a segment does not decode under this key.
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
        self.require_kind(KeyKind::Private)?;

        // one extra block per segment for `r`
        let chunk_size = config.chunk_size(self.max_cipher_block_size(), 1)?;
        transform_file(
            input.as_ref(),
            output.as_ref(),
            chunk_size,
            |segment| self.decrypt_segment(segment),
            on_progress,
        )
    }
}
