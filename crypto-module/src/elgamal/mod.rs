//! Block-wise ElGamal encryption over byte buffers.
//!
//! Ciphertext layout, every field `max_cipher_block_size` bytes, little-endian, zero-padded:
//!
//! ```text
//! [ r = g^k mod p ][ c_1 ][ c_2 ] ...
//! ```
//!
//! Plaintext is cut into chunks of `max_plain_block_size` bytes. Decryption always yields
//! whole plaintext blocks, so zero bytes padding the final chunk are not stripped; the
//! caller must know the original length.

pub mod file;

use crate::errors::CryptoModuleError;
use crate::keypair::{ElGamalKey, KeyKind};
use crate::random::generate_big_integer_with;
use crate::ring::{from_bytes_le, to_fixed_width_le};

use num_bigint::BigUint;
use num_traits::{One, Zero};

use rand::{CryptoRng, RngCore};

impl ElGamalKey {
    /// Encrypts `plaintext` with this public key.
    ///
    /// # Errors
    ///
    /// * `CryptoModuleError::WrongKeyKind` if this is a private key.
    /// * `CryptoModuleError::EmptyOrInvalidInput` if `plaintext` is empty or all zero bytes.
    /// * `CryptoModuleError::BadParameters` on any arithmetic or encoding failure.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoModuleError> {
        self.encrypt_with(&mut rand::rng(), plaintext)
    }

    /// Same as [`ElGamalKey::encrypt`] but drawing the ephemeral exponent from `rng`.
    pub fn encrypt_with<R>(&self, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>, CryptoModuleError>
    where
        R: RngCore + CryptoRng,
    {
        self.require_kind(KeyKind::Public)?;
        check_input(plaintext, "plaintext")?;

        self.encrypt_segment(rng, plaintext)
    }

    /// Decrypts `ciphertext` with this private key.
    ///
    /// # Errors
    ///
    /// * `CryptoModuleError::WrongKeyKind` if this is a public key.
    /// * `CryptoModuleError::EmptyOrInvalidInput` if `ciphertext` is empty, all zero bytes,
    ///   or shorter than one block.
    /// * `CryptoModuleError::BadParameters` if the ciphertext does not decode under this key.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoModuleError> {
        self.require_kind(KeyKind::Private)?;
        check_input(ciphertext, "ciphertext")?;

        self.decrypt_segment(ciphertext)
    }

    /// Encrypts one self-contained segment: a fresh `r` block followed by the data blocks.
    pub(crate) fn encrypt_segment<R>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoModuleError>
    where
        R: RngCore + CryptoRng,
    {
        if plaintext.is_empty() {
            return Err(CryptoModuleError::EmptyOrInvalidInput(
                "plaintext is empty".to_string(),
            ));
        }

        let params = self.parameters();
        let ring = params.ring();
        let width = self.max_cipher_block_size();

        // k in [2, p - 3]
        let upper = params.p() - BigUint::from(2u32);
        let k = generate_big_integer_with(rng, &BigUint::from(2u32), &upper)
            .map_err(|e| bad_parameters("ephemeral exponent", e))?;

        let r = ring.pow(params.g(), &k);
        let shared = ring.pow(self.scalar(), &k);

        let block_count = plaintext.len().div_ceil(self.max_plain_block_size());
        let mut result = Vec::with_capacity((block_count + 1) * width);
        result.extend(to_fixed_width_le(&r, width).map_err(|e| bad_parameters("r block", e))?);

        for chunk in plaintext.chunks(self.max_plain_block_size()) {
            let open = from_bytes_le(chunk);
            let cipher = ring.mul(&open, &shared);
            result.extend(
                to_fixed_width_le(&cipher, width).map_err(|e| bad_parameters("cipher block", e))?,
            );
        }

        Ok(result)
    }

    /// Decrypts one segment produced by [`ElGamalKey::encrypt_segment`].
    pub(crate) fn decrypt_segment(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoModuleError> {
        let width = self.max_cipher_block_size();
        if ciphertext.len() < width {
            return Err(CryptoModuleError::EmptyOrInvalidInput(format!(
                "ciphertext of {} bytes is shorter than one {}-byte block",
                ciphertext.len(),
                width
            )));
        }

        let (head, body) = ciphertext.split_at(width);
        if body.len() % width != 0 {
            return Err(CryptoModuleError::BadParameters(format!(
                "ciphertext ends with a partial block of {} bytes",
                body.len() % width
            )));
        }

        let params = self.parameters();
        let ring = params.ring();

        let r = from_bytes_le(head);
        if r.is_zero() || r >= *params.p() {
            return Err(CryptoModuleError::BadParameters(
                "r block is outside [1, p)".to_string(),
            ));
        }

        // r^(p - 1 - x) = (y^k)^-1 by Fermat's little theorem
        let exponent = params.p() - BigUint::one() - self.scalar();
        let decrypt_const = ring.pow(&r, &exponent);

        let open_width = self.max_plain_block_size();
        let mut result = Vec::with_capacity(body.len() / width * open_width);
        for block in body.chunks_exact(width) {
            let cipher = from_bytes_le(block);
            let open = ring.mul(&cipher, &decrypt_const);
            result.extend(
                to_fixed_width_le(&open, open_width)
                    .map_err(|e| bad_parameters("recovered block", e))?,
            );
        }

        Ok(result)
    }
}

fn check_input(data: &[u8], what: &str) -> Result<(), CryptoModuleError> {
    if data.is_empty() {
        return Err(CryptoModuleError::EmptyOrInvalidInput(format!("{} is empty", what)));
    }

    if data.iter().all(|&b| b == 0) {
        return Err(CryptoModuleError::EmptyOrInvalidInput(format!(
            "{} is all zero bytes",
            what
        )));
    }

    Ok(())
}

fn bad_parameters(context: &str, source: CryptoModuleError) -> CryptoModuleError {
    CryptoModuleError::BadParameters(format!("{}: {}", context, source))
}
