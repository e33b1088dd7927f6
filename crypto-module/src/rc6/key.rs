use std::fmt;

use crate::errors::CryptoModuleError;
use crate::random::generate_printable_key_with;

use rand::{CryptoRng, RngCore};

use serde::{Deserialize, Serialize};

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Supported RC6 key lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum KeySize {
    Bits128,
    Bits192,
    Bits256,
}

impl KeySize {
    pub fn bits(self) -> u32 {
        match self {
            KeySize::Bits128 => 128,
            KeySize::Bits192 => 192,
            KeySize::Bits256 => 256,
        }
    }

    pub fn byte_len(self) -> usize {
        self.bits() as usize / 8
    }

    /// Number of 32-bit words the key is loaded into.
    pub fn word_count(self) -> usize {
        self.byte_len() / 4
    }
}

impl TryFrom<u32> for KeySize {
    type Error = CryptoModuleError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            128 => Ok(KeySize::Bits128),
            192 => Ok(KeySize::Bits192),
            256 => Ok(KeySize::Bits256),
            other => Err(CryptoModuleError::InvalidArgument(format!(
                "Key size must be 128, 192 or 256 bits, got {}",
                other
            ))),
        }
    }
}

impl From<KeySize> for u32 {
    fn from(size: KeySize) -> Self {
        size.bits()
    }
}

/// Secret key material for [`Rc6`](super::Rc6). The bytes are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    #[zeroize(skip)]
    size: KeySize,
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Wraps raw key bytes; their length must match `size`.
    pub fn try_with(size: KeySize, bytes: &[u8]) -> Result<Self, CryptoModuleError> {
        if bytes.len() != size.byte_len() {
            return Err(CryptoModuleError::InvalidArgument(format!(
                "A {}-bit key needs {} bytes, got {}",
                size.bits(),
                size.byte_len(),
                bytes.len()
            )));
        }

        Ok(Self {
            size,
            bytes: bytes.to_vec(),
        })
    }

    /// Uses the UTF-8 bytes of `passphrase` as the key.
    pub fn from_passphrase(size: KeySize, passphrase: &str) -> Result<Self, CryptoModuleError> {
        Self::try_with(size, passphrase.as_bytes())
    }

    /// Generates a random key made of printable ASCII characters.
    pub fn generate(size: KeySize) -> Self {
        Self::generate_with(&mut rand::rng(), size)
    }

    pub fn generate_with<R>(rng: &mut R, size: KeySize) -> Self
    where
        R: RngCore + CryptoRng,
    {
        let text = generate_printable_key_with(rng, size.byte_len());

        Self {
            size,
            bytes: text.into_bytes(),
        }
    }

    pub fn size(&self) -> KeySize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("size", &self.size)
            .field("bytes", &"<redacted>")
            .finish()
    }
}
