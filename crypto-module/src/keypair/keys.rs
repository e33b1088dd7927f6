use std::fmt;
use std::sync::Arc;

use crate::errors::CryptoModuleError;
use crate::params::DomainParameters;
use crate::random::generate_big_integer_with;

use num_bigint::BigUint;
use num_traits::One;

use rand::{CryptoRng, RngCore};

use zeroize::Zeroize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Public => write!(f, "public"),
            KeyKind::Private => write!(f, "private"),
        }
    }
}

/// One half of an ElGamal key pair.
///
/// The public scalar is `y = g^x mod p`, the private scalar is `x`.
/// Block sizes are derived once from the byte length of `p`: a plaintext block keeps one
/// byte of headroom so its integer value always stays below `p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElGamalKey {
    kind: KeyKind,
    scalar: BigUint,
    parameters: Arc<DomainParameters>,
    max_plain_block_size: usize,
    max_cipher_block_size: usize,
}

impl ElGamalKey {
    /// Creates a key, checking the scalar against the parameters.
    ///
    /// # Errors
    ///
    /// Returns `CryptoModuleError::InvalidArgument` if `scalar < 2`, or if a private scalar
    /// is `>= p - 1`, or a public scalar is `>= p`.
    pub fn try_with(
        kind: KeyKind,
        scalar: BigUint,
        parameters: Arc<DomainParameters>,
    ) -> Result<Self, CryptoModuleError> {
        if scalar < BigUint::from(2u32) {
            return Err(CryptoModuleError::InvalidArgument(format!(
                "Key scalar must be >= 2, got {}",
                scalar
            )));
        }

        let p = parameters.p();
        match kind {
            KeyKind::Private if scalar >= p - BigUint::one() => {
                return Err(CryptoModuleError::InvalidArgument(
                    "Private key scalar must be < p - 1".to_string(),
                ));
            }
            KeyKind::Public if scalar >= *p => {
                return Err(CryptoModuleError::InvalidArgument(
                    "Public key scalar must be < p".to_string(),
                ));
            }
            _ => {}
        }

        let modulus_byte_count = parameters.modulus_byte_len();
        if modulus_byte_count < 2 {
            return Err(CryptoModuleError::InvalidArgument(
                "p must span at least two bytes to carry plaintext".to_string(),
            ));
        }

        Ok(Self {
            kind,
            scalar,
            parameters,
            max_plain_block_size: modulus_byte_count - 1,
            max_cipher_block_size: modulus_byte_count,
        })
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn is_private(&self) -> bool {
        self.kind == KeyKind::Private
    }

    pub fn scalar(&self) -> &BigUint {
        &self.scalar
    }

    pub fn parameters(&self) -> &Arc<DomainParameters> {
        &self.parameters
    }

    /// Largest plaintext chunk (in bytes) packed into one ciphertext block.
    pub fn max_plain_block_size(&self) -> usize {
        self.max_plain_block_size
    }

    /// Width (in bytes) of every ciphertext block, including the leading `r` block.
    pub fn max_cipher_block_size(&self) -> usize {
        self.max_cipher_block_size
    }

    pub(crate) fn require_kind(&self, expected: KeyKind) -> Result<(), CryptoModuleError> {
        if self.kind != expected {
            return Err(CryptoModuleError::WrongKeyKind {
                expected,
                actual: self.kind,
            });
        }

        Ok(())
    }
}

impl Drop for ElGamalKey {
    fn drop(&mut self) {
        if self.kind == KeyKind::Private {
            self.scalar.zeroize();
        }
    }
}

/// A public/private key pair bound to one set of domain parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public_key: ElGamalKey,
    pub private_key: ElGamalKey,
}

impl KeyPair {
    /// Generates a pair with a private scalar drawn uniformly from `[2, p - 2]`.
    pub fn generate(parameters: Arc<DomainParameters>) -> Result<Self, CryptoModuleError> {
        Self::generate_with(&mut rand::rng(), parameters)
    }

    pub fn generate_with<R>(
        rng: &mut R,
        parameters: Arc<DomainParameters>,
    ) -> Result<Self, CryptoModuleError>
    where
        R: RngCore + CryptoRng,
    {
        let upper = parameters.p() - BigUint::one();
        let private_scalar = generate_big_integer_with(rng, &BigUint::from(2u32), &upper)?;

        Self::from_private_scalar(parameters, private_scalar)
    }

    /// Derives the pair for a known private scalar `x`: the public scalar is `g^x mod p`.
    pub fn from_private_scalar(
        parameters: Arc<DomainParameters>,
        private_scalar: BigUint,
    ) -> Result<Self, CryptoModuleError> {
        let public_scalar = parameters.ring().pow(parameters.g(), &private_scalar);

        let private_key = ElGamalKey::try_with(KeyKind::Private, private_scalar, parameters.clone())?;
        let public_key = ElGamalKey::try_with(KeyKind::Public, public_scalar, parameters)?;

        log::debug!(
            "Derived key pair with {}-byte cipher blocks",
            public_key.max_cipher_block_size()
        );

        Ok(Self {
            public_key,
            private_key,
        })
    }
}
