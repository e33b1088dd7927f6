//! Implementation of ring ops using modular arithmetic.

use crate::errors::CryptoModuleError;

use num_bigint::BigUint;
use num_traits::One;

/// Represents a finite ring Z_n using modular arithmetic.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Ring {
    modulus: BigUint,
}

impl Ring {
    /// Create a new Ring with the given modulus.
    ///
    /// The modulus must be greater than 1.
    pub fn try_with(modulus: BigUint) -> Result<Self, CryptoModuleError> {
        if modulus <= BigUint::one() {
            return Err(CryptoModuleError::InvalidArgument(format!(
                "Modulus must be greater than 1, got {}",
                modulus
            )));
        }

        Ok(Ring { modulus })
    }

    /// Returns the modulus of the ring.
    ///
    /// # Example
    ///
    /// ```
    /// # use crypto_module::ring::Ring;
    /// # use num_bigint::BigUint;
    /// let ring = Ring::try_with(BigUint::from(13u32)).unwrap();
    /// assert_eq!(ring.modulus(), &BigUint::from(13u32));
    /// ```
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// `modulus - 1`, the order of the multiplicative group when the modulus is prime.
    pub fn modulus_minus_one(&self) -> BigUint {
        &self.modulus - BigUint::one()
    }

    /// Normalizes a value to be within the range `[0, modulus - 1]`.
    ///
    /// # Example
    ///
    /// ```
    /// # use crypto_module::ring::Ring;
    /// # use num_bigint::BigUint;
    /// let ring = Ring::try_with(BigUint::from(10u32)).unwrap();
    /// assert_eq!(ring.normalize(&BigUint::from(15u32)), BigUint::from(5u32));
    /// assert_eq!(ring.normalize(&BigUint::from(10u32)), BigUint::from(0u32));
    /// ```
    pub fn normalize(&self, value: &BigUint) -> BigUint {
        value % &self.modulus
    }

    /// Computes `(a * b) mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use crypto_module::ring::Ring;
    /// # use num_bigint::BigUint;
    /// let ring = Ring::try_with(BigUint::from(10u32)).unwrap();
    /// assert_eq!(ring.mul(&BigUint::from(7u32), &BigUint::from(5u32)), BigUint::from(5u32));
    /// ```
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Computes `base^exponent mod modulus` by square-and-multiply.
    ///
    /// # Example
    ///
    /// ```
    /// # use crypto_module::ring::Ring;
    /// # use num_bigint::BigUint;
    /// let ring = Ring::try_with(BigUint::from(2000303u32)).unwrap();
    /// assert_eq!(ring.pow(&BigUint::from(5u32), &BigUint::from(5u32)), BigUint::from(3125u32));
    /// ```
    pub fn pow(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.modulus)
    }

    /// Computes `value^2 mod modulus`.
    pub fn square(&self, value: &BigUint) -> BigUint {
        self.mul(value, value)
    }

    /// Returns `true` when `value ≡ modulus - 1`, i.e. `value ≡ -1`.
    pub fn is_minus_one(&self, value: &BigUint) -> bool {
        self.normalize(value) == self.modulus_minus_one()
    }
}
