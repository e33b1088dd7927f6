//! Cryptographically seeded random big integers and printable key material.
//!
//! Every generator has a `_with` variant taking the random source explicitly, so tests can
//! drive it with a seeded [`rand::rngs::StdRng`]. The plain variants use [`rand::rng`],
//! a CSPRNG reseeded from the operating system.

use crate::errors::CryptoModuleError;
use crate::ring::byte_len;

use num_bigint::BigUint;
use num_traits::Zero;

use rand::{CryptoRng, Rng, RngCore};

/// Lowest printable, non-space ASCII character used for generated keys.
pub const PRINTABLE_MIN: u8 = b'!';
/// Highest character used for generated keys; `'~'` is left out.
pub const PRINTABLE_MAX: u8 = b'}';

/// Returns a uniformly distributed integer in `[min, max)`.
///
/// # Errors
///
/// Returns `CryptoModuleError::InvalidRange` if `min >= max` or either bound is zero.
pub fn generate_big_integer(min: &BigUint, max: &BigUint) -> Result<BigUint, CryptoModuleError> {
    generate_big_integer_with(&mut rand::rng(), min, max)
}

/// Same as [`generate_big_integer`] but drawing bytes from `rng`.
///
/// Draws `byte_len(max - min) + 1` random bytes and reduces them modulo the range width.
/// The extra byte keeps the modulo bias below 1/256.
///
/// # Example
///
/// ```
/// # use crypto_module::random::generate_big_integer_with;
/// # use num_bigint::BigUint;
/// # use rand::{SeedableRng, rngs::StdRng};
/// let mut rng = StdRng::seed_from_u64(7);
/// let value = generate_big_integer_with(&mut rng, &BigUint::from(10u32), &BigUint::from(20u32)).unwrap();
/// assert!(value >= BigUint::from(10u32) && value < BigUint::from(20u32));
/// ```
pub fn generate_big_integer_with<R>(
    rng: &mut R,
    min: &BigUint,
    max: &BigUint,
) -> Result<BigUint, CryptoModuleError>
where
    R: RngCore + CryptoRng,
{
    if min.is_zero() || max.is_zero() {
        return Err(CryptoModuleError::InvalidRange(format!(
            "Bounds must be positive, got [{}, {})",
            min, max
        )));
    }

    if min >= max {
        return Err(CryptoModuleError::InvalidRange(format!(
            "min must be < max, got [{}, {})",
            min, max
        )));
    }

    let width = max - min;
    let mut chunk = vec![0u8; byte_len(&width) + 1];
    rng.fill_bytes(&mut chunk);

    let drawn = BigUint::from_bytes_le(&chunk);

    Ok(drawn % width + min)
}

/// Returns `length` random characters from the printable ASCII range `'!'..='~'`.
pub fn generate_printable_key(length: usize) -> String {
    generate_printable_key_with(&mut rand::rng(), length)
}

/// Same as [`generate_printable_key`] but drawing characters from `rng`.
pub fn generate_printable_key_with<R>(rng: &mut R, length: usize) -> String
where
    R: RngCore + CryptoRng,
{
    (0..length)
        .map(|_| rng.random_range(PRINTABLE_MIN..=PRINTABLE_MAX) as char)
        .collect()
}
