//! Miller–Rabin probabilistic primality test.

use crate::errors::CryptoModuleError;
use crate::random::generate_big_integer_with;
use crate::ring::Ring;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use rand::{CryptoRng, RngCore};

/// Rounds giving a false-positive probability of at most 4^-40.
pub const DEFAULT_MILLER_RABIN_ROUNDS: u32 = 40;

/// Tests `n` for primality with `rounds` random Miller–Rabin witnesses.
///
/// # Errors
///
/// Returns `CryptoModuleError::InvalidArgument` if `n` is zero.
///
/// # Example
///
/// ```
/// # use crypto_module::prime::is_probable_prime;
/// # use num_bigint::BigUint;
/// assert!(is_probable_prime(&BigUint::from(97u32), 40).unwrap());
/// assert!(!is_probable_prime(&BigUint::from(341u32), 40).unwrap());
/// ```
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> Result<bool, CryptoModuleError> {
    is_probable_prime_with(&mut rand::rng(), n, rounds)
}

/// Same as [`is_probable_prime`] but drawing witnesses from `rng`.
///
/// With a seeded `rng` the verdict is fully reproducible.
pub fn is_probable_prime_with<R>(
    rng: &mut R,
    n: &BigUint,
    rounds: u32,
) -> Result<bool, CryptoModuleError>
where
    R: RngCore + CryptoRng,
{
    if n.is_zero() {
        return Err(CryptoModuleError::InvalidArgument(
            "n must be positive".to_string(),
        ));
    }

    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);
    if n.is_one() {
        return Ok(false);
    }
    if *n == two || *n == three {
        return Ok(true);
    }
    if n.is_even() {
        return Ok(false);
    }

    let ring = Ring::try_with(n.clone())?;
    let n_minus_one = ring.modulus_minus_one();

    // n - 1 = 2^s * t, t odd
    let s = n_minus_one
        .trailing_zeros()
        .ok_or_else(|| CryptoModuleError::InvalidArgument("n - 1 must be non-zero".to_string()))?;
    let t = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        // a in [2, n - 2]
        let a = generate_big_integer_with(rng, &two, &n_minus_one)?;
        let mut x = ring.pow(&a, &t);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = ring.square(&x);
            if x.is_one() {
                return Ok(false);
            }
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return Ok(false);
    }

    Ok(true)
}
