use crate::config::CryptoConfig;
use crate::errors::CryptoModuleError;
use crate::prime::{DEFAULT_MILLER_RABIN_ROUNDS, is_probable_prime_with};
use crate::random::generate_big_integer_with;
use crate::ring::{Ring, byte_len};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Pow};

use rand::{CryptoRng, RngCore};

/// Smallest decimal order accepted for `q`; anything below is too small to be meaningful.
pub const MIN_DECIMAL_ORDER: u32 = 6;

/// ElGamal domain parameters `(p, g)`.
///
/// `p = 2q + 1` is a safe prime and `g` satisfies `g^2 != 1` and `g^q != 1 (mod p)`.
/// Immutable once built; keys share one instance behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParameters {
    ring: Ring,
    q: BigUint,
    g: BigUint,
}

impl DomainParameters {
    /// Searches for fresh parameters where `q` has `decimal_order + 1` decimal digits.
    ///
    /// # Errors
    ///
    /// * `CryptoModuleError::InvalidArgument` if `decimal_order < 6`.
    /// * `CryptoModuleError::GenerationFailed` if the default retry caps run out.
    pub fn generate(decimal_order: u32) -> Result<Self, CryptoModuleError> {
        Self::generate_with(&mut rand::rng(), decimal_order, &CryptoConfig::default())
    }

    /// Implements the safe-prime and generator search.
    ///
    /// # Algorithm Steps
    /// 1. Draw `q` in `[10^d, 10^(d+1))` until it passes Miller–Rabin.
    /// 2. Set `p = 2q + 1`; keep it only if `p` passes too, otherwise go back to 1.
    /// 3. Draw `g` in `[2, p - 1)` until `g^2 mod p != 1` and `g^q mod p != 1`.
    ///
    /// Steps 1-2 and step 3 are each bounded by the attempt caps in `config`.
    pub fn generate_with<R>(
        rng: &mut R,
        decimal_order: u32,
        config: &CryptoConfig,
    ) -> Result<Self, CryptoModuleError>
    where
        R: RngCore + CryptoRng,
    {
        if decimal_order < MIN_DECIMAL_ORDER {
            return Err(CryptoModuleError::InvalidArgument(format!(
                "Decimal order must be at least {}, got {}",
                MIN_DECIMAL_ORDER, decimal_order
            )));
        }

        let ten = BigUint::from(10u32);
        let lower = Pow::pow(&ten, decimal_order);
        let upper = Pow::pow(&ten, decimal_order + 1);
        let rounds = config.miller_rabin_rounds;

        let mut attempts = 0u64;
        let (q, p) = loop {
            attempts += 1;
            if attempts > config.max_prime_attempts {
                return Err(CryptoModuleError::GenerationFailed(format!(
                    "No safe prime found after {} candidates",
                    config.max_prime_attempts
                )));
            }

            let q = generate_big_integer_with(rng, &lower, &upper)?;
            if !is_probable_prime_with(rng, &q, rounds)? {
                continue;
            }

            let p: BigUint = (&q << 1u32) + BigUint::one();
            if is_probable_prime_with(rng, &p, rounds)? {
                break (q, p);
            }
        };

        log::debug!(
            "Found {}-bit safe prime after {} candidates",
            p.bits(),
            attempts
        );

        let ring = Ring::try_with(p)?;
        let g = find_generator(rng, &ring, &q, config.max_generator_attempts)?;

        Ok(Self { ring, q, g })
    }

    /// Builds parameters from known values, checking every invariant the search guarantees.
    ///
    /// # Errors
    ///
    /// Returns `CryptoModuleError::InvalidArgument` if `p` is not a safe prime or `g` fails
    /// the generator conditions.
    pub fn try_with(p: BigUint, g: BigUint) -> Result<Self, CryptoModuleError> {
        if p <= BigUint::from(5u32) || p.is_even() {
            return Err(CryptoModuleError::InvalidArgument(format!(
                "p must be an odd prime > 5, got {}",
                p
            )));
        }

        let q: BigUint = (&p - BigUint::one()) >> 1u32;
        let mut rng = rand::rng();
        if !is_probable_prime_with(&mut rng, &p, DEFAULT_MILLER_RABIN_ROUNDS)?
            || !is_probable_prime_with(&mut rng, &q, DEFAULT_MILLER_RABIN_ROUNDS)?
        {
            return Err(CryptoModuleError::InvalidArgument(format!(
                "p = {} is not a safe prime",
                p
            )));
        }

        let ring = Ring::try_with(p)?;
        if g < BigUint::from(2u32) || g >= ring.modulus_minus_one() || !is_generator(&ring, &q, &g)
        {
            return Err(CryptoModuleError::InvalidArgument(format!(
                "g = {} is not a valid generator",
                g
            )));
        }

        Ok(Self { ring, q, g })
    }

    /// The safe prime modulus.
    pub fn p(&self) -> &BigUint {
        self.ring.modulus()
    }

    /// The prime `(p - 1) / 2`.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Arithmetic modulo `p`.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// Unsigned byte length of `p`; the ciphertext block width.
    pub fn modulus_byte_len(&self) -> usize {
        byte_len(self.p())
    }
}

/// Draws `g` in `[2, p - 1)` until it passes [`is_generator`], at most `max_attempts` times.
fn find_generator<R>(
    rng: &mut R,
    ring: &Ring,
    q: &BigUint,
    max_attempts: u64,
) -> Result<BigUint, CryptoModuleError>
where
    R: RngCore + CryptoRng,
{
    let two = BigUint::from(2u32);
    let p_minus_one = ring.modulus_minus_one();

    for attempt in 1..=max_attempts {
        let g = generate_big_integer_with(rng, &two, &p_minus_one)?;
        if is_generator(ring, q, &g) {
            log::debug!("Accepted generator after {} candidates", attempt);
            return Ok(g);
        }
    }

    Err(CryptoModuleError::GenerationFailed(format!(
        "No generator found after {} candidates",
        max_attempts
    )))
}

fn is_generator(ring: &Ring, q: &BigUint, g: &BigUint) -> bool {
    !ring.square(g).is_one() && !ring.pow(g, q).is_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TEST_SEED: u64 = 42;

    #[test]
    fn test_generated_parameters_hold_invariants() -> Result<(), CryptoModuleError> {
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        let params = DomainParameters::generate_with(&mut rng, 6, &CryptoConfig::default())?;

        let p = params.p();
        let q = params.q();
        assert_eq!(*p, (q << 1u32) + BigUint::one());
        assert!(*q >= BigUint::from(1_000_000u32) && *q < BigUint::from(10_000_000u32));
        assert!(is_probable_prime_with(&mut rng, p, 40)?);
        assert!(is_probable_prime_with(&mut rng, q, 40)?);
        assert!(!params.ring().square(params.g()).is_one());
        assert!(!params.ring().pow(params.g(), q).is_one());
        Ok(())
    }

    #[test]
    fn test_same_seed_same_parameters() -> Result<(), CryptoModuleError> {
        let config = CryptoConfig::default();
        let first = DomainParameters::generate_with(&mut StdRng::seed_from_u64(7), 8, &config)?;
        let second = DomainParameters::generate_with(&mut StdRng::seed_from_u64(7), 8, &config)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_order_too_small() {
        let result = DomainParameters::generate(5);
        assert!(matches!(result, Err(CryptoModuleError::InvalidArgument(_))));
    }

    #[test]
    fn test_retry_cap_reports_generation_failed() {
        let config = CryptoConfig {
            max_prime_attempts: 1,
            ..CryptoConfig::default()
        };

        // A single candidate is almost never a safe prime; loop over seeds until one fails.
        let failed = (0..32).any(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            matches!(
                DomainParameters::generate_with(&mut rng, 12, &config),
                Err(CryptoModuleError::GenerationFailed(_))
            )
        });
        assert!(failed);
    }

    #[test]
    fn test_generator_cap_reports_generation_failed() -> Result<(), CryptoModuleError> {
        let ring = Ring::try_with(BigUint::from(2000303u32))?;
        let q = BigUint::from(1000151u32);

        assert!(matches!(
            find_generator(&mut StdRng::seed_from_u64(TEST_SEED), &ring, &q, 0),
            Err(CryptoModuleError::GenerationFailed(_))
        ));

        // about half of all candidates are generators, so one attempt fails for some seed
        let failed = (0..32).any(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            matches!(
                find_generator(&mut rng, &ring, &q, 1),
                Err(CryptoModuleError::GenerationFailed(_))
            )
        });
        assert!(failed);

        let g = find_generator(&mut StdRng::seed_from_u64(TEST_SEED), &ring, &q, 10_000)?;
        assert!(is_generator(&ring, &q, &g));
        Ok(())
    }

    #[test]
    fn test_try_with_known_values() -> Result<(), CryptoModuleError> {
        let params = DomainParameters::try_with(BigUint::from(2000303u32), BigUint::from(5u32))?;
        assert_eq!(params.q(), &BigUint::from(1000151u32));
        assert_eq!(params.modulus_byte_len(), 3);
        Ok(())
    }

    #[test]
    fn test_try_with_rejects_bad_values() {
        // 2000301 is not of the form 2q + 1 with q prime.
        assert!(DomainParameters::try_with(BigUint::from(2000301u32), BigUint::from(5u32)).is_err());
        // p - 1 has order 2.
        assert!(
            DomainParameters::try_with(BigUint::from(2000303u32), BigUint::from(2000302u32))
                .is_err()
        );
        assert!(DomainParameters::try_with(BigUint::from(4u32), BigUint::from(2u32)).is_err());
    }
}
