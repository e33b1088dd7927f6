//! Unsigned little-endian encoding of big integers into fixed-width blocks.
//!
//! Integers are written without a sign byte and without trailing (most significant) zero
//! bytes, then zero-padded on the right up to the block width. Decoding treats every
//! buffer as unsigned, so a set high bit never turns into a negative value.

use crate::errors::CryptoModuleError;

use num_bigint::BigUint;

/// Number of bytes in the minimal unsigned little-endian encoding of `value`.
///
/// Zero still occupies one byte.
///
/// # Example
///
/// ```
/// # use crypto_module::ring::byte_len;
/// # use num_bigint::BigUint;
/// assert_eq!(byte_len(&BigUint::from(0u32)), 1);
/// assert_eq!(byte_len(&BigUint::from(255u32)), 1);
/// assert_eq!(byte_len(&BigUint::from(256u32)), 2);
/// assert_eq!(byte_len(&BigUint::from(2000303u32)), 3);
/// ```
pub fn byte_len(value: &BigUint) -> usize {
    (value.bits() as usize).div_ceil(8).max(1)
}

/// Interprets `bytes` as an unsigned little-endian integer.
pub fn from_bytes_le(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_le(bytes)
}

/// Encodes `value` as exactly `width` little-endian bytes, zero-padded.
///
/// # Errors
///
/// Returns `CryptoModuleError::BadParameters` when the minimal encoding is wider than `width`.
///
/// # Example
///
/// ```
/// # use crypto_module::ring::to_fixed_width_le;
/// # use num_bigint::BigUint;
/// let block = to_fixed_width_le(&BigUint::from(0x0102u32), 4).unwrap();
/// assert_eq!(block, vec![0x02, 0x01, 0x00, 0x00]);
/// assert!(to_fixed_width_le(&BigUint::from(0x010203u32), 2).is_err());
/// ```
pub fn to_fixed_width_le(value: &BigUint, width: usize) -> Result<Vec<u8>, CryptoModuleError> {
    let mut bytes = value.to_bytes_le();
    if bytes.len() > width {
        return Err(CryptoModuleError::BadParameters(format!(
            "Value needs {} bytes but the block is only {} bytes wide",
            bytes.len(),
            width
        )));
    }

    bytes.resize(width, 0);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_bit_stays_unsigned() {
        let value = from_bytes_le(&[0xff, 0xff]);
        assert_eq!(value, BigUint::from(0xffffu32));
        assert_eq!(byte_len(&value), 2);
    }

    #[test]
    fn test_trailing_zero_bytes_are_dropped_then_restored() {
        let value = from_bytes_le(&[0x41, 0x42, 0x00, 0x00]);
        assert_eq!(byte_len(&value), 2);
        assert_eq!(to_fixed_width_le(&value, 4).unwrap(), vec![0x41, 0x42, 0, 0]);
    }

    #[test]
    fn test_zero_fills_whole_block() {
        let block = to_fixed_width_le(&BigUint::from(0u32), 3).unwrap();
        assert_eq!(block, vec![0, 0, 0]);
    }

    #[test]
    fn test_overflow_is_bad_parameters() {
        let result = to_fixed_width_le(&BigUint::from(1u32 << 16), 2);
        assert!(matches!(result, Err(CryptoModuleError::BadParameters(_))));
    }
}
