//! # Ring Crypto Module
//!
//! Provides the [`Ring`] struct for modular arithmetic over Z_n with arbitrary-precision
//! integers, plus the fixed-width little-endian byte codec used by the ElGamal block format.

pub mod codec;
pub mod math;

pub use codec::{byte_len, from_bytes_le, to_fixed_width_le};
pub use math::Ring;
