//! ElGamal keys derived from shared [`DomainParameters`](crate::params::DomainParameters).

pub mod keys;

pub use keys::{ElGamalKey, KeyKind, KeyPair};
