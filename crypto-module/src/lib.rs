pub mod config;
pub mod elgamal;
pub mod errors;
pub mod keypair;
pub mod modes;
pub mod params;
pub mod prime;
pub mod random;
pub mod rc6;
pub mod ring;

mod stream;
