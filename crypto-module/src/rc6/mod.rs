//! RC6 block cipher: 32-bit words, 20 rounds, 16-byte blocks.
//!
//! Each [`Rc6`] owns its round-key schedule. Building one runs the key schedule; after that
//! the cipher is immutable and can encrypt or decrypt any number of blocks, from any number
//! of threads.

pub mod key;

pub use key::{KeySize, SecretKey};

use std::fmt;

use crate::errors::CryptoModuleError;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Block width in bytes.
pub const BLOCK_SIZE: usize = 16;
/// Number of rounds.
pub const ROUNDS: usize = 20;
/// Length of the round-key table, `2 * ROUNDS + 4`.
pub const ROUND_KEY_COUNT: usize = 2 * ROUNDS + 4;

const WORD_BITS: u32 = 32;
/// log2(WORD_BITS)
const LG_WORD: u32 = 5;
/// Odd((e - 2) * 2^32)
const P32: u32 = 0xB7E1_5163;
/// Odd((phi - 1) * 2^32)
const Q32: u32 = 0x9E37_79B9;

pub type Block = [u8; BLOCK_SIZE];

/// The round-key table is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Rc6 {
    round_keys: [u32; ROUND_KEY_COUNT],
}

impl Rc6 {
    /// Runs the key schedule for `key`.
    pub fn new(key: &SecretKey) -> Self {
        Self {
            round_keys: schedule(key.as_bytes(), key.size().word_count()),
        }
    }

    /// Encrypts exactly one 16-byte block.
    ///
    /// # Errors
    ///
    /// Returns `CryptoModuleError::InvalidBlockSize` if `block` is not 16 bytes long.
    pub fn encrypt_block(&self, block: &[u8]) -> Result<Block, CryptoModuleError> {
        Ok(self.encrypt(&as_block(block)?))
    }

    /// Decrypts exactly one 16-byte block.
    ///
    /// # Errors
    ///
    /// Returns `CryptoModuleError::InvalidBlockSize` if `block` is not 16 bytes long.
    pub fn decrypt_block(&self, block: &[u8]) -> Result<Block, CryptoModuleError> {
        Ok(self.decrypt(&as_block(block)?))
    }

    pub(crate) fn encrypt(&self, block: &Block) -> Block {
        let s = &self.round_keys;
        let [mut a, mut b, mut c, mut d] = load_words(block);

        b = b.wrapping_add(s[0]);
        d = d.wrapping_add(s[1]);
        for i in 1..=ROUNDS {
            let t = b.wrapping_mul(b.wrapping_mul(2).wrapping_add(1)).rotate_left(LG_WORD);
            let u = d.wrapping_mul(d.wrapping_mul(2).wrapping_add(1)).rotate_left(LG_WORD);
            a = (a ^ t).rotate_left(u % WORD_BITS).wrapping_add(s[2 * i]);
            c = (c ^ u).rotate_left(t % WORD_BITS).wrapping_add(s[2 * i + 1]);
            (a, b, c, d) = (b, c, d, a);
        }
        a = a.wrapping_add(s[2 * ROUNDS + 2]);
        c = c.wrapping_add(s[2 * ROUNDS + 3]);

        store_words([a, b, c, d])
    }

    pub(crate) fn decrypt(&self, block: &Block) -> Block {
        let s = &self.round_keys;
        let [mut a, mut b, mut c, mut d] = load_words(block);

        c = c.wrapping_sub(s[2 * ROUNDS + 3]);
        a = a.wrapping_sub(s[2 * ROUNDS + 2]);
        for i in (1..=ROUNDS).rev() {
            (a, b, c, d) = (d, a, b, c);
            let u = d.wrapping_mul(d.wrapping_mul(2).wrapping_add(1)).rotate_left(LG_WORD);
            let t = b.wrapping_mul(b.wrapping_mul(2).wrapping_add(1)).rotate_left(LG_WORD);
            c = c.wrapping_sub(s[2 * i + 1]).rotate_right(t % WORD_BITS) ^ u;
            a = a.wrapping_sub(s[2 * i]).rotate_right(u % WORD_BITS) ^ t;
        }
        d = d.wrapping_sub(s[1]);
        b = b.wrapping_sub(s[0]);

        store_words([a, b, c, d])
    }
}

impl fmt::Debug for Rc6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rc6").finish_non_exhaustive()
    }
}

/// Expands `key` into the round-key table.
///
/// # Algorithm Steps
/// 1. Load the key bytes into `word_count` little-endian words `L`.
/// 2. Fill `S` with the arithmetic progression `S[0] = P32`, `S[i] = S[i-1] + Q32`.
/// 3. Mix `L` into `S` for `3 * max(word_count, 2 * ROUNDS + 4)` steps.
fn schedule(key: &[u8], word_count: usize) -> [u32; ROUND_KEY_COUNT] {
    let mut l: Vec<u32> = key
        .chunks_exact(4)
        .take(word_count)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();

    let mut s = [0u32; ROUND_KEY_COUNT];
    s[0] = P32;
    for i in 1..ROUND_KEY_COUNT {
        s[i] = s[i - 1].wrapping_add(Q32);
    }

    let (mut a, mut b) = (0u32, 0u32);
    let (mut i, mut j) = (0usize, 0usize);
    for _ in 0..3 * word_count.max(ROUND_KEY_COUNT) {
        a = s[i].wrapping_add(a).wrapping_add(b).rotate_left(3);
        s[i] = a;
        b = l[j].wrapping_add(a).wrapping_add(b).rotate_left(a.wrapping_add(b) % WORD_BITS);
        l[j] = b;
        i = (i + 1) % ROUND_KEY_COUNT;
        j = (j + 1) % word_count;
    }
    l.zeroize();

    s
}

fn as_block(bytes: &[u8]) -> Result<Block, CryptoModuleError> {
    bytes
        .try_into()
        .map_err(|_| CryptoModuleError::InvalidBlockSize(bytes.len()))
}

fn load_words(block: &Block) -> [u32; 4] {
    let mut words = [0u32; 4];
    for (word, bytes) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    words
}

fn store_words(words: [u32; 4]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    for (bytes, word) in block.chunks_exact_mut(4).zip(words) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
    block
}
