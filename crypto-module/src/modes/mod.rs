//! ECB, CBC, CFB and OFB chaining around [`Rc6`].
//!
//! Every mode zero-pads its input up to a multiple of [`BLOCK_SIZE`] first. The padding is
//! not reversible: decrypted output keeps the trailing zero bytes and the caller must know
//! the original length.
//!
//! Only ECB has no dependency between blocks, so it is the only mode split across worker
//! threads. CBC, CFB and OFB run as plain sequential loops.

pub mod file;
pub mod iv;

pub use iv::Iv;

use std::fmt;
use std::str::FromStr;

use crate::config::CryptoConfig;
use crate::errors::CryptoModuleError;
use crate::rc6::{BLOCK_SIZE, Block, Rc6};

use rand::{CryptoRng, RngCore};

use serde::{Deserialize, Serialize};

/// Mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Ecb,
    Cbc,
    Cfb,
    Ofb,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModeKind::Ecb => "ECB",
            ModeKind::Cbc => "CBC",
            ModeKind::Cfb => "CFB",
            ModeKind::Ofb => "OFB",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ModeKind {
    type Err = CryptoModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ecb" => Ok(ModeKind::Ecb),
            "cbc" => Ok(ModeKind::Cbc),
            "cfb" => Ok(ModeKind::Cfb),
            "ofb" => Ok(ModeKind::Ofb),
            other => Err(CryptoModuleError::InvalidArgument(format!(
                "Unknown mode of operation: {}",
                other
            ))),
        }
    }
}

/// A mode together with the chaining state it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainingMode {
    Ecb,
    Cbc { iv: Iv },
    Cfb { iv: Iv },
    Ofb { iv: Iv },
}

impl ChainingMode {
    fn new(kind: ModeKind, iv: Iv) -> Self {
        match kind {
            ModeKind::Ecb => ChainingMode::Ecb,
            ModeKind::Cbc => ChainingMode::Cbc { iv },
            ModeKind::Cfb => ChainingMode::Cfb { iv },
            ModeKind::Ofb => ChainingMode::Ofb { iv },
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            ChainingMode::Ecb => ModeKind::Ecb,
            ChainingMode::Cbc { .. } => ModeKind::Cbc,
            ChainingMode::Cfb { .. } => ModeKind::Cfb,
            ChainingMode::Ofb { .. } => ModeKind::Ofb,
        }
    }

    pub fn iv(&self) -> Option<&Iv> {
        match self {
            ChainingMode::Ecb => None,
            ChainingMode::Cbc { iv } | ChainingMode::Cfb { iv } | ChainingMode::Ofb { iv } => {
                Some(iv)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Encrypt,
    Decrypt,
}

/// One cipher session: an [`Rc6`] instance plus its mode and IV.
///
/// The IV changes only through [`ModeOfOperation::regenerate_iv`]; encrypting or decrypting
/// never mutates the session, so one instance can serve concurrent readers.
#[derive(Debug, Clone)]
pub struct ModeOfOperation {
    cipher: Rc6,
    mode: ChainingMode,
    ecb_parallel_threshold: usize,
}

impl ModeOfOperation {
    /// Starts a session with a fresh random IV (unused for ECB).
    pub fn new(cipher: Rc6, kind: ModeKind) -> Self {
        Self::with_iv(cipher, kind, Iv::generate())
    }

    pub fn with_iv(cipher: Rc6, kind: ModeKind, iv: Iv) -> Self {
        Self {
            cipher,
            mode: ChainingMode::new(kind, iv),
            ecb_parallel_threshold: CryptoConfig::default().ecb_parallel_threshold,
        }
    }

    /// Applies the ECB threading threshold from `config`.
    pub fn with_config(mut self, config: &CryptoConfig) -> Self {
        self.ecb_parallel_threshold = config.ecb_parallel_threshold;
        self
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn mode(&self) -> &ChainingMode {
        &self.mode
    }

    /// The session IV, or `None` in ECB.
    pub fn iv(&self) -> Option<&Iv> {
        self.mode.iv()
    }

    /// Replaces the session IV with a fresh random one. No effect in ECB.
    pub fn regenerate_iv(&mut self) {
        self.regenerate_iv_with(&mut rand::rng());
    }

    pub fn regenerate_iv_with<R>(&mut self, rng: &mut R)
    where
        R: RngCore + CryptoRng,
    {
        if self.mode != ChainingMode::Ecb {
            self.mode = ChainingMode::new(self.kind(), Iv::generate_with(rng));
            log::debug!("Regenerated IV for {} session", self.kind());
        }
    }

    /// Encrypts `data`, zero-padded to whole blocks.
    pub fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        self.chain(Direction::Encrypt).process(data)
    }

    /// Decrypts `data`, zero-padded to whole blocks. Padding added at encryption is kept.
    pub fn decrypt(&self, data: &[u8]) -> Vec<u8> {
        self.chain(Direction::Decrypt).process(data)
    }

    pub(crate) fn chain(&self, direction: Direction) -> Chain<'_> {
        let feedback = self.iv().map(|iv| *iv.as_bytes()).unwrap_or([0u8; BLOCK_SIZE]);

        Chain {
            session: self,
            direction,
            feedback,
        }
    }
}

/// Running chaining state for one pass over a stream of blocks.
///
/// Feeding the data in several pieces gives the same result as one call, as long as every
/// piece but the last is a whole number of blocks.
pub(crate) struct Chain<'a> {
    session: &'a ModeOfOperation,
    direction: Direction,
    feedback: Block,
}

impl Chain<'_> {
    pub(crate) fn process(&mut self, data: &[u8]) -> Vec<u8> {
        let padded = zero_pad(data);
        let cipher = &self.session.cipher;

        let feedback_mode = match self.session.mode {
            ChainingMode::Ecb => {
                let op: fn(&Rc6, &Block) -> Block = match self.direction {
                    Direction::Encrypt => Rc6::encrypt,
                    Direction::Decrypt => Rc6::decrypt,
                };
                return ecb(cipher, &padded, self.session.ecb_parallel_threshold, op);
            }
            ChainingMode::Cbc { .. } => FeedbackMode::Cbc,
            ChainingMode::Cfb { .. } => FeedbackMode::Cfb,
            ChainingMode::Ofb { .. } => FeedbackMode::Ofb,
        };

        let mut result = Vec::with_capacity(padded.len());
        for chunk in padded.chunks_exact(BLOCK_SIZE) {
            let block = to_block(chunk);
            let out = match (feedback_mode, self.direction) {
                (FeedbackMode::Cbc, Direction::Encrypt) => {
                    let out = cipher.encrypt(&xor(&block, &self.feedback));
                    self.feedback = out;
                    out
                }
                (FeedbackMode::Cbc, Direction::Decrypt) => {
                    let out = xor(&cipher.decrypt(&block), &self.feedback);
                    self.feedback = block;
                    out
                }
                (FeedbackMode::Cfb, Direction::Encrypt) => {
                    let out = xor(&block, &cipher.encrypt(&self.feedback));
                    self.feedback = out;
                    out
                }
                (FeedbackMode::Cfb, Direction::Decrypt) => {
                    let out = xor(&block, &cipher.encrypt(&self.feedback));
                    self.feedback = block;
                    out
                }
                // keystream depends only on the IV, so both directions are the same
                (FeedbackMode::Ofb, _) => {
                    self.feedback = cipher.encrypt(&self.feedback);
                    xor(&block, &self.feedback)
                }
            };
            result.extend_from_slice(&out);
        }

        result
    }
}

/// The modes that carry a feedback block between consecutive blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedbackMode {
    Cbc,
    Cfb,
    Ofb,
}

/// Appends zero bytes up to the next multiple of [`BLOCK_SIZE`].
///
/// # Example
///
/// ```
/// # use crypto_module::modes::zero_pad;
/// assert_eq!(zero_pad(b"abc").len(), 16);
/// assert_eq!(zero_pad(&[1u8; 32]).len(), 32);
/// assert!(zero_pad(&[]).is_empty());
/// ```
pub fn zero_pad(data: &[u8]) -> Vec<u8> {
    let mut padded = data.to_vec();
    padded.resize(data.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE, 0);
    padded
}

fn ecb(cipher: &Rc6, data: &[u8], threshold: usize, op: fn(&Rc6, &Block) -> Block) -> Vec<u8> {
    let mut result = vec![0u8; data.len()];
    let block_count = data.len() / BLOCK_SIZE;
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    if block_count < threshold.max(1) || workers < 2 {
        apply_blocks(cipher, data, &mut result, op);
        return result;
    }

    let span = block_count.div_ceil(workers) * BLOCK_SIZE;
    log::trace!("ECB over {} blocks on {} workers", block_count, workers);
    std::thread::scope(|scope| {
        for (src, dst) in data.chunks(span).zip(result.chunks_mut(span)) {
            scope.spawn(move || apply_blocks(cipher, src, dst, op));
        }
    });

    result
}

fn apply_blocks(cipher: &Rc6, src: &[u8], dst: &mut [u8], op: fn(&Rc6, &Block) -> Block) {
    for (input, output) in src
        .chunks_exact(BLOCK_SIZE)
        .zip(dst.chunks_exact_mut(BLOCK_SIZE))
    {
        output.copy_from_slice(&op(cipher, &to_block(input)));
    }
}

fn to_block(chunk: &[u8]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(chunk);
    block
}

fn xor(left: &Block, right: &Block) -> Block {
    let mut out = [0u8; BLOCK_SIZE];
    for (o, (l, r)) in out.iter_mut().zip(left.iter().zip(right)) {
        *o = l ^ r;
    }
    out
}
