use std::fmt;
use std::ops::{BitXor, BitXorAssign};

use aes::Aes128;
use aes::cipher::{BlockEncrypt, KeyInit};
use anyhow::{Context, Result};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Opaque 128-bit value: a wire label, tweak, key or ciphertext entry.
///
/// Byte 0 is the low-order byte; the permutation bit of a label is bit 0 of
/// byte 0.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block([u8; 16]);

impl Block {
    /// The all-zero block.
    pub const ZERO: Block = Block([0u8; 16]);

    /// Wraps raw bytes as a block.
    pub fn new(bytes: [u8; 16]) -> Self {
        Block(bytes)
    }

    /// Builds a block from two 64-bit halves; `lo` occupies bytes 0..8.
    pub fn make(hi: u64, lo: u64) -> Self {
        Block((((hi as u128) << 64) | lo as u128).to_le_bytes())
    }

    /// Bit 0 of byte 0: the permutation bit of a label.
    pub fn lsb(&self) -> bool {
        self.0[0] & 1 == 1
    }

    /// Returns the block with its permutation bit forced to `bit`.
    pub fn with_lsb(mut self, bit: bool) -> Self {
        if bit {
            self.0[0] |= 0x01;
        } else {
            self.0[0] &= 0xfe;
        }
        self
    }

    /// Shifts the whole 128-bit value left by one; the top bit is discarded.
    ///
    /// Used to domain-separate hash inputs, not as field arithmetic.
    pub fn double(self) -> Self {
        Block((u128::from_le_bytes(self.0) << 1).to_le_bytes())
    }

    /// Raw byte view.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Consumes the block into its raw bytes.
    pub fn into_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl BitXor for Block {
    type Output = Block;

    fn bitxor(self, rhs: Block) -> Block {
        let mut out = [0u8; 16];
        for i in 0..16 {
            out[i] = self.0[i] ^ rhs.0[i];
        }
        Block(out)
    }
}

impl BitXorAssign for Block {
    fn bitxor_assign(&mut self, rhs: Block) {
        *self = *self ^ rhs;
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block(")?;
        for byte in self.0.iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// The two labels of one wire: `zero` encodes bit 0, `one` encodes bit 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPair {
    /// Label carried when the wire holds 0.
    pub zero: Block,
    /// Label carried when the wire holds 1.
    pub one: Block,
}

impl LabelPair {
    /// Picks the label encoding `bit`.
    pub fn select(&self, bit: bool) -> Block {
        if bit { self.one } else { self.zero }
    }
}

/// Counter-mode AES block source seeded once and consumed sequentially.
///
/// The seed is expanded into an AES-128 key and each call encrypts an
/// incrementing 64-bit counter, so a pinned seed reproduces the exact label
/// stream. One handle per garbling; the type is deliberately not shared.
pub struct BlockRng {
    cipher: Aes128,
    index: u64,
}

impl fmt::Debug for BlockRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRng").field("index", &self.index).finish()
    }
}

impl BlockRng {
    /// Expands `seed` into the stream key and rewinds the counter.
    pub fn from_seed(seed: Block) -> Self {
        BlockRng {
            cipher: Aes128::new(&seed.into_bytes().into()),
            index: 0,
        }
    }

    /// Draws a 16-byte seed from the operating system.
    ///
    /// Returns the seed alongside the source so a later run can replay it.
    pub fn from_entropy() -> Result<(Self, Block)> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .context("unable to seed securely")?;
        let seed = Block::new(bytes);
        Ok((Self::from_seed(seed), seed))
    }

    /// Next block of the stream: AES(counter++).
    pub fn next_block(&mut self) -> Block {
        let mut block: aes::Block = Block::make(0, self.index).into_bytes().into();
        self.index += 1;
        self.cipher.encrypt_block(&mut block);
        Block::new(block.into())
    }
}
