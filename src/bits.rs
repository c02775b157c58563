//! Packed bit vector and bit matrix primitives.
//!
//! Feature vectors and the signum cache are stored as packed `u64` blocks,
//! little-endian bit order within a block. Rows of a [`BitMatrix`] are padded
//! to a 64-byte boundary so that raw block slices handed to the evaluator are
//! SIMD-width aligned.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of bits per storage block.
pub const BLOCK_BITS: usize = 64;

/// Row alignment in bytes. Row starts are padded to this boundary.
pub const ALIGNMENT: usize = 64;

const BLOCKS_PER_ALIGN: usize = ALIGNMENT / core::mem::size_of::<u64>();

/// Blocks needed to hold `len` bits, before padding.
#[inline]
#[must_use]
pub const fn content_blocks(len: usize) -> usize {
    len.div_ceil(BLOCK_BITS)
}

#[inline]
const fn padded_blocks(len: usize) -> usize {
    content_blocks(len).div_ceil(BLOCKS_PER_ALIGN) * BLOCKS_PER_ALIGN
}

/// # Overview
///
/// Fixed-length packed bitset over `u64` blocks.
///
/// Bit `i` lives in block `i / 64` at position `i % 64`.
///
/// # Examples
///
/// ```
/// use tsetlin_core::BitVector;
///
/// let mut x = BitVector::new(8);
/// x.set(0);
/// x.set(3);
/// assert!(x.test(3));
/// assert_eq!(x.blocks()[0], 0b1001);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitVector {
    blocks: Vec<u64>,
    len:    usize
}

impl BitVector {
    /// # Overview
    ///
    /// Creates a zeroed bit vector holding `len` bits.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            blocks: vec![0; padded_blocks(len)],
            len
        }
    }

    /// # Overview
    ///
    /// Packs a 0/1 byte slice into a bit vector.
    #[must_use]
    pub fn from_bits(bits: &[u8]) -> Self {
        let mut bv = Self::new(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b != 0 {
                bv.set(i);
            }
        }
        bv
    }

    /// Number of bits.
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds zero bits.
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of blocks carrying payload bits.
    #[inline(always)]
    #[must_use]
    pub const fn content_blocks(&self) -> usize {
        content_blocks(self.len)
    }

    /// Raw block storage, padding included.
    #[inline(always)]
    #[must_use]
    pub fn blocks(&self) -> &[u64] {
        &self.blocks
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.blocks[i / BLOCK_BITS] |= 1u64 << (i % BLOCK_BITS);
    }

    #[inline(always)]
    pub fn clear(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.blocks[i / BLOCK_BITS] &= !(1u64 << (i % BLOCK_BITS));
    }

    #[inline(always)]
    pub fn flip(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.blocks[i / BLOCK_BITS] ^= 1u64 << (i % BLOCK_BITS);
    }

    #[inline(always)]
    #[must_use]
    pub fn test(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        self.blocks[i / BLOCK_BITS] & (1u64 << (i % BLOCK_BITS)) != 0
    }
}

/// # Overview
///
/// Two-dimensional packed bitset with alignment-padded rows.
///
/// Shares the row layout of
/// [`NumericMatrix`](crate::matrix::NumericMatrix): one padded block run per
/// row, rows indexed densely. The signum cache is a `BitMatrix` with the same
/// shape as its counter matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitMatrix {
    blocks:     Vec<u64>,
    nrows:      usize,
    ncols:      usize,
    row_blocks: usize
}

impl BitMatrix {
    /// # Overview
    ///
    /// Creates a zeroed bit matrix of `nrows x ncols` bits.
    #[must_use]
    pub fn new(nrows: usize, ncols: usize) -> Self {
        let row_blocks = padded_blocks(ncols);
        Self {
            blocks: vec![0; nrows * row_blocks],
            nrows,
            ncols,
            row_blocks
        }
    }

    /// Returns `(nrows, ncols)`.
    #[inline(always)]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of blocks per row carrying payload bits.
    #[inline(always)]
    #[must_use]
    pub const fn content_blocks(&self) -> usize {
        content_blocks(self.ncols)
    }

    /// Padded blocks per row.
    #[inline(always)]
    #[must_use]
    pub const fn row_blocks(&self) -> usize {
        self.row_blocks
    }

    /// Block slice for row `r`, padding included.
    #[inline(always)]
    #[must_use]
    pub fn row(&self, r: usize) -> &[u64] {
        let start = r * self.row_blocks;
        &self.blocks[start..start + self.row_blocks]
    }

    #[inline(always)]
    pub fn set(&mut self, r: usize, c: usize) {
        debug_assert!(r < self.nrows && c < self.ncols);
        self.blocks[r * self.row_blocks + c / BLOCK_BITS] |= 1u64 << (c % BLOCK_BITS);
    }

    #[inline(always)]
    pub fn clear(&mut self, r: usize, c: usize) {
        debug_assert!(r < self.nrows && c < self.ncols);
        self.blocks[r * self.row_blocks + c / BLOCK_BITS] &= !(1u64 << (c % BLOCK_BITS));
    }

    #[inline(always)]
    pub fn flip(&mut self, r: usize, c: usize) {
        debug_assert!(r < self.nrows && c < self.ncols);
        self.blocks[r * self.row_blocks + c / BLOCK_BITS] ^= 1u64 << (c % BLOCK_BITS);
    }

    #[inline(always)]
    #[must_use]
    pub fn test(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.nrows && c < self.ncols);
        self.blocks[r * self.row_blocks + c / BLOCK_BITS] & (1u64 << (c % BLOCK_BITS)) != 0
    }

    /// # Overview
    ///
    /// Mutable views of the row pair `2k` / `2k+1`.
    ///
    /// Each clause `k` owns exactly this pair of rows, so handing out both at
    /// once via a split borrow is safe and keeps kernels free of index
    /// arithmetic into the backing store.
    #[inline]
    pub fn row_pair_mut(&mut self, k: usize) -> (BitRowMut<'_>, BitRowMut<'_>) {
        debug_assert!(2 * k + 1 < self.nrows);
        let start = 2 * k * self.row_blocks;
        let (pos, neg) = self.blocks[start..start + 2 * self.row_blocks]
            .split_at_mut(self.row_blocks);
        (BitRowMut { blocks: pos }, BitRowMut { blocks: neg })
    }
}

/// # Overview
///
/// Mutable view over one row of a [`BitMatrix`].
#[derive(Debug)]
pub struct BitRowMut<'a> {
    blocks: &'a mut [u64]
}

impl BitRowMut<'_> {
    #[inline(always)]
    pub fn flip(&mut self, i: usize) {
        self.blocks[i / BLOCK_BITS] ^= 1u64 << (i % BLOCK_BITS);
    }

    #[inline(always)]
    #[must_use]
    pub fn test(&self, i: usize) -> bool {
        self.blocks[i / BLOCK_BITS] & (1u64 << (i % BLOCK_BITS)) != 0
    }
}
