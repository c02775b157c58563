//! Row-major numeric matrix with alignment-padded rows.
//!
//! Backing store for automaton counters. Each row is padded so that it
//! starts on a 64-byte boundary, which lets the feedback kernels treat row
//! slices as SIMD-width aligned without ad hoc pointer arithmetic.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bits::ALIGNMENT;

/// # Overview
///
/// Zero-initialized 2D array of `nrows x ncols` elements.
///
/// The padded per-row element count is exposed as
/// [`row_items`](Self::row_items); payload columns are `0..ncols` of each
/// row slice.
///
/// # Examples
///
/// ```
/// use tsetlin_core::NumericMatrix;
///
/// let m: NumericMatrix<i32> = NumericMatrix::new(5, 3);
/// assert_eq!(m.shape(), (5, 3));
/// assert_eq!(m.row_items(), 16); // 64 bytes / 4 bytes per element
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NumericMatrix<T> {
    data:      Vec<T>,
    nrows:     usize,
    ncols:     usize,
    row_items: usize
}

impl<T: Copy + Default> NumericMatrix<T> {
    /// # Overview
    ///
    /// Creates a matrix filled with `T::default()`.
    #[must_use]
    pub fn new(nrows: usize, ncols: usize) -> Self {
        let quantum = ALIGNMENT / core::mem::size_of::<T>();
        let row_items = if ncols == 0 {
            0
        } else {
            ncols.div_ceil(quantum) * quantum
        };

        Self {
            data: vec![T::default(); nrows * row_items],
            nrows,
            ncols,
            row_items
        }
    }

    /// Returns `(nrows, ncols)`.
    #[inline(always)]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Padded elements per row.
    #[inline(always)]
    #[must_use]
    pub const fn row_items(&self) -> usize {
        self.row_items
    }

    /// Row `r`, padding included.
    #[inline(always)]
    #[must_use]
    pub fn row(&self, r: usize) -> &[T] {
        let start = r * self.row_items;
        &self.data[start..start + self.row_items]
    }

    /// Mutable row `r`, padding included.
    #[inline(always)]
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        let start = r * self.row_items;
        &mut self.data[start..start + self.row_items]
    }

    /// Element at `(r, c)`.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> T {
        debug_assert!(r < self.nrows && c < self.ncols);
        self.data[r * self.row_items + c]
    }

    /// Stores `v` at `(r, c)`.
    #[inline(always)]
    pub fn set(&mut self, r: usize, c: usize, v: T) {
        debug_assert!(r < self.nrows && c < self.ncols);
        self.data[r * self.row_items + c] = v;
    }

    /// # Overview
    ///
    /// Mutable slices of the row pair `2k` / `2k+1`.
    ///
    /// The two slices are non-overlapping by construction; clause `k` owns
    /// exactly this pair, so feedback kernels can hold both mutably.
    #[inline]
    pub fn row_pair_mut(&mut self, k: usize) -> (&mut [T], &mut [T]) {
        debug_assert!(2 * k + 1 < self.nrows);
        let start = 2 * k * self.row_items;
        self.data[start..start + 2 * self.row_items].split_at_mut(self.row_items)
    }
}
