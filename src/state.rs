//! Tsetlin automaton state: width-polymorphic counter matrices and the
//! derived signum cache.
//!
//! Each clause `k` owns two counter rows: row `2k` for the positive automata
//! (literals `x_j`) and row `2k+1` for the negative automata (literals
//! `¬x_j`). A counter lives in `[-n_states, n_states - 1]`; the automaton's
//! action is "include" exactly when the counter is non-negative. The signum
//! matrix caches that predicate one bit per automaton and is kept consistent
//! incrementally by the feedback kernels; only full initialization recomputes
//! it from scratch.

#[cfg(not(feature = "std"))]
use alloc::string::ToString;

use core::str::FromStr;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    bits::BitMatrix,
    error::{Error, Result},
    matrix::NumericMatrix,
    rng::FastRng
};

/// # Overview
///
/// Storage width of automaton counters.
///
/// Narrower widths trade `n_states` headroom for memory and bandwidth; the
/// training semantics are identical across widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CountingType {
    Int8,
    Int16,
    Int32
}

impl CountingType {
    /// # Overview
    ///
    /// Largest `n_states` the width can represent without wrapping.
    ///
    /// The counter range is `[-n_states, n_states - 1]`, so the binding
    /// bound is the negative end.
    #[inline]
    #[must_use]
    pub const fn max_states(self) -> i32 {
        match self {
            Self::Int8 => -(i8::MIN as i32),
            Self::Int16 => -(i16::MIN as i32),
            Self::Int32 => i32::MAX
        }
    }

    /// # Overview
    ///
    /// Validates that `n_states` fits this width.
    pub fn check_states(self, n_states: i32) -> Result<()> {
        if n_states <= 0 {
            return Err(Error::InvalidStates);
        }
        if n_states > self.max_states() {
            return Err(Error::StatesExceedWidth {
                n_states,
                max: self.max_states()
            });
        }
        Ok(())
    }
}

impl FromStr for CountingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int8" => Ok(Self::Int8),
            "int16" => Ok(Self::Int16),
            "int32" => Ok(Self::Int32),
            other => Err(Error::UnknownCountingType(other.to_string()))
        }
    }
}

/// # Overview
///
/// Automaton counter element. Implemented for `i8`, `i16` and `i32`.
///
/// Kernels are generic over this trait and instantiated once per public
/// entry call; no width branching happens inside per-feature loops.
pub trait Counter: Copy + Ord + Default + core::fmt::Debug + Send + Sync {
    const ZERO: Self;

    /// Converts from `i32`. Caller guarantees the value fits the width.
    fn from_i32(v: i32) -> Self;

    /// Widens to `i32`.
    fn to_i32(self) -> i32;

    /// Adds one. Caller guarantees no overflow.
    fn inc(self) -> Self;

    /// Subtracts one. Caller guarantees no overflow.
    fn dec(self) -> Self;
}

macro_rules! impl_counter {
    ($($t:ty),*) => {$(
        impl Counter for $t {
            const ZERO: Self = 0;

            #[inline(always)]
            fn from_i32(v: i32) -> Self {
                v as $t
            }

            #[inline(always)]
            fn to_i32(self) -> i32 {
                self as i32
            }

            #[inline(always)]
            fn inc(self) -> Self {
                self + 1
            }

            #[inline(always)]
            fn dec(self) -> Self {
                self - 1
            }
        }
    )*};
}

impl_counter!(i8, i16, i32);

/// # Overview
///
/// Closed sum type over the three counter matrix instantiations.
///
/// Public entry points match on this once and hand the concrete
/// `NumericMatrix<T>` to a generic worker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CounterMatrix {
    I8(NumericMatrix<i8>),
    I16(NumericMatrix<i16>),
    I32(NumericMatrix<i32>)
}

impl CounterMatrix {
    /// # Overview
    ///
    /// Creates a zeroed counter matrix of the given width.
    #[must_use]
    pub fn new(kind: CountingType, nrows: usize, ncols: usize) -> Self {
        match kind {
            CountingType::Int8 => Self::I8(NumericMatrix::new(nrows, ncols)),
            CountingType::Int16 => Self::I16(NumericMatrix::new(nrows, ncols)),
            CountingType::Int32 => Self::I32(NumericMatrix::new(nrows, ncols))
        }
    }

    /// Returns `(nrows, ncols)`.
    #[inline]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::I8(m) => m.shape(),
            Self::I16(m) => m.shape(),
            Self::I32(m) => m.shape()
        }
    }

    /// Active storage width.
    #[inline]
    #[must_use]
    pub const fn counting_type(&self) -> CountingType {
        match self {
            Self::I8(_) => CountingType::Int8,
            Self::I16(_) => CountingType::Int16,
            Self::I32(_) => CountingType::Int32
        }
    }

    /// Counter at `(r, c)`, widened to `i32`. Not for hot paths.
    #[inline]
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> i32 {
        match self {
            Self::I8(m) => m.get(r, c).to_i32(),
            Self::I16(m) => m.get(r, c).to_i32(),
            Self::I32(m) => m.get(r, c)
        }
    }

    /// Stores a counter at `(r, c)`, narrowing from `i32`. Not for hot paths.
    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: i32) {
        match self {
            Self::I8(m) => m.set(r, c, Counter::from_i32(v)),
            Self::I16(m) => m.set(r, c, Counter::from_i32(v)),
            Self::I32(m) => m.set(r, c, v)
        }
    }
}

fn initialize_counters<R: Rng>(matrix: &mut CounterMatrix, igen: &mut R) {
    fn fill<T: Counter, R: Rng>(m: &mut NumericMatrix<T>, igen: &mut R) {
        let (nrows, ncols) = m.shape();
        for r in 0..nrows {
            let row = m.row_mut(r);
            for item in row.iter_mut().take(ncols) {
                // Automata start adjacent to the include/exclude boundary.
                *item = T::from_i32(igen.random_range(-1..=0));
            }
        }
    }

    match matrix {
        CounterMatrix::I8(m) => fill(m, igen),
        CounterMatrix::I16(m) => fill(m, igen),
        CounterMatrix::I32(m) => fill(m, igen)
    }
}

fn signum_from_counters(matrix: &CounterMatrix, signum: &mut BitMatrix) {
    fn scan<T: Counter>(m: &NumericMatrix<T>, signum: &mut BitMatrix) {
        let (nrows, ncols) = m.shape();
        for r in 0..nrows {
            let row = m.row(r);
            for c in 0..ncols {
                if row[c] < T::ZERO {
                    signum.clear(r, c);
                } else {
                    signum.set(r, c);
                }
            }
        }
    }

    match matrix {
        CounterMatrix::I8(m) => scan(m, signum),
        CounterMatrix::I16(m) => scan(m, signum),
        CounterMatrix::I32(m) => scan(m, signum)
    }
}

/// # Overview
///
/// Automaton state for one estimator: counters only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TAState {
    pub matrix: CounterMatrix
}

impl TAState {
    /// # Overview
    ///
    /// Allocates and randomly initializes the counter matrix.
    ///
    /// Rows are `2 * n_clauses` (a positive/negative row pair per clause),
    /// columns `n_features`. Each counter is drawn uniformly from {-1, 0}.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCountingType`] for an unrecognized `counting_type`.
    pub fn initialize(
        counting_type: &str,
        n_clauses: usize,
        n_features: usize,
        igen: &mut FastRng
    ) -> Result<Self> {
        let kind = CountingType::from_str(counting_type)?;
        let mut matrix = CounterMatrix::new(kind, 2 * n_clauses, n_features);
        initialize_counters(&mut matrix, igen);

        Ok(Self {
            matrix
        })
    }
}

/// # Overview
///
/// Automaton state paired with the packed signum cache.
///
/// The signum bit at `(r, c)` is 1 iff the counter at `(r, c)` is
/// non-negative. The feedback kernels flip bits exactly on zero-boundary
/// crossings, keeping the cache consistent without recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TAStateWithSignum {
    pub matrix: CounterMatrix,
    pub signum: BitMatrix
}

impl TAStateWithSignum {
    /// # Overview
    ///
    /// Allocates both matrices, randomly initializes the counters, and
    /// computes the initial signum bits from scratch.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCountingType`] for an unrecognized `counting_type`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsetlin_core::{TAStateWithSignum, rng::rng_from_seed};
    ///
    /// let mut igen = rng_from_seed(42);
    /// let state = TAStateWithSignum::initialize("int16", 10, 4, &mut igen).unwrap();
    /// assert_eq!(state.matrix.shape(), (20, 4));
    /// ```
    pub fn initialize(
        counting_type: &str,
        n_clauses: usize,
        n_features: usize,
        igen: &mut FastRng
    ) -> Result<Self> {
        let kind = CountingType::from_str(counting_type)?;
        let mut matrix = CounterMatrix::new(kind, 2 * n_clauses, n_features);
        initialize_counters(&mut matrix, igen);

        let mut signum = BitMatrix::new(2 * n_clauses, n_features);
        signum_from_counters(&matrix, &mut signum);

        Ok(Self {
            matrix,
            signum
        })
    }

    /// Number of clauses (half the row count).
    #[inline]
    #[must_use]
    pub fn n_clauses(&self) -> usize {
        self.matrix.shape().0 / 2
    }

    /// Number of features (column count).
    #[inline]
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.matrix.shape().1
    }

    /// # Overview
    ///
    /// Checks the signum invariant over the whole state.
    ///
    /// Intended for tests and debugging; the hot path never calls this.
    #[must_use]
    pub fn signum_is_consistent(&self) -> bool {
        let (nrows, ncols) = self.matrix.shape();
        for r in 0..nrows {
            for c in 0..ncols {
                if self.signum.test(r, c) != (self.matrix.get(r, c) >= 0) {
                    return false;
                }
            }
        }
        true
    }
}
