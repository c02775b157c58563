//! Random number supply: seeded generators and the float draw cache.
//!
//! Feedback decisions consume uniform floats in a fixed, position-tracked
//! order. That order is part of the reproducibility contract: two runs with
//! identical seeds must replay bit-identical draw sequences.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Fast RNG suitable for no_std environments.
pub type FastRng = Xoshiro256PlusPlus;

/// # Overview
///
/// Creates a fast RNG seeded from a u64 value.
///
/// # Examples
///
/// ```
/// use tsetlin_core::rng::rng_from_seed;
///
/// let mut rng = rng_from_seed(42);
/// ```
#[inline]
pub fn rng_from_seed(seed: u64) -> FastRng {
    use rand::SeedableRng;
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// # Overview
///
/// Creates a fast RNG with entropy from the thread-local RNG.
#[cfg(feature = "std")]
#[inline]
pub fn rng_from_entropy() -> FastRng {
    use rand::SeedableRng;
    Xoshiro256PlusPlus::from_rng(&mut rand::rng())
}

/// # Overview
///
/// Pre-generated pool of uniform [0, 1) floats with a consumption cursor.
///
/// Kernels draw from the pool front-to-back via [`next_draw`]. The owning
/// driver calls [`refill`] before each stochastic kernel invocation; the pool
/// is sized to the worst-case per-clause consumption (two draws per feature),
/// so a refilled cache always covers a full kernel call.
///
/// [`next_draw`]: Self::next_draw
/// [`refill`]: Self::refill
#[derive(Debug, Clone)]
pub struct FloatCache {
    pool: Vec<f32>,
    pos:  usize
}

impl FloatCache {
    /// # Overview
    ///
    /// Creates a cache of `size` draws, filled from `rng`.
    #[must_use]
    pub fn new<R: Rng>(rng: &mut R, size: usize) -> Self {
        let pool = (0..size).map(|_| rng.random::<f32>()).collect();
        Self {
            pool,
            pos: 0
        }
    }

    /// Pool capacity.
    #[inline(always)]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    /// Current cursor position.
    #[inline(always)]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// # Overview
    ///
    /// Replaces consumed draws and resets the cursor.
    ///
    /// Unconsumed draws keep their relative order and move to the pool front;
    /// fresh draws fill the tail. A no-op when nothing has been consumed, so
    /// calling it before every kernel invocation is cheap.
    pub fn refill<R: Rng>(&mut self, rng: &mut R) {
        if self.pos == 0 {
            return;
        }
        for slot in &mut self.pool[..self.pos] {
            *slot = rng.random::<f32>();
        }
        self.pool.rotate_left(self.pos);
        self.pos = 0;
    }

    /// # Overview
    ///
    /// Returns the draw at the cursor and advances it.
    ///
    /// # Panics
    ///
    /// Panics if the pool is exhausted; the driver's refill policy guarantees
    /// this cannot happen within one kernel call.
    #[inline(always)]
    pub fn next_draw(&mut self) -> f32 {
        let v = self.pool[self.pos];
        self.pos += 1;
        v
    }
}
