//! Per-estimator scratch state.
//!
//! The voting stage fills `clause_output` and `feedback_to_clauses`; the
//! trainer consumes them together with the float cache. All three are sized
//! from the active [`Config`] and rebuilt by [`reset`](EstimatorStateCache::reset)
//! whenever the clause or feature count changes.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::{config::Config, rng::FloatCache};

use rand::Rng;

/// # Overview
///
/// Reusable per-estimator buffers: one output slot and one feedback slot per
/// clause, plus the float draw cache sized to the worst-case per-clause
/// consumption (two draws per feature).
#[derive(Debug, Clone)]
pub struct EstimatorStateCache {
    pub clause_output:       Vec<bool>,
    pub feedback_to_clauses: Vec<i32>,
    pub fcache:              FloatCache
}

impl EstimatorStateCache {
    /// # Overview
    ///
    /// Allocates buffers sized to `config`.
    #[must_use]
    pub fn new<R: Rng>(config: &Config, fgen: &mut R) -> Self {
        Self {
            clause_output:       vec![false; config.n_clauses],
            feedback_to_clauses: vec![0; config.n_clauses],
            fcache:              FloatCache::new(fgen, 2 * config.n_features)
        }
    }

    /// # Overview
    ///
    /// Resizes the buffers for a changed configuration and redraws the float
    /// cache. Called whenever hyperparameters change.
    pub fn reset<R: Rng>(&mut self, config: &Config, fgen: &mut R) {
        self.clause_output.clear();
        self.clause_output.resize(config.n_clauses, false);
        self.feedback_to_clauses.clear();
        self.feedback_to_clauses.resize(config.n_clauses, 0);
        self.fcache = FloatCache::new(fgen, 2 * config.n_features);
    }

    /// # Overview
    ///
    /// Structural equality: same buffer shapes, contents ignored.
    #[must_use]
    pub fn shapes_match(&self, other: &Self) -> bool {
        self.clause_output.len() == other.clause_output.len()
            && self.feedback_to_clauses.len() == other.feedback_to_clauses.len()
            && self.fcache.capacity() == other.fcache.capacity()
    }
}
