//! Configuration and builder for the automata core.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    state::CountingType
};

/// # Overview
///
/// Hyperparameters consumed by the automata core.
///
/// Created once per estimator; the state matrices and scratch caches are
/// sized from these values and reset whenever they change.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub struct Config {
    pub n_clauses:     usize,
    pub n_features:    usize,
    pub n_states:      i32,
    pub s:             f32,
    pub boost_true_positive_feedback: bool,
    pub n_jobs:        usize,
    pub counting_type: CountingType
}

impl Config {
    /// # Overview
    ///
    /// Creates a new ConfigBuilder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// # Overview
    ///
    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.n_clauses == 0 {
            return Err(Error::MissingClauses);
        }
        if self.n_features == 0 {
            return Err(Error::MissingFeatures);
        }
        if self.s <= 1.0 {
            return Err(Error::InvalidSpecificity);
        }
        self.counting_type.check_states(self.n_states)?;
        Ok(())
    }

    /// # Overview
    ///
    /// Pre-computed weaken probability `1/s` used by the feedback kernels.
    #[inline]
    #[must_use]
    pub fn s_inv(&self) -> f32 {
        1.0 / self.s
    }
}

/// # Overview
///
/// Builder for Config with validation.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    n_clauses:     Option<usize>,
    n_features:    Option<usize>,
    n_states:      Option<i32>,
    s:             Option<f32>,
    boost:         Option<bool>,
    n_jobs:        Option<usize>,
    counting_type: Option<CountingType>
}

impl ConfigBuilder {
    /// # Overview
    ///
    /// Sets the number of clauses.
    pub fn clauses(mut self, n: usize) -> Self {
        self.n_clauses = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets the number of input features.
    pub fn features(mut self, n: usize) -> Self {
        self.n_features = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets states per automaton action (default: 100).
    pub fn states(mut self, n: i32) -> Self {
        self.n_states = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets specificity parameter s (default: 3.9).
    pub fn specificity(mut self, s: f32) -> Self {
        self.s = Some(s);
        self
    }

    /// # Overview
    ///
    /// Enables deterministic reward of true-positive automata (default: off).
    pub fn boost_true_positive_feedback(mut self, on: bool) -> Self {
        self.boost = Some(on);
        self
    }

    /// # Overview
    ///
    /// Sets the evaluator worker count (default: 1).
    ///
    /// Zero means "all available cores" and is normalized at build time
    /// under `std`; without `std` it falls back to 1.
    pub fn jobs(mut self, n: usize) -> Self {
        self.n_jobs = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets the counter storage width (default: int32).
    pub fn counting_type(mut self, t: CountingType) -> Self {
        self.counting_type = Some(t);
        self
    }

    /// # Overview
    ///
    /// Builds and validates the Config.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            n_clauses:     self.n_clauses.ok_or(Error::MissingClauses)?,
            n_features:    self.n_features.ok_or(Error::MissingFeatures)?,
            n_states:      self.n_states.unwrap_or(100),
            s:             self.s.unwrap_or(3.9),
            boost_true_positive_feedback: self.boost.unwrap_or(false),
            n_jobs:        normalize_jobs(self.n_jobs.unwrap_or(1)),
            counting_type: self.counting_type.unwrap_or(CountingType::Int32)
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "std")]
fn normalize_jobs(n: usize) -> usize {
    if n == 0 {
        std::thread::available_parallelism().map_or(1, usize::from)
    } else {
        n
    }
}

#[cfg(not(feature = "std"))]
fn normalize_jobs(n: usize) -> usize {
    n.max(1)
}
