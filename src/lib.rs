//! # Tsetlin Automata Core
//!
//! Bitwise training and inference engine for Tsetlin-machine-style
//! learners: packed-bit clause evaluation, the three stochastic feedback
//! kernels, width-polymorphic automaton state with a derived signum cache,
//! and a position-tracked random draw supply.
//!
//! # Features
//!
//! - `std` (default): Standard library support
//! - `parallel`: Parallel clause evaluation via rayon
//! - `serde`: Serialization support
//!
//! # Examples
//!
//! ```
//! use tsetlin_core::{Config, TAStateWithSignum, BitVector};
//! use tsetlin_core::rng::rng_from_seed;
//!
//! let config = Config::builder().clauses(10).features(4).build().unwrap();
//!
//! let mut igen = rng_from_seed(42);
//! let state = TAStateWithSignum::initialize(
//!     "int16",
//!     config.n_clauses,
//!     config.n_features,
//!     &mut igen
//! )
//! .unwrap();
//!
//! let x = BitVector::from_bits(&[1, 0, 1, 0]);
//! let mut outputs = vec![false; config.n_clauses];
//! tsetlin_core::evaluate_clause_outputs(&state, &x, 0..10, config.n_jobs, &mut outputs);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod bits;
mod cache;
mod config;
pub mod error;
mod eval;
mod feedback;
mod matrix;
mod parallel;
pub mod rng;
mod state;
mod trainer;

pub use bits::{ALIGNMENT, BLOCK_BITS, BitMatrix, BitRowMut, BitVector};
pub use cache::EstimatorStateCache;
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use eval::{BATCH_SIZE, evaluate_clause_outputs, evaluate_clause_outputs_for_predict};
pub use matrix::NumericMatrix;
pub use rng::{FastRng, FloatCache};
pub use state::{Counter, CounterMatrix, CountingType, TAState, TAStateWithSignum};
pub use trainer::{train_classifier_automata, train_regressor_automata};
