//! Error types for the automata core.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use core::fmt;

/// # Overview
///
/// Errors that can occur when configuring or initializing the automata core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MissingClauses,
    MissingFeatures,
    InvalidStates,
    InvalidSpecificity,
    UnknownCountingType(String),
    StatesExceedWidth { n_states: i32, max: i32 }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingClauses => write!(f, "n_clauses is required"),
            Self::MissingFeatures => write!(f, "n_features is required"),
            Self::InvalidStates => write!(f, "n_states must be > 0"),
            Self::InvalidSpecificity => write!(f, "s must be > 1.0"),
            Self::UnknownCountingType(name) => {
                write!(f, "unknown counting type: {name} (expected int8, int16 or int32)")
            }
            Self::StatesExceedWidth {
                n_states,
                max
            } => {
                write!(f, "n_states {n_states} exceeds counter width limit {max}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// # Overview
///
/// Result type for automata core operations.
pub type Result<T> = core::result::Result<T, Error>;
