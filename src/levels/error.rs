//! Engine error types

use std::fmt;

/// Errors raised by the support/resistance engine.
///
/// The engine is deliberately permissive: malformed or sparse series
/// degrade to empty results. The only hard failure is deriving a default
/// reference price from a series with no closing data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    MissingCloseData,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::MissingCloseData => {
                write!(f, "no closing price data available")
            }
        }
    }
}

impl std::error::Error for LevelError {}
