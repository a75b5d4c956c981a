//! Configuration-boundary error types.
//!
//! The simulation itself has no failure paths: full pools drop spawns and
//! invalid indices are ignored. Errors only surface when settings or tuning
//! data are loaded from outside the crate.

use std::fmt;

/// Top-level error enum for the simulation crate.
#[derive(Debug)]
pub enum SimError {
    /// Settings or tuning JSON could not be parsed.
    Parse(serde_json::Error),

    /// A configuration value is outside its accepted range.
    InvalidValue {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Parse(err) => write!(f, "failed to parse configuration: {}", err),
            SimError::InvalidValue {
                name,
                value,
                expected,
            } => write!(f, "'{}' = {} is outside accepted range {}", name, value, expected),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Parse(err) => Some(err),
            SimError::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Parse(err)
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

/// Returns an error unless `value` is strictly positive.
pub fn ensure_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidValue {
            name,
            value,
            expected: "(0, ∞)",
        })
    }
}

/// Returns an error unless `value` is zero or positive.
pub fn ensure_non_negative(name: &'static str, value: f32) -> SimResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidValue {
            name,
            value,
            expected: "[0, ∞)",
        })
    }
}

/// Returns an error unless `value` lies in `[min, max]`.
pub fn ensure_in_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
    expected: &'static str,
) -> SimResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidValue {
            name,
            value,
            expected,
        })
    }
}
