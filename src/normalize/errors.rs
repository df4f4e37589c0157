//! Unified error handling for normalization routines.
//!
//! This module defines `NormalizeError`, used by the [`Normalizer`] trait
//! and its production implementation, and the `NormalizeResult<T>` alias.
//!
//! [`Normalizer`]: crate::normalize::Normalizer

/// Unified error type for normalization routines.
///
/// Covers invalid fitted parameters at construction time and inputs outside
/// the transform's domain at call time.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeError {
    // ---- Fitted-parameter validation ----
    /// A fitted parameter is NaN/±inf.
    NonFiniteParam { name: &'static str, value: f64 },

    /// The fitted scale is zero (the transform would not be invertible).
    ZeroScale,

    // ---- Domain ----
    /// The transform is undefined for an empty input.
    EmptyInput,

    /// The transform changed the input length, violating the elementwise
    /// contract the rollout predictor depends on.
    LengthChanged { expected: usize, actual: usize },
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

impl std::error::Error for NormalizeError {}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Fitted-parameter validation ----
            NormalizeError::NonFiniteParam { name, value } => {
                write!(f, "Normalize Error: fitted parameter {name} must be finite, got {value}")
            }
            NormalizeError::ZeroScale => {
                write!(f, "Normalize Error: fitted scale must be nonzero for invertibility")
            }

            // ---- Domain ----
            NormalizeError::EmptyInput => {
                write!(f, "Normalize Error: transform is undefined for an empty input")
            }
            NormalizeError::LengthChanged { expected, actual } => {
                write!(
                    f,
                    "Normalize Error: transform changed the input length from {expected} to {actual}"
                )
            }
        }
    }
}

/// Convert a [`NormalizeError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<NormalizeError> for pyo3::PyErr {
    fn from(err: NormalizeError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
