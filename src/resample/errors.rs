//! Unified error handling for resampling routines.
//!
//! This module defines `ResampleError`, the central error type used by the
//! linear interpolant and the uniform-grid window builder. An alias
//! `ResampleResult<T>` standardizes the return type across resampling code.

/// Unified error type for resampling routines.
///
/// Covers interpolant construction failures and invalid grid requests.
/// Duplicate or non-increasing timestamps are a documented caller
/// responsibility and are *not* detected here; they yield an undefined
/// interpolation result rather than a runtime error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResampleError {
    // ---- Interpolant construction ----
    /// Fewer than two input samples; linear interpolation is undefined.
    InsufficientHistory { len: usize },

    /// Timestamp and value sequences have different lengths.
    LengthMismatch { times: usize, values: usize },

    // ---- Grid requests ----
    /// Target sampling interval is non-positive or non-finite.
    InvalidInterval { dt: f64 },

    /// Requested window length is zero.
    EmptyWindow,
}

pub type ResampleResult<T> = Result<T, ResampleError>;

impl std::error::Error for ResampleError {}

impl std::fmt::Display for ResampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Interpolant construction ----
            ResampleError::InsufficientHistory { len } => {
                write!(
                    f,
                    "Resample Error: at least 2 history samples are required for interpolation, got {len}"
                )
            }
            ResampleError::LengthMismatch { times, values } => {
                write!(
                    f,
                    "Resample Error: timestamp/value length mismatch ({times} timestamps, {values} values)"
                )
            }

            // ---- Grid requests ----
            ResampleError::InvalidInterval { dt } => {
                write!(f, "Resample Error: sampling interval must be finite and > 0, got {dt}")
            }
            ResampleError::EmptyWindow => {
                write!(f, "Resample Error: requested window length is zero")
            }
        }
    }
}

/// Convert a [`ResampleError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ResampleError> for pyo3::PyErr {
    fn from(err: ResampleError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
