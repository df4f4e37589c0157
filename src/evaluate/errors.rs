//! Unified error handling for evaluation routines.
//!
//! This module defines `EvalError`, the error type shared by the metric
//! functions and the sliding-window evaluation driver, and the
//! `EvalResult<T>` alias. Prediction failures inside the driver pass
//! through unchanged via the `Prediction` variant.
use crate::{predict::PredictError, resample::errors::ResampleError};

/// Unified error type for evaluation routines.
///
/// Covers series-shape problems, degenerate metric inputs, invalid filter
/// settings, and passthrough prediction failures from the driver loop.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    // ---- Series validation ----
    /// Compared series have different lengths.
    LengthMismatch { left: usize, right: usize },

    /// A metric was requested over an empty series.
    EmptySeries,

    /// The history is too short to form a single evaluation window.
    HistoryTooShort { needed: usize, actual: usize },

    /// The two series share no time overlap to align on.
    NoOverlap,

    // ---- Metric domains ----
    /// Ground truth is constant; variance explained is undefined.
    ConstantTruth,

    /// High-pass cutoff must be finite, positive, and below Nyquist.
    InvalidCutoff { fs: f64, cutoff_hz: f64 },

    // ---- Driver ----
    /// A prediction inside the sliding loop failed; carries the window
    /// index for diagnosis.
    Prediction { window: usize, source: PredictError },

    /// Series alignment could not build its interpolants.
    Resample(ResampleError),
}

pub type EvalResult<T> = Result<T, EvalError>;

impl From<ResampleError> for EvalError {
    fn from(source: ResampleError) -> Self {
        EvalError::Resample(source)
    }
}

impl std::error::Error for EvalError {}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Series validation ----
            EvalError::LengthMismatch { left, right } => {
                write!(f, "Evaluation Error: series length mismatch ({left} vs {right})")
            }
            EvalError::EmptySeries => {
                write!(f, "Evaluation Error: series is empty")
            }
            EvalError::HistoryTooShort { needed, actual } => {
                write!(
                    f,
                    "Evaluation Error: history has {actual} samples, need at least {needed} for one window"
                )
            }
            EvalError::NoOverlap => {
                write!(f, "Evaluation Error: series share no time overlap to align on")
            }

            // ---- Metric domains ----
            EvalError::ConstantTruth => {
                write!(f, "Evaluation Error: ground truth is constant; variance explained is undefined")
            }
            EvalError::InvalidCutoff { fs, cutoff_hz } => {
                write!(
                    f,
                    "Evaluation Error: cutoff {cutoff_hz} Hz invalid for sampling rate {fs} Hz (must be finite, > 0, and below Nyquist)"
                )
            }

            // ---- Driver ----
            EvalError::Prediction { window, source } => {
                write!(f, "Evaluation Error: prediction failed at window {window}: {source}")
            }
            EvalError::Resample(source) => {
                write!(f, "Evaluation Error: {source}")
            }
        }
    }
}

/// Convert an [`EvalError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<EvalError> for pyo3::PyErr {
    fn from(err: EvalError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
