//! Unified error handling for step-model implementations.
//!
//! This module defines `ModelError`, the error type produced by
//! [`StepModel`] implementations, and the `ModelResult<T>` alias. The
//! rollout layer wraps these with the failing step index; see
//! `RolloutError::ModelStep`.
//!
//! [`StepModel`]: crate::model::StepModel

/// Unified error type for step-model implementations.
///
/// Covers weight/state shape violations, degenerate inputs, and a generic
/// passthrough for external model backends. Designed to integrate with
/// `anyhow::Error` via `From`, mirroring how opaque third-party inference
/// failures are surfaced.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Shape validation ----
    /// A weight matrix or state vector has an unexpected dimension.
    ShapeMismatch { what: &'static str, expected: usize, actual: usize },

    /// The input window is empty; a sequence model needs at least one sample.
    EmptyWindow,

    // ---- Anyhow catchall ----
    External(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<anyhow::Error> for ModelError {
    fn from(err: anyhow::Error) -> Self {
        ModelError::External(err.to_string())
    }
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape validation ----
            ModelError::ShapeMismatch { what, expected, actual } => {
                write!(f, "Model Error: {what} has dimension {actual}, expected {expected}")
            }
            ModelError::EmptyWindow => {
                write!(f, "Model Error: input window is empty")
            }

            // ---- Anyhow catchall ----
            ModelError::External(msg) => write!(f, "Model Error: {msg}"),
        }
    }
}

/// Convert a [`ModelError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ModelError> for pyo3::PyErr {
    fn from(err: ModelError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
