//! Unified error handling for rollout inference.
//!
//! This module defines `RolloutError`, the error surface of the rollout
//! predictor, and the `RolloutResult<T>` alias. Model failures carry the
//! rollout step index at which they occurred for diagnosis; nothing is ever
//! retried, because every failure here is a deterministic function of the
//! inputs.
use crate::{model::errors::ModelError, normalize::errors::NormalizeError};

/// Unified error type for rollout inference.
///
/// Covers invalid prediction delays, step-model failures during the
/// autoregressive loop (wrapped with the failing step index), model output
/// shape violations, and normalizer domain failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RolloutError {
    // ---- Request validation ----
    /// Requested prediction delay is negative or non-finite.
    InvalidDelay { delay: f64 },

    /// Requested delay implies more autoregressive steps than the rollout
    /// limit; keeps the rollout buffer allocation bounded.
    ExcessiveDelay { delay: f64, dt: f64 },

    /// Unrecognized rounding-policy name.
    InvalidRoundingPolicy { name: String },

    // ---- Rollout loop ----
    /// The step model failed at rollout iteration `step`. Not retried: a
    /// corrupted hidden state or shape mismatch reproduces deterministically.
    ModelStep { step: usize, source: ModelError },

    /// The step model returned an output whose length differs from its
    /// input window.
    OutputLengthMismatch { step: usize, expected: usize, actual: usize },

    // ---- Normalization ----
    /// The normalizer was undefined for the given input.
    NormalizationDomain { source: NormalizeError },
}

pub type RolloutResult<T> = Result<T, RolloutError>;

impl From<NormalizeError> for RolloutError {
    fn from(source: NormalizeError) -> Self {
        RolloutError::NormalizationDomain { source }
    }
}

impl std::error::Error for RolloutError {}

impl std::fmt::Display for RolloutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Request validation ----
            RolloutError::InvalidDelay { delay } => {
                write!(f, "Rollout Error: prediction delay must be finite and >= 0, got {delay}")
            }
            RolloutError::ExcessiveDelay { delay, dt } => {
                write!(
                    f,
                    "Rollout Error: delay {delay} at interval {dt} exceeds the rollout limit of {} steps",
                    crate::rollout::plan::MAX_STEPS
                )
            }
            RolloutError::InvalidRoundingPolicy { name } => {
                write!(
                    f,
                    "Rollout Error: invalid rounding policy {name:?} (expected 'exact', 'nearest', or 'truncate')"
                )
            }

            // ---- Rollout loop ----
            RolloutError::ModelStep { step, source } => {
                write!(f, "Rollout Error: step model failed at rollout step {step}: {source}")
            }
            RolloutError::OutputLengthMismatch { step, expected, actual } => {
                write!(
                    f,
                    "Rollout Error: model output at step {step} has length {actual}, expected {expected}"
                )
            }

            // ---- Normalization ----
            RolloutError::NormalizationDomain { source } => {
                write!(f, "Rollout Error: normalizer undefined for input: {source}")
            }
        }
    }
}

/// Convert a [`RolloutError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<RolloutError> for pyo3::PyErr {
    fn from(err: RolloutError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
