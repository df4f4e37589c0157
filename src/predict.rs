//! One-call prediction entry point: irregular history in, scalar out.
//!
//! Purpose
//! -------
//! Provide the single function most callers need: give it a trained step
//! model, a fitted normalizer, raw irregular history, the model's native
//! sampling interval, a prediction delay, and a window length, and get back
//! the predicted signal value at `last_timestamp + delay`. Internally this
//! is exactly resample-then-rollout with default configuration; callers
//! needing a rounding policy construct a [`RolloutPredictor`] themselves.
//!
//! Key behaviors
//! -------------
//! - Deterministic given a deterministic model and normalizer.
//! - [`PredictError`] folds the two phase-specific error surfaces into one
//!   caller-facing type via `From`, so `?` composes across the phases.
use crate::{
    model::step::StepModel,
    normalize::affine::Normalizer,
    resample::{errors::ResampleError, grid::resample_window},
    rollout::{
        errors::RolloutError,
        predictor::{RolloutConfig, RolloutPredictor},
    },
};

/// Error surface of the one-call entry point: either phase's failure,
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Resampling the irregular history onto the model grid failed.
    Resample(ResampleError),

    /// The rollout itself failed.
    Rollout(RolloutError),
}

pub type PredictResult<T> = Result<T, PredictError>;

impl From<ResampleError> for PredictError {
    fn from(err: ResampleError) -> Self {
        PredictError::Resample(err)
    }
}

impl From<RolloutError> for PredictError {
    fn from(err: RolloutError) -> Self {
        PredictError::Rollout(err)
    }
}

impl std::error::Error for PredictError {}

impl std::fmt::Display for PredictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictError::Resample(err) => write!(f, "{err}"),
            PredictError::Rollout(err) => write!(f, "{err}"),
        }
    }
}

/// Convert a [`PredictError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<PredictError> for pyo3::PyErr {
    fn from(err: PredictError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

/// Predict the signal value a continuous delay past the last observation.
///
/// Parameters
/// ----------
/// - `model`: `&M`
///   Trained step model (shared read-only; hidden state is internal to this
///   call).
/// - `normalizer`: `&N`
///   Fitted normalizer, immutable for the evaluation run.
/// - `timestamps`: `&[f64]`
///   Observation times, strictly increasing, length ≥ 2.
/// - `values`: `&[f64]`
///   Observed values, same length as `timestamps`.
/// - `dt_new`: `f64`
///   The model's native sampling interval; finite and > 0.
/// - `delay`: `f64`
///   Time offset into the future from `timestamps[last]`; finite and ≥ 0.
/// - `seq_len`: `usize`
///   Model window length; > 0.
///
/// Returns
/// -------
/// `PredictResult<f64>`
///   The predicted value at `timestamps[last] + delay`.
///
/// Errors
/// ------
/// - `PredictError::Resample` for history/grid problems
///   (`InsufficientHistory`, `LengthMismatch`, `InvalidInterval`,
///   `EmptyWindow`).
/// - `PredictError::Rollout` for inference problems (`InvalidDelay`,
///   `ExcessiveDelay`, `ModelStep`, `OutputLengthMismatch`,
///   `NormalizationDomain`).
pub fn predict<M, N>(
    model: &M, normalizer: &N, timestamps: &[f64], values: &[f64], dt_new: f64, delay: f64,
    seq_len: usize,
) -> PredictResult<f64>
where
    M: StepModel,
    N: Normalizer,
{
    let window = resample_window(timestamps, values, dt_new, seq_len)?;
    let predictor = RolloutPredictor::new(RolloutConfig::default());
    let prediction = predictor.predict(model, normalizer, &window, delay)?;
    Ok(prediction)
}
