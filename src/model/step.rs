//! Step-model capability: the recurrent sequence model as a single trait.
//!
//! Purpose
//! -------
//! Define the one interface the rollout predictor needs from a trained
//! sequence model. The model is a stateful step function
//! `(window, hidden) -> (output, hidden)`: given a normalized history window
//! of length `L` and optional recurrent memory, it produces an output of
//! length `L` whose last element is the one-step-ahead prediction, plus the
//! memory to thread into the next call. No inheritance hierarchy, no
//! framework coupling — any implementor is a valid model.
//!
//! Key behaviors
//! -------------
//! - `type Hidden` keeps the recurrent memory opaque to the rollout loop,
//!   which only moves it between consecutive calls.
//! - `step` takes `Option<Self::Hidden>`: `None` means "start fresh from
//!   this window alone", which the rollout loop uses on its first iteration.
//!
//! Invariants & assumptions
//! ------------------------
//! - `output.len() == window.len()`; the rollout loop verifies this and
//!   fails the prediction otherwise.
//! - `step` must not mutate shared model parameters (`&self`); hidden state
//!   is the only mutable quantity and it is owned by the caller between
//!   calls.
//! - Hidden state is valid only within one rollout: it must not be reused
//!   across prediction calls or shared across threads.
//!
//! Downstream usage
//! ----------------
//! - Production implementation: [`crate::model::LstmStepModel`].
//! - Deterministic test doubles implement this trait inside test modules to
//!   pin rollout arithmetic and hidden-state threading.
use crate::model::errors::ModelResult;
use ndarray::{Array1, ArrayView1};

/// Opaque stateful sequence model used by the rollout loop.
///
/// `step(window, hidden)` maps a length-`L` normalized window and optional
/// recurrent memory to a length-`L` output and the successor memory.
/// `output[L - 1]` is the model's one-step-ahead prediction following the
/// window. Implementations report failures through [`ModelResult`]; the
/// rollout layer never retries a failed step.
pub trait StepModel {
    /// Recurrent memory threaded between sequential `step` calls within one
    /// rollout.
    type Hidden;

    /// Run the model over one window.
    ///
    /// Parameters
    /// ----------
    /// - `window`: `ArrayView1<f64>`
    ///   Normalized history, oldest → newest, length ≥ 1.
    /// - `hidden`: `Option<Self::Hidden>`
    ///   Memory from the previous call in this rollout, or `None` to start
    ///   fresh.
    ///
    /// Returns
    /// -------
    /// `ModelResult<(Array1<f64>, Self::Hidden)>`
    ///   The per-position output (same length as `window`) and the memory
    ///   for the next call.
    fn step(
        &self, window: ArrayView1<f64>, hidden: Option<Self::Hidden>,
    ) -> ModelResult<(Array1<f64>, Self::Hidden)>;
}
