//! rollout — multi-step autoregressive inference and time alignment.
//!
//! Purpose
//! -------
//! Bundle the inference half of a prediction call: planning how many
//! discrete model steps a continuous delay requires ([`plan`]), running the
//! autoregressive rollout with hidden-state threading and fractional-step
//! blending ([`predictor`]), and the module error surface ([`errors`]).
//! This is the algorithmic core of the crate — the step-count ceiling, the
//! remainder ratio, the normalization bracketing, and the buffer indexing
//! are all specified exactly and pinned by tests.
//!
//! Key behaviors
//! -------------
//! - [`RolloutPredictor::predict`] takes a validated uniform
//!   [`crate::resample::Window`], a [`crate::model::StepModel`], a
//!   [`crate::normalize::Normalizer`], and a delay, and returns the scalar
//!   prediction at `window.last_time + delay`.
//! - [`RolloutConfig`] / [`RoundingPolicy`] make the output numeric policy
//!   explicit configuration injected at construction.
//!
//! Conventions
//! -----------
//! - Hidden state never crosses a `predict` call; each prediction starts
//!   from `None` and derives its memory from the given window alone.
//! - Errors are deterministic and never retried; no logging is performed.

pub mod errors;
pub mod plan;
pub mod predictor;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{RolloutError, RolloutResult};
pub use self::plan::{MAX_STEPS, RolloutPlan};
pub use self::predictor::{RolloutConfig, RolloutPredictor, RoundingPolicy};
