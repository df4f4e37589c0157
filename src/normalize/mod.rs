//! normalize — the fitted normalization contract bracketing every rollout.
//!
//! The rollout predictor normalizes its input window before inference and
//! denormalizes the rollout buffer afterwards; this module supplies the
//! [`Normalizer`] capability trait it depends on, the production
//! [`MeanScaleNormalizer`] implementation, and the module error surface.
//! Fitting happens externally in the training pipeline; here the parameters
//! are validated once and frozen.

pub mod affine;
pub mod errors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::affine::{MeanScaleNormalizer, Normalizer};
pub use self::errors::{NormalizeError, NormalizeResult};
