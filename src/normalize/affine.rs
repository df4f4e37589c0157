//! Normalizer contract and the fitted mean/scale implementation.
//!
//! Purpose
//! -------
//! Define the two-operation normalization contract the rollout predictor
//! depends on — `normalize` into model space and `denormalize` back into
//! signal space, round-trip inverse within floating tolerance — and provide
//! the production implementation: an affine mean/scale transform whose
//! parameters were fitted externally during training and are immutable for
//! the lifetime of an evaluation run.
//!
//! Key behaviors
//! -------------
//! - [`Normalizer`] is a capability trait: the predictor treats any
//!   implementor as opaque and only relies on the round-trip property
//!   `denormalize(normalize(x)) ≈ x` (tolerance 1e-5 over the fitted
//!   domain).
//! - [`MeanScaleNormalizer`] validates its fitted parameters once at
//!   construction; both operations are then elementwise affine maps that
//!   fail only on an empty input.
//!
//! Invariants & assumptions
//! ------------------------
//! - `mean` is finite; `scale` is finite and nonzero (invertibility).
//! - Implementations must not mutate internal state in `normalize` /
//!   `denormalize`; the predictor shares one normalizer by reference across
//!   all prediction calls.
//!
//! Downstream usage
//! ----------------
//! - The rollout predictor brackets every rollout with one `normalize` of
//!   the input window and one `denormalize` of the full rollout buffer.
//! - Fitted parameters come from the training pipeline's preprocessor
//!   state; loading/parsing that state is out of scope here.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the round-trip property, exact forward arithmetic,
//!   parameter rejections, and the empty-input domain error.
use crate::normalize::errors::{NormalizeError, NormalizeResult};
use ndarray::{Array1, ArrayView1};

/// Opaque normalization capability used by the rollout predictor.
///
/// `normalize` maps raw signal values into the model's input space and
/// `denormalize` inverts it: `denormalize(normalize(x)) == x` within 1e-5
/// for all `x` in the fitted domain. Implementations must be pure with
/// respect to `&self` so a single instance can be shared across prediction
/// calls (and threads) without locking.
pub trait Normalizer {
    /// Map raw signal values into normalized model space.
    fn normalize(&self, x: ArrayView1<f64>) -> NormalizeResult<Array1<f64>>;

    /// Invert [`Normalizer::normalize`], mapping model-space values back to
    /// the signal's raw units.
    fn denormalize(&self, x: ArrayView1<f64>) -> NormalizeResult<Array1<f64>>;
}

/// `MeanScaleNormalizer` — fitted affine transform `x' = (x - mean) / scale`.
///
/// Purpose
/// -------
/// Production [`Normalizer`]: the mean/scale standardization fitted by the
/// training preprocessor, frozen for evaluation.
///
/// Fields
/// ------
/// - `mean`: `f64`
///   Fitted shift; finite.
/// - `scale`: `f64`
///   Fitted scale; finite and nonzero.
///
/// Invariants
/// ----------
/// - Parameters are validated at construction and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanScaleNormalizer {
    mean: f64,
    scale: f64,
}

impl MeanScaleNormalizer {
    /// Construct a validated mean/scale normalizer.
    ///
    /// Parameters
    /// ----------
    /// - `mean`: `f64`
    ///   Fitted shift; must be finite.
    /// - `scale`: `f64`
    ///   Fitted scale; must be finite and nonzero.
    ///
    /// Errors
    /// ------
    /// - `NormalizeError::NonFiniteParam` for a NaN/±inf parameter.
    /// - `NormalizeError::ZeroScale` for `scale == 0`.
    pub fn new(mean: f64, scale: f64) -> NormalizeResult<Self> {
        if !mean.is_finite() {
            return Err(NormalizeError::NonFiniteParam { name: "mean", value: mean });
        }
        if !scale.is_finite() {
            return Err(NormalizeError::NonFiniteParam { name: "scale", value: scale });
        }
        if scale == 0.0 {
            return Err(NormalizeError::ZeroScale);
        }
        Ok(MeanScaleNormalizer { mean, scale })
    }

    /// The identity transform (`mean = 0`, `scale = 1`); convenient for
    /// callers whose model was trained on raw units.
    pub fn identity() -> Self {
        MeanScaleNormalizer { mean: 0.0, scale: 1.0 }
    }

    /// Fitted shift.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Fitted scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Normalizer for MeanScaleNormalizer {
    fn normalize(&self, x: ArrayView1<f64>) -> NormalizeResult<Array1<f64>> {
        if x.is_empty() {
            return Err(NormalizeError::EmptyInput);
        }
        Ok(x.mapv(|v| (v - self.mean) / self.scale))
    }

    fn denormalize(&self, x: ArrayView1<f64>) -> NormalizeResult<Array1<f64>> {
        if x.is_empty() {
            return Err(NormalizeError::EmptyInput);
        }
        Ok(x.mapv(|v| v * self.scale + self.mean))
    }
}
