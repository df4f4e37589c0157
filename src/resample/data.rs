//! Uniform history windows for rollout inference.
//!
//! Purpose
//! -------
//! Provide the validated container for a fixed-length, uniformly spaced
//! history slice that the rollout predictor consumes. The window is the
//! boundary object between the resampling layer (which produces it from
//! irregular history) and the rollout layer (which treats it as clean,
//! uniformly spaced model input).
//!
//! Key behaviors
//! -------------
//! - [`Window`] enforces non-emptiness and a finite, strictly positive
//!   sampling interval at construction time.
//! - Stores the timestamp of the newest sample so that a prediction at
//!   `last_time + delay` can be placed on the caller's time axis.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values.len() > 0`.
//! - `dt` is finite and strictly positive.
//! - `last_time` is finite.
//! - Values are ordered oldest → newest; sample `i` is implicitly at
//!   `last_time - dt * (len - 1 - i)`.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; the newest observation sits at the end, matching
//!   the ordering produced by [`crate::resample::resample_window`].
//! - The window does not validate finiteness of individual values; a
//!   linearly interpolated/extrapolated grid over finite inputs is finite,
//!   and the normalizer re-checks its own domain downstream.
//!
//! Downstream usage
//! ----------------
//! - Produced by [`crate::resample::resample_window`].
//! - Consumed by [`crate::rollout::RolloutPredictor::predict`], which reads
//!   `values`, `dt`, and `last_time` but never mutates the window.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and each constructor rejection (empty
//!   values, non-positive or non-finite `dt`, non-finite `last_time`).
use crate::resample::errors::{ResampleError, ResampleResult};
use ndarray::Array1;

/// `Window` — fixed-length, uniformly spaced history slice ending at a known time.
///
/// Purpose
/// -------
/// Carry a model-ready history window together with the sampling interval it
/// was built at and the timestamp of its newest sample.
///
/// Fields
/// ------
/// - `values`: `Array1<f64>`
///   History values, oldest → newest, spaced exactly `dt` apart.
/// - `dt`: `f64`
///   Sampling interval between consecutive values; finite and > 0.
/// - `last_time`: `f64`
///   Timestamp of the newest sample (`values[len - 1]`); finite.
///
/// Invariants
/// ----------
/// - `values.len() > 0`, `dt.is_finite() && dt > 0.0`,
///   `last_time.is_finite()`.
///
/// Notes
/// -----
/// - The implicit timestamp of sample `i` is
///   `last_time - dt * (len - 1 - i)`; timestamps are not materialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// History values, oldest → newest, uniformly spaced at `dt`.
    pub values: Array1<f64>,
    /// Sampling interval between consecutive values (finite, > 0).
    pub dt: f64,
    /// Timestamp of the newest sample (finite).
    pub last_time: f64,
}

impl Window {
    /// Construct a validated [`Window`].
    ///
    /// Parameters
    /// ----------
    /// - `values`: `Array1<f64>`
    ///   Uniformly spaced history, oldest → newest. Must be non-empty.
    /// - `dt`: `f64`
    ///   Sampling interval; must be finite and strictly positive.
    /// - `last_time`: `f64`
    ///   Timestamp of the newest sample; must be finite.
    ///
    /// Returns
    /// -------
    /// `ResampleResult<Window>`
    ///   - `Ok(Window)` when all invariants hold.
    ///   - `Err(ResampleError)` otherwise.
    ///
    /// Errors
    /// ------
    /// - `ResampleError::EmptyWindow` when `values` is empty.
    /// - `ResampleError::InvalidInterval` when `dt` is non-positive or
    ///   non-finite, or when `last_time` is non-finite.
    pub fn new(values: Array1<f64>, dt: f64, last_time: f64) -> ResampleResult<Self> {
        if values.is_empty() {
            return Err(ResampleError::EmptyWindow);
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ResampleError::InvalidInterval { dt });
        }
        if !last_time.is_finite() {
            return Err(ResampleError::InvalidInterval { dt: last_time });
        }
        Ok(Window { values, dt, last_time })
    }

    /// Number of samples in the window.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the window holds no samples. Always `false` for a validated
    /// window; provided for clippy-conventional pairing with [`Window::len`].
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
