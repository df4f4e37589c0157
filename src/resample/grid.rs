//! Uniform-grid window construction from irregular history.
//!
//! Purpose
//! -------
//! Convert an irregularly timed history into the fixed-length, uniformly
//! spaced [`Window`] the rollout predictor expects. This is the resampling
//! half of a prediction call: a piecewise-linear interpolant is built over
//! the raw `(timestamp, value)` history and evaluated on a uniform grid of
//! `seq_len` points, spaced `dt_new` apart, ending exactly at the last
//! observed timestamp.
//!
//! Key behaviors
//! -------------
//! - The output grid is anchored at the newest observation: point `i` sits
//!   at `last_timestamp - dt_new * (seq_len - 1 - i)`.
//! - Grid points before the first or after the last observation are filled
//!   by linear extrapolation, never clamped and never an error — the uniform
//!   grid routinely starts slightly before the earliest raw sample.
//! - The result always has exactly `seq_len` values at exactly `dt_new`
//!   spacing regardless of how irregular the input history is.
//!
//! Invariants & assumptions
//! ------------------------
//! - `timestamps` strictly increasing (caller responsibility; violations
//!   give an undefined interpolation result, not a runtime fault).
//! - `timestamps.len() == values.len()` and `timestamps.len() >= 2`,
//!   enforced here via [`LinearInterpolant::new`].
//!
//! Downstream usage
//! ----------------
//! - Called once per prediction by [`crate::predict::predict`] and by the
//!   sliding evaluation driver; the returned [`Window`] is consumed by
//!   [`crate::rollout::RolloutPredictor::predict`].
//!
//! Testing notes
//! -------------
//! - Unit tests pin the grid anchoring (ends at the last timestamp), the
//!   length/spacing invariant, extrapolation at the old end, determinism,
//!   and every error path.
use crate::resample::{
    data::Window,
    errors::{ResampleError, ResampleResult},
    interp::LinearInterpolant,
};

/// Resample an irregular history onto a uniform window ending at the last
/// observed timestamp.
///
/// Parameters
/// ----------
/// - `timestamps`: `&[f64]`
///   Observation times, strictly increasing, length ≥ 2.
/// - `values`: `&[f64]`
///   Observed values, same length as `timestamps`.
/// - `dt_new`: `f64`
///   Target sampling interval; finite and > 0.
/// - `seq_len`: `usize`
///   Target window length; > 0.
///
/// Returns
/// -------
/// `ResampleResult<Window>`
///   A window of exactly `seq_len` values, oldest → newest, spaced `dt_new`,
///   with `last_time` equal to the last input timestamp.
///
/// Errors
/// ------
/// - `ResampleError::InvalidInterval` for a non-positive or non-finite
///   `dt_new`.
/// - `ResampleError::EmptyWindow` for `seq_len == 0`.
/// - `ResampleError::LengthMismatch` when the input arrays differ in length.
/// - `ResampleError::InsufficientHistory` for fewer than two input samples.
///
/// Notes
/// -----
/// - Pure function of its inputs; identical inputs produce an identical
///   window.
pub fn resample_window(
    timestamps: &[f64], values: &[f64], dt_new: f64, seq_len: usize,
) -> ResampleResult<Window> {
    if !dt_new.is_finite() || dt_new <= 0.0 {
        return Err(ResampleError::InvalidInterval { dt: dt_new });
    }
    if seq_len == 0 {
        return Err(ResampleError::EmptyWindow);
    }

    let interp = LinearInterpolant::new(timestamps, values)?;
    let last = timestamps[timestamps.len() - 1];

    let grid = (0..seq_len).map(|i| last - dt_new * (seq_len - 1 - i) as f64);
    let resampled = interp.sample(grid);

    Window::new(resampled, dt_new, last)
}
