//! Piecewise-linear interpolation over irregularly sampled history.
//!
//! Purpose
//! -------
//! Provide the interpolation primitive used to move between sampling grids:
//! a piecewise-linear interpolant over `(timestamp, value)` knots that
//! extrapolates linearly beyond the first and last knot instead of failing.
//! Uniform evaluation grids built by the resampler may extend slightly
//! before the first or after the last available sample, so extrapolation is
//! part of the contract, not an error path.
//!
//! Key behaviors
//! -------------
//! - [`LinearInterpolant::new`] validates knot-array lengths once; evaluation
//!   is then infallible.
//! - [`LinearInterpolant::eval`] locates the bracketing segment by binary
//!   search and evaluates the segment line; queries outside the knot range
//!   reuse the boundary segment's slope (linear extrapolation).
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two knots; timestamps strictly increasing. Strict
//!   monotonicity is the caller's responsibility: duplicate timestamps make
//!   the segment slope undefined (division by zero) and are not detected at
//!   runtime.
//! - Knot values are finite.
//!
//! Conventions
//! -----------
//! - Knots are ordered oldest → newest, index 0 first.
//! - Evaluation is a pure function of the knots; the interpolant is
//!   immutable after construction and safe to share by reference.
//!
//! Testing notes
//! -------------
//! - Unit tests cover interior interpolation, extrapolation on both sides,
//!   exact-knot queries, determinism, and constructor rejections.
use crate::resample::errors::{ResampleError, ResampleResult};
use ndarray::Array1;

/// `LinearInterpolant` — immutable piecewise-linear interpolant with linear
/// extrapolation at both boundaries.
///
/// Purpose
/// -------
/// Evaluate an irregularly sampled signal at arbitrary query times. This is
/// the workhorse behind uniform-window resampling and prediction/ground-truth
/// alignment.
///
/// Fields
/// ------
/// - `times`: `Array1<f64>`
///   Knot timestamps, strictly increasing (caller-guaranteed), length ≥ 2.
/// - `values`: `Array1<f64>`
///   Knot values, same length as `times`.
///
/// Performance
/// -----------
/// - Construction copies both knot arrays once; each evaluation is
///   O(log n) via binary search over the knot timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolant {
    times: Array1<f64>,
    values: Array1<f64>,
}

impl LinearInterpolant {
    /// Construct an interpolant over `(times, values)` knots.
    ///
    /// Parameters
    /// ----------
    /// - `times`: `&[f64]`
    ///   Knot timestamps, strictly increasing, length ≥ 2.
    /// - `values`: `&[f64]`
    ///   Knot values, same length as `times`.
    ///
    /// Returns
    /// -------
    /// `ResampleResult<LinearInterpolant>`
    ///
    /// Errors
    /// ------
    /// - `ResampleError::LengthMismatch` when the arrays differ in length.
    /// - `ResampleError::InsufficientHistory` when fewer than two knots are
    ///   given (linear interpolation is undefined).
    ///
    /// Notes
    /// -----
    /// - Non-increasing timestamps are not detected; the resulting
    ///   interpolant is undefined in that case.
    pub fn new(times: &[f64], values: &[f64]) -> ResampleResult<Self> {
        if times.len() != values.len() {
            return Err(ResampleError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if times.len() < 2 {
            return Err(ResampleError::InsufficientHistory { len: times.len() });
        }
        Ok(LinearInterpolant {
            times: Array1::from(times.to_vec()),
            values: Array1::from(values.to_vec()),
        })
    }

    /// Evaluate the interpolant at a single query time.
    ///
    /// Queries inside the knot range are interpolated on the bracketing
    /// segment; queries outside reuse the first/last segment's slope, i.e.
    /// linear extrapolation rather than clamping or erroring.
    pub fn eval(&self, t: f64) -> f64 {
        let j = self.segment_index(t);
        let t0 = self.times[j];
        let t1 = self.times[j + 1];
        let v0 = self.values[j];
        let v1 = self.values[j + 1];
        let slope = (v1 - v0) / (t1 - t0);
        v0 + slope * (t - t0)
    }

    /// Evaluate the interpolant at each time produced by `grid`, in order.
    pub fn sample<I>(&self, grid: I) -> Array1<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        Array1::from_iter(grid.into_iter().map(|t| self.eval(t)))
    }

    /// Index `j` of the segment `[times[j], times[j + 1]]` used to evaluate
    /// at `t`, clamped to `[0, len - 2]` so boundary segments serve
    /// extrapolation queries.
    fn segment_index(&self, t: f64) -> usize {
        let n = self.times.len();
        let mut lo = 0usize;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.times[mid] <= t {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }
}
