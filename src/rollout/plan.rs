//! Step-count and fractional-remainder planning for a rollout.
//!
//! Purpose
//! -------
//! Translate a continuous prediction delay into discrete rollout work: the
//! number of autoregressive model steps needed so the produced grid covers
//! the delay, and the fractional position of the target time between the
//! last two produced samples. Getting this arithmetic right is the heart of
//! time alignment — an off-by-one in the step count or remainder shifts
//! every prediction by up to one model interval.
//!
//! Key behaviors
//! -------------
//! - `steps = ceil(delay / dt)`, so `steps * dt >= delay` always holds and
//!   `steps` is the minimal such count.
//! - `ratio = (delay - dt * (steps - 1)) / dt`, the blend weight of the
//!   final produced sample against the one before it. Given the ceiling,
//!   `ratio ∈ (0, 1]` for any positive delay; an exact multiple of `dt`
//!   yields `ratio = 1` (the blend degenerates to the last sample).
//! - Zero delay short-circuits to `steps = 0, ratio = 0`: no model work,
//!   and the predictor returns the round-tripped last historical value.
//! - The step count is capped at [`MAX_STEPS`]: a finite but enormous delay
//!   is rejected with `ExcessiveDelay` instead of saturating the `ceil`
//!   cast and blowing up the rollout buffer allocation downstream.
//!
//! Invariants & assumptions
//! ------------------------
//! - `dt` is finite and positive (guaranteed by [`crate::resample::Window`]
//!   before a plan is ever computed).
//!
//! Testing notes
//! -------------
//! - Unit tests pin the exact `(steps, ratio)` pairs from the documented
//!   cases: sub-step delays, exact multiples, fractional multi-step delays,
//!   zero delay, and the negative/non-finite rejections.
use crate::rollout::errors::{RolloutError, RolloutResult};

/// Upper bound on the autoregressive steps a single prediction may run.
///
/// Every step costs one model invocation and one rollout-buffer slot, so a
/// delay spanning more than this many model intervals is a caller mistake
/// (wrong units, wrong `dt`) rather than a meaningful forecast request.
pub const MAX_STEPS: usize = 1_000_000;

/// `RolloutPlan` — discrete work implied by a continuous prediction delay.
///
/// Fields
/// ------
/// - `steps`: `usize`
///   Number of autoregressive model applications; `ceil(delay / dt)`, with
///   0 reserved for the zero-delay fast path.
/// - `ratio`: `f64`
///   Fractional position of the target time between the `(steps - 1)`-th
///   and `steps`-th produced samples; in `(0, 1]` when `steps > 0`, 0 when
///   `steps == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutPlan {
    pub steps: usize,
    pub ratio: f64,
}

impl RolloutPlan {
    /// Plan the rollout for a requested delay at a given model interval.
    ///
    /// Parameters
    /// ----------
    /// - `delay`: `f64`
    ///   Continuous time offset into the future; must be finite and ≥ 0.
    /// - `dt`: `f64`
    ///   The model's native sampling interval; finite and > 0
    ///   (window-validated upstream).
    ///
    /// Returns
    /// -------
    /// `RolloutResult<RolloutPlan>`
    ///
    /// Errors
    /// ------
    /// - `RolloutError::InvalidDelay` for a negative or non-finite delay.
    /// - `RolloutError::ExcessiveDelay` when the delay spans more than
    ///   [`MAX_STEPS`] model intervals.
    pub fn new(delay: f64, dt: f64) -> RolloutResult<Self> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(RolloutError::InvalidDelay { delay });
        }
        if delay == 0.0 {
            return Ok(RolloutPlan { steps: 0, ratio: 0.0 });
        }

        let quotient = delay / dt;
        // MAX_STEPS is integral, so ceil cannot push an admissible quotient
        // past the bound.
        if quotient > MAX_STEPS as f64 {
            return Err(RolloutError::ExcessiveDelay { delay, dt });
        }
        let steps = quotient.ceil() as usize;
        // delay > 0 guarantees steps >= 1, but a subnormal delay / large dt
        // can round the quotient to zero; one step still covers it.
        let steps = steps.max(1);
        let ratio = (delay - dt * (steps as f64 - 1.0)) / dt;
        Ok(RolloutPlan { steps, ratio })
    }
}
