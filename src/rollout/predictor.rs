//! Autoregressive rollout inference with fractional-step time alignment.
//!
//! Purpose
//! -------
//! Produce a single scalar prediction at `window.last_time + delay` from a
//! uniform history window, a trained step model, and a fitted normalizer.
//! The requested delay rarely lands on the model's native step grid, so the
//! predictor rolls the model forward just far enough to straddle the target
//! time and linearly blends the last two produced samples by the fractional
//! remainder.
//!
//! Key behaviors
//! -------------
//! - Normalization brackets the whole rollout: the window is normalized
//!   once, the entire rollout runs in normalized space, and the full buffer
//!   is denormalized once at the end. Ordering matters — the blend operates
//!   on denormalized values.
//! - The rollout buffer holds `seq_len + steps` values: the normalized
//!   window followed by one produced sample per step. Iteration `i` feeds
//!   the sliding sub-window `buffer[i .. i + seq_len]` to the model with
//!   the hidden state carried from iteration `i - 1` (`None` on the first),
//!   and writes the output's last element into `buffer[seq_len + i]`. The
//!   loop is strictly sequential; each iteration consumes the previous
//!   iteration's produced value.
//! - Zero delay is the `steps = 0` instance of the same code path: no model
//!   invocation, and the result is the last historical value after a
//!   normalize→denormalize round trip. The configured [`RoundingPolicy`]
//!   applies uniformly to both the zero-delay and the blended result.
//!
//! Invariants & assumptions
//! ------------------------
//! - The window is validated upstream (non-empty, finite positive `dt`).
//! - The model's output length must equal its input window length; a
//!   violation fails the prediction with the offending step index.
//! - Hidden state lives and dies inside one `predict` call; the predictor
//!   holds no cross-call state and `predict` is `&self`.
//!
//! Conventions
//! -----------
//! - `steps = ceil(delay / dt)` and
//!   `ratio = (delay - dt * (steps - 1)) / dt`; see [`crate::rollout::plan`].
//! - No logging and no retries: every failure is deterministic in the
//!   inputs and is surfaced immediately to the caller.
//!
//! Downstream usage
//! ----------------
//! - [`crate::predict::predict`] wires resampling to this predictor for the
//!   one-call entry point; the evaluation driver invokes it once per
//!   sliding-window position.
//!
//! Testing notes
//! -------------
//! - Unit tests use deterministic step-model doubles to pin the exact blend
//!   arithmetic, the invocation count and hidden-state threading, the
//!   zero-delay fast path, the normalize/denormalize ordering, rounding
//!   policies, and every error path.
use crate::{
    model::step::StepModel,
    normalize::{affine::Normalizer, errors::NormalizeError},
    resample::data::Window,
    rollout::{
        errors::{RolloutError, RolloutResult},
        plan::RolloutPlan,
    },
};
use ndarray::{Array1, s};
use std::str::FromStr;

/// Numeric policy applied to the final prediction.
///
/// The membrane displacement index is integral in the acquisition system,
/// so some callers want integer-valued predictions; others score against
/// continuous ground truth. The policy is explicit configuration rather
/// than a hardcoded cast.
///
/// Variants:
/// - `Exact`: return the blended value unchanged (default).
/// - `Nearest`: round half away from zero to the nearest integer.
/// - `Truncate`: drop the fractional part (toward zero).
///
/// Parsing:
/// Implements `FromStr` accepting case-insensitive names (`"exact"`,
/// `"nearest"`, `"truncate"`). Unknown names return
/// `RolloutError::InvalidRoundingPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingPolicy {
    #[default]
    Exact,
    Nearest,
    Truncate,
}

impl RoundingPolicy {
    /// Apply the policy to a finished prediction.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingPolicy::Exact => value,
            RoundingPolicy::Nearest => value.round(),
            RoundingPolicy::Truncate => value.trunc(),
        }
    }
}

impl FromStr for RoundingPolicy {
    type Err = RolloutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(RoundingPolicy::Exact),
            "nearest" => Ok(RoundingPolicy::Nearest),
            "truncate" => Ok(RoundingPolicy::Truncate),
            _ => Err(RolloutError::InvalidRoundingPolicy { name: s.to_string() }),
        }
    }
}

/// Predictor-level configuration, injected at construction.
///
/// Fields:
/// - `rounding: RoundingPolicy` — numeric policy for the final prediction.
///
/// This is the explicit stand-in for ambient context (device placement,
/// global flags) that the predictor deliberately does not read from process
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RolloutConfig {
    pub rounding: RoundingPolicy,
}

impl RolloutConfig {
    /// Build a configuration with the given rounding policy.
    pub fn new(rounding: RoundingPolicy) -> Self {
        RolloutConfig { rounding }
    }
}

/// `RolloutPredictor` — multi-step autoregressive inference over a uniform
/// window.
///
/// Purpose
/// -------
/// Own the rollout loop: plan the step count from the requested delay, run
/// the model autoregressively with hidden-state threading, and blend the
/// final two denormalized samples into the prediction at the exact
/// requested time.
///
/// Invariants
/// ----------
/// - Holds only immutable configuration; all per-call state (buffer, hidden
///   state) is local to [`RolloutPredictor::predict`], so one predictor is
///   safely shared across calls and threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RolloutPredictor {
    config: RolloutConfig,
}

impl RolloutPredictor {
    /// Build a predictor with the given configuration.
    pub fn new(config: RolloutConfig) -> Self {
        RolloutPredictor { config }
    }

    /// The configuration this predictor was built with.
    pub fn config(&self) -> RolloutConfig {
        self.config
    }

    /// Predict the signal value at `window.last_time + delay`.
    ///
    /// Parameters
    /// ----------
    /// - `model`: `&M`
    ///   Trained step model; invoked `ceil(delay / window.dt)` times,
    ///   sequentially, with hidden state threaded between invocations.
    /// - `normalizer`: `&N`
    ///   Fitted normalizer bracketing the rollout.
    /// - `window`: `&Window`
    ///   Uniform history ending at the prediction origin.
    /// - `delay`: `f64`
    ///   Continuous time offset into the future; finite and ≥ 0.
    ///
    /// Returns
    /// -------
    /// `RolloutResult<f64>`
    ///   The prediction at the exact requested time, after the configured
    ///   rounding policy.
    ///
    /// Errors
    /// ------
    /// - `RolloutError::InvalidDelay` for a negative or non-finite delay.
    /// - `RolloutError::ExcessiveDelay` when the delay spans more than
    ///   [`crate::rollout::plan::MAX_STEPS`] model intervals.
    /// - `RolloutError::NormalizationDomain` when the normalizer rejects the
    ///   window or rollout buffer, or changes its length.
    /// - `RolloutError::ModelStep` when the model fails at some rollout
    ///   step; carries the step index, never retried.
    /// - `RolloutError::OutputLengthMismatch` when a model output's length
    ///   differs from its input window.
    ///
    /// Notes
    /// -----
    /// - Deterministic given a deterministic model and normalizer.
    pub fn predict<M, N>(
        &self, model: &M, normalizer: &N, window: &Window, delay: f64,
    ) -> RolloutResult<f64>
    where
        M: StepModel,
        N: Normalizer,
    {
        let plan = RolloutPlan::new(delay, window.dt)?;
        let seq_len = window.len();

        let normalized = normalizer.normalize(window.values.view())?;
        if normalized.len() != seq_len {
            return Err(RolloutError::NormalizationDomain {
                source: NormalizeError::LengthChanged {
                    expected: seq_len,
                    actual: normalized.len(),
                },
            });
        }

        let mut buffer = Array1::<f64>::zeros(seq_len + plan.steps);
        buffer.slice_mut(s![..seq_len]).assign(&normalized);

        let mut hidden: Option<M::Hidden> = None;
        for i in 0..plan.steps {
            let input = buffer.slice(s![i..i + seq_len]);
            let (output, next_hidden) = model
                .step(input, hidden.take())
                .map_err(|source| RolloutError::ModelStep { step: i, source })?;
            if output.len() != seq_len {
                return Err(RolloutError::OutputLengthMismatch {
                    step: i,
                    expected: seq_len,
                    actual: output.len(),
                });
            }
            buffer[seq_len + i] = output[seq_len - 1];
            hidden = Some(next_hidden);
        }

        let denormalized = normalizer.denormalize(buffer.view())?;
        let n = denormalized.len();
        let raw = if plan.steps == 0 {
            denormalized[n - 1]
        } else {
            (1.0 - plan.ratio) * denormalized[n - 2] + plan.ratio * denormalized[n - 1]
        };
        Ok(self.config.rounding.apply(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::errors::{ModelError, ModelResult},
        normalize::affine::MeanScaleNormalizer,
    };
    use ndarray::{ArrayView1, array};
    use std::cell::RefCell;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact blend arithmetic for sub-step, multi-step, and exact-multiple
    //   delays against a deterministic `input + 1` step model.
    // - The zero-delay fast path (no model invocation, round-tripped last
    //   historical value).
    // - Invocation count, sequential ordering, and hidden-state threading
    //   (`None` first, then the previous iteration's state).
    // - Normalize → rollout → denormalize ordering.
    // - Rounding policies on the finished prediction.
    // - Error paths: invalid delay, failing model step (with index), and
    //   output length mismatch.
    //
    // They intentionally DO NOT cover:
    // - Plan arithmetic in isolation (covered in `rollout::plan`).
    // - The production LSTM (covered in `model::lstm`).
    // -------------------------------------------------------------------------

    // Deterministic step-model double: output = input + 1 elementwise, so
    // the one-step-ahead prediction is always `input[last] + 1`. Records
    // each invocation's received hidden state and last input value; hidden
    // state is an invocation counter so threading is observable.
    struct PlusOneModel {
        calls: RefCell<Vec<(Option<u32>, f64)>>,
    }

    impl PlusOneModel {
        fn new() -> Self {
            PlusOneModel { calls: RefCell::new(Vec::new()) }
        }
    }

    impl StepModel for PlusOneModel {
        type Hidden = u32;

        fn step(
            &self, window: ArrayView1<f64>, hidden: Option<u32>,
        ) -> ModelResult<(Array1<f64>, u32)> {
            self.calls.borrow_mut().push((hidden, window[window.len() - 1]));
            let next = hidden.map_or(1, |count| count + 1);
            Ok((window.mapv(|v| v + 1.0), next))
        }
    }

    // Double that fails at a chosen invocation index.
    struct FailingModel {
        fail_at: usize,
        invocations: RefCell<usize>,
    }

    impl StepModel for FailingModel {
        type Hidden = ();

        fn step(
            &self, window: ArrayView1<f64>, _hidden: Option<()>,
        ) -> ModelResult<(Array1<f64>, ())> {
            let call = *self.invocations.borrow();
            *self.invocations.borrow_mut() += 1;
            if call == self.fail_at {
                return Err(ModelError::External("backend unavailable".to_string()));
            }
            Ok((window.to_owned(), ()))
        }
    }

    // Double that violates the output-length contract.
    struct ShortOutputModel;

    impl StepModel for ShortOutputModel {
        type Hidden = ();

        fn step(
            &self, _window: ArrayView1<f64>, _hidden: Option<()>,
        ) -> ModelResult<(Array1<f64>, ())> {
            Ok((array![0.0], ()))
        }
    }

    fn unit_window(values: Array1<f64>) -> Window {
        Window::new(values, 1.0, 100.0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Pin the single-fractional-step blend from the alignment contract.
    //
    // Given
    // -----
    // - History [0, 1, 2, 3], identity normalizer, `dt = 1`, `delay = 0.5`.
    // - `PlusOneModel`: one rollout step produces 3 + 1 = 4.
    //
    // Expect
    // ------
    // - steps = 1, ratio = 0.5, result = 0.5 * 3 + 0.5 * 4 = 3.5 exactly.
    // - Exactly one model invocation, with hidden = None.
    fn predict_blends_single_fractional_step() {
        let predictor = RolloutPredictor::default();
        let model = PlusOneModel::new();
        let normalizer = MeanScaleNormalizer::identity();
        let window = unit_window(array![0.0, 1.0, 2.0, 3.0]);

        let result = predictor.predict(&model, &normalizer, &window, 0.5).unwrap();

        assert_eq!(result, 3.5);
        let calls = model.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (None, 3.0));
    }

    #[test]
    // Purpose
    // -------
    // Verify multi-step rollout order and hidden-state threading.
    //
    // Given
    // -----
    // - History [0, 1, 2, 3], identity normalizer, `dt = 1`, `delay = 2.5`.
    // - `PlusOneModel` produces 4, 5, 6 across three sequential steps, each
    //   consuming the prior step's value.
    //
    // Expect
    // ------
    // - Exactly 3 invocations; received hiddens [None, Some(1), Some(2)]
    //   (threaded, not reset); last input values [3, 4, 5] (autoregressive
    //   feedback).
    // - Result = 0.5 * 5 + 0.5 * 6 = 5.5.
    fn predict_threads_hidden_state_across_multi_step_rollout() {
        let predictor = RolloutPredictor::default();
        let model = PlusOneModel::new();
        let normalizer = MeanScaleNormalizer::identity();
        let window = unit_window(array![0.0, 1.0, 2.0, 3.0]);

        let result = predictor.predict(&model, &normalizer, &window, 2.5).unwrap();

        assert_eq!(result, 5.5);
        let calls = model.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], (None, 3.0));
        assert_eq!(calls[1], (Some(1), 4.0));
        assert_eq!(calls[2], (Some(2), 5.0));
    }

    #[test]
    // Purpose
    // -------
    // Verify that a delay on the model grid degenerates the blend to the
    // final produced sample.
    //
    // Given
    // -----
    // - Same setup, `delay = 2.0` → steps = 2, ratio = 1.
    //
    // Expect
    // ------
    // - Result = second produced sample = 5.0 exactly.
    fn predict_exact_multiple_returns_final_sample() {
        let predictor = RolloutPredictor::default();
        let model = PlusOneModel::new();
        let normalizer = MeanScaleNormalizer::identity();
        let window = unit_window(array![0.0, 1.0, 2.0, 3.0]);

        let result = predictor.predict(&model, &normalizer, &window, 2.0).unwrap();

        assert_eq!(result, 5.0);
        assert_eq!(model.calls.borrow().len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Verify the zero-delay fast path: no model work, round-tripped last
    // historical value.
    //
    // Given
    // -----
    // - Window [10, 12, 6] with a non-trivial normalizer
    //   (mean = 10, scale = 2), `delay = 0`.
    //
    // Expect
    // ------
    // - Result = 6 (last historical value; the affine round trip is exact
    //   for these values).
    // - The model is never invoked.
    fn predict_zero_delay_skips_model_entirely() {
        let predictor = RolloutPredictor::default();
        let model = PlusOneModel::new();
        let normalizer = MeanScaleNormalizer::new(10.0, 2.0).unwrap();
        let window = unit_window(array![10.0, 12.0, 6.0]);

        let result = predictor.predict(&model, &normalizer, &window, 0.0).unwrap();

        assert_eq!(result, 6.0);
        assert!(model.calls.borrow().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Verify the rollout runs in normalized space and the blend operates on
    // denormalized values.
    //
    // Given
    // -----
    // - Raw window [100, 110, 120, 130] with mean = 100, scale = 10, so the
    //   normalized window is [0, 1, 2, 3]; `delay = 1` → one step, ratio 1.
    // - `PlusOneModel` adds 1 in *normalized* units.
    //
    // Expect
    // ------
    // - Result = denormalize(4) = 140: the model's +1 becomes +10 raw units.
    fn predict_normalizes_before_rollout_and_denormalizes_after() {
        let predictor = RolloutPredictor::default();
        let model = PlusOneModel::new();
        let normalizer = MeanScaleNormalizer::new(100.0, 10.0).unwrap();
        let window = unit_window(array![100.0, 110.0, 120.0, 130.0]);

        let result = predictor.predict(&model, &normalizer, &window, 1.0).unwrap();

        assert_eq!(result, 140.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the rounding policies on the finished prediction, including
    // the zero-delay path.
    //
    // Given
    // -----
    // - The 5.5-valued multi-step case under each policy; a fractional
    //   zero-delay value under `Truncate`.
    //
    // Expect
    // ------
    // - Exact → 5.5, Nearest → 6.0, Truncate → 5.0.
    // - Zero delay with last value 2.75 under Truncate → 2.0.
    fn predict_applies_rounding_policy_to_both_paths() {
        let normalizer = MeanScaleNormalizer::identity();
        let window = unit_window(array![0.0, 1.0, 2.0, 3.0]);

        for (policy, expected) in [
            (RoundingPolicy::Exact, 5.5),
            (RoundingPolicy::Nearest, 6.0),
            (RoundingPolicy::Truncate, 5.0),
        ] {
            let predictor = RolloutPredictor::new(RolloutConfig::new(policy));
            let model = PlusOneModel::new();
            let result = predictor.predict(&model, &normalizer, &window, 2.5).unwrap();
            assert_eq!(result, expected, "policy {policy:?}");
        }

        let predictor = RolloutPredictor::new(RolloutConfig::new(RoundingPolicy::Truncate));
        let model = PlusOneModel::new();
        let fractional = unit_window(array![1.0, 2.75]);
        let result = predictor.predict(&model, &normalizer, &fractional, 0.0).unwrap();
        assert_eq!(result, 2.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a negative delay is rejected before any model work.
    //
    // Given
    // -----
    // - `delay = -1.0`.
    //
    // Expect
    // ------
    // - `Err(RolloutError::InvalidDelay)`; zero model invocations.
    fn predict_rejects_negative_delay() {
        let predictor = RolloutPredictor::default();
        let model = PlusOneModel::new();
        let normalizer = MeanScaleNormalizer::identity();
        let window = unit_window(array![0.0, 1.0]);

        let result = predictor.predict(&model, &normalizer, &window, -1.0);

        assert!(matches!(result, Err(RolloutError::InvalidDelay { .. })));
        assert!(model.calls.borrow().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Verify that a model failure is surfaced with the failing step index
    // and not retried.
    //
    // Given
    // -----
    // - A model that fails on its second invocation; `delay = 3.0` plans
    //   three steps.
    //
    // Expect
    // ------
    // - `Err(RolloutError::ModelStep { step: 1, .. })`; exactly two
    //   invocations occurred (no retry, no third step).
    fn predict_surfaces_model_failure_with_step_index() {
        let predictor = RolloutPredictor::default();
        let model = FailingModel { fail_at: 1, invocations: RefCell::new(0) };
        let normalizer = MeanScaleNormalizer::identity();
        let window = unit_window(array![0.0, 1.0, 2.0]);

        let result = predictor.predict(&model, &normalizer, &window, 3.0);

        assert!(matches!(result, Err(RolloutError::ModelStep { step: 1, .. })));
        assert_eq!(*model.invocations.borrow(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a model output shorter than its input window fails the
    // prediction.
    //
    // Given
    // -----
    // - A model returning a length-1 output for a length-3 window.
    //
    // Expect
    // ------
    // - `Err(RolloutError::OutputLengthMismatch { step: 0, expected: 3,
    //   actual: 1 })`.
    fn predict_rejects_output_length_mismatch() {
        let predictor = RolloutPredictor::default();
        let normalizer = MeanScaleNormalizer::identity();
        let window = unit_window(array![0.0, 1.0, 2.0]);

        let result = predictor.predict(&ShortOutputModel, &normalizer, &window, 1.0);

        assert_eq!(
            result,
            Err(RolloutError::OutputLengthMismatch { step: 0, expected: 3, actual: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify `RoundingPolicy` string parsing, including rejection.
    //
    // Given
    // -----
    // - Case-insensitive valid names and one unknown name.
    //
    // Expect
    // ------
    // - Valid names parse to their variants; the unknown name yields
    //   `InvalidRoundingPolicy`.
    fn rounding_policy_parses_from_str() {
        assert_eq!("exact".parse::<RoundingPolicy>().unwrap(), RoundingPolicy::Exact);
        assert_eq!("Nearest".parse::<RoundingPolicy>().unwrap(), RoundingPolicy::Nearest);
        assert_eq!("TRUNCATE".parse::<RoundingPolicy>().unwrap(), RoundingPolicy::Truncate);
        assert!(matches!(
            "floor".parse::<RoundingPolicy>(),
            Err(RolloutError::InvalidRoundingPolicy { .. })
        ));
    }
}
