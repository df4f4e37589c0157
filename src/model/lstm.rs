//! Production step model: single-layer LSTM with a feed-forward head.
//!
//! Purpose
//! -------
//! Provide the conforming production implementation of [`StepModel`]: the
//! scalar-input, scalar-output recurrent architecture the membrane
//! forecaster was trained as — one LSTM layer over the window followed by a
//! two-layer tanh feed-forward head applied at every position. Weights are
//! supplied by the caller (exported from a trained checkpoint); parsing
//! checkpoint files is out of scope.
//!
//! Key behaviors
//! -------------
//! - [`LstmWeights`] carries the raw parameter arrays in the conventional
//!   stacked-gate layout (`i`, `f`, `g`, `o` blocks of `hidden_dim` rows
//!   each); [`LstmStepModel::new`] validates all shape relationships once.
//! - [`LstmStepModel::step`] runs the cell recurrence across the window and
//!   applies the head at each position, so `output[k]` is the model's
//!   prediction following `window[..=k]` and `output[last]` is the
//!   one-step-ahead prediction the rollout loop consumes.
//! - Hidden state is an explicit `(h, c)` pair returned to the caller;
//!   `None` starts from zero state.
//!
//! Invariants & assumptions
//! ------------------------
//! - `hidden_dim` is derived from `weight_hh` and every other array must be
//!   consistent with it; violations are construction-time errors, never
//!   runtime panics.
//! - Inference is pure with respect to `&self`: parameters are never
//!   mutated, so one model instance is safely shared across prediction
//!   calls.
//!
//! Conventions
//! -----------
//! - Gate blocks follow the stacked layout `[input, forget, cell, output]`
//!   with `sigmoid` on `i`/`f`/`o` and `tanh` on the cell candidate, the
//!   layout LSTM checkpoints conventionally export.
//!
//! Testing notes
//! -------------
//! - Unit tests pin zero-weight and bias-only outputs (exact values),
//!   hidden-state carry-over across calls, and each shape rejection.
use crate::model::{
    errors::{ModelError, ModelResult},
    step::StepModel,
};
use ndarray::{Array1, Array2, ArrayView1, s};

/// Raw parameter arrays for [`LstmStepModel`], stacked-gate layout.
///
/// Fields
/// ------
/// - `weight_ih`: `(4 * hidden_dim, 1)` input-to-hidden weights.
/// - `weight_hh`: `(4 * hidden_dim, hidden_dim)` hidden-to-hidden weights.
/// - `bias_ih`, `bias_hh`: length `4 * hidden_dim` gate biases.
/// - `weight_ff`: `(ff_dim, hidden_dim)` first head layer.
/// - `bias_ff`: length `ff_dim`.
/// - `weight_out`: `(1, ff_dim)` second head layer.
/// - `bias_out`: length 1.
#[derive(Debug, Clone, PartialEq)]
pub struct LstmWeights {
    pub weight_ih: Array2<f64>,
    pub weight_hh: Array2<f64>,
    pub bias_ih: Array1<f64>,
    pub bias_hh: Array1<f64>,
    pub weight_ff: Array2<f64>,
    pub bias_ff: Array1<f64>,
    pub weight_out: Array2<f64>,
    pub bias_out: Array1<f64>,
}

impl LstmWeights {
    /// All-zero weights with consistent shapes for the given dimensions.
    /// Useful as a starting point when populating parameters field by field.
    pub fn zeros(hidden_dim: usize, ff_dim: usize) -> Self {
        LstmWeights {
            weight_ih: Array2::zeros((4 * hidden_dim, 1)),
            weight_hh: Array2::zeros((4 * hidden_dim, hidden_dim)),
            bias_ih: Array1::zeros(4 * hidden_dim),
            bias_hh: Array1::zeros(4 * hidden_dim),
            weight_ff: Array2::zeros((ff_dim, hidden_dim)),
            bias_ff: Array1::zeros(ff_dim),
            weight_out: Array2::zeros((1, ff_dim)),
            bias_out: Array1::zeros(1),
        }
    }
}

/// Recurrent memory of [`LstmStepModel`]: the `(h, c)` pair after the last
/// processed sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LstmState {
    /// Hidden activation, length `hidden_dim`.
    pub h: Array1<f64>,
    /// Cell state, length `hidden_dim`.
    pub c: Array1<f64>,
}

impl LstmState {
    /// Zero state, the implicit starting point when `step` receives `None`.
    pub fn zeros(hidden_dim: usize) -> Self {
        LstmState { h: Array1::zeros(hidden_dim), c: Array1::zeros(hidden_dim) }
    }
}

/// `LstmStepModel` — validated single-layer LSTM + tanh feed-forward head.
///
/// Purpose
/// -------
/// The production [`StepModel`]: scalar input per position, scalar output
/// per position, recurrent memory carried as [`LstmState`].
///
/// Invariants
/// ----------
/// - All weight shapes are mutually consistent with `hidden_dim` and
///   `ff_dim`, checked once in [`LstmStepModel::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct LstmStepModel {
    weights: LstmWeights,
    hidden_dim: usize,
}

impl LstmStepModel {
    /// Construct a validated model from raw weights.
    ///
    /// The hidden dimension is derived from `weight_hh` (its column count);
    /// every other array is checked against it and against the head
    /// dimension derived from `weight_ff`.
    ///
    /// Errors
    /// ------
    /// - `ModelError::ShapeMismatch` naming the first inconsistent array.
    pub fn new(weights: LstmWeights) -> ModelResult<Self> {
        let hidden_dim = weights.weight_hh.ncols();
        if hidden_dim == 0 {
            return Err(ModelError::ShapeMismatch {
                what: "weight_hh columns",
                expected: 1,
                actual: 0,
            });
        }
        let gate_rows = 4 * hidden_dim;
        if weights.weight_hh.nrows() != gate_rows {
            return Err(ModelError::ShapeMismatch {
                what: "weight_hh rows",
                expected: gate_rows,
                actual: weights.weight_hh.nrows(),
            });
        }
        if weights.weight_ih.nrows() != gate_rows || weights.weight_ih.ncols() != 1 {
            return Err(ModelError::ShapeMismatch {
                what: "weight_ih rows",
                expected: gate_rows,
                actual: weights.weight_ih.nrows(),
            });
        }
        if weights.bias_ih.len() != gate_rows {
            return Err(ModelError::ShapeMismatch {
                what: "bias_ih",
                expected: gate_rows,
                actual: weights.bias_ih.len(),
            });
        }
        if weights.bias_hh.len() != gate_rows {
            return Err(ModelError::ShapeMismatch {
                what: "bias_hh",
                expected: gate_rows,
                actual: weights.bias_hh.len(),
            });
        }
        let ff_dim = weights.weight_ff.nrows();
        if weights.weight_ff.ncols() != hidden_dim {
            return Err(ModelError::ShapeMismatch {
                what: "weight_ff columns",
                expected: hidden_dim,
                actual: weights.weight_ff.ncols(),
            });
        }
        if weights.bias_ff.len() != ff_dim {
            return Err(ModelError::ShapeMismatch {
                what: "bias_ff",
                expected: ff_dim,
                actual: weights.bias_ff.len(),
            });
        }
        if weights.weight_out.nrows() != 1 || weights.weight_out.ncols() != ff_dim {
            return Err(ModelError::ShapeMismatch {
                what: "weight_out columns",
                expected: ff_dim,
                actual: weights.weight_out.ncols(),
            });
        }
        if weights.bias_out.len() != 1 {
            return Err(ModelError::ShapeMismatch {
                what: "bias_out",
                expected: 1,
                actual: weights.bias_out.len(),
            });
        }
        Ok(LstmStepModel { weights, hidden_dim })
    }

    /// Hidden dimension of the LSTM layer.
    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// One cell update: advance `(h, c)` by a single scalar input.
    fn cell(&self, x: f64, state: &mut LstmState) {
        let w = &self.weights;
        let h_dim = self.hidden_dim;

        let mut gates = w.weight_hh.dot(&state.h);
        gates += &w.bias_ih;
        gates += &w.bias_hh;
        gates.scaled_add(x, &w.weight_ih.column(0));

        let i = gates.slice(s![0..h_dim]).mapv(sigmoid);
        let f = gates.slice(s![h_dim..2 * h_dim]).mapv(sigmoid);
        let g = gates.slice(s![2 * h_dim..3 * h_dim]).mapv(f64::tanh);
        let o = gates.slice(s![3 * h_dim..4 * h_dim]).mapv(sigmoid);

        state.c = &f * &state.c + &i * &g;
        state.h = &o * &state.c.mapv(f64::tanh);
    }

    /// Feed-forward head applied to the hidden activation at one position.
    fn head(&self, h: &Array1<f64>) -> f64 {
        let w = &self.weights;
        let mut ff = w.weight_ff.dot(h);
        ff += &w.bias_ff;
        ff.mapv_inplace(f64::tanh);
        w.weight_out.dot(&ff)[0] + w.bias_out[0]
    }
}

impl StepModel for LstmStepModel {
    type Hidden = LstmState;

    fn step(
        &self, window: ArrayView1<f64>, hidden: Option<LstmState>,
    ) -> ModelResult<(Array1<f64>, LstmState)> {
        if window.is_empty() {
            return Err(ModelError::EmptyWindow);
        }
        let mut state = hidden.unwrap_or_else(|| LstmState::zeros(self.hidden_dim));
        if state.h.len() != self.hidden_dim || state.c.len() != self.hidden_dim {
            return Err(ModelError::ShapeMismatch {
                what: "hidden state",
                expected: self.hidden_dim,
                actual: state.h.len(),
            });
        }

        let mut output = Array1::zeros(window.len());
        for (k, &x) in window.iter().enumerate() {
            self.cell(x, &mut state);
            output[k] = self.head(&state.h);
        }
        Ok((output, state))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact outputs for degenerate weight settings (all-zero, bias-only)
    //   where the LSTM arithmetic collapses to hand-computable values.
    // - Hidden-state carry-over: a carried `(h, c)` changes the output
    //   relative to a fresh `None` start.
    // - Shape validation in `LstmStepModel::new` and hidden-state dimension
    //   checks in `step`.
    //
    // They intentionally DO NOT cover:
    // - Numerical agreement with a specific trained checkpoint (out of
    //   scope; checkpoint loading lives outside this crate).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that all-zero weights produce all-zero outputs and zero final
    // state.
    //
    // Given
    // -----
    // - `LstmWeights::zeros(2, 3)` and a three-sample window.
    //
    // Expect
    // ------
    // - Output is `[0, 0, 0]` exactly (zero gates keep `c = 0`, and the zero
    //   head maps any hidden activation to 0).
    // - Final state is the zero state.
    fn zero_weights_produce_zero_outputs() {
        let model = LstmStepModel::new(LstmWeights::zeros(2, 3)).unwrap();

        let (output, state) = model.step(array![1.0, -2.0, 0.5].view(), None).unwrap();

        assert_eq!(output, array![0.0, 0.0, 0.0]);
        assert_eq!(state, LstmState::zeros(2));
    }

    #[test]
    // Purpose
    // -------
    // Verify that the output bias passes straight through when every other
    // weight is zero.
    //
    // Given
    // -----
    // - Zero weights except `bias_out = [2.5]`.
    //
    // Expect
    // ------
    // - Every output position equals 2.5 exactly.
    fn output_bias_passes_through() {
        let mut weights = LstmWeights::zeros(1, 1);
        weights.bias_out = array![2.5];
        let model = LstmStepModel::new(weights).unwrap();

        let (output, _) = model.step(array![0.0, 7.0].view(), None).unwrap();

        assert_eq!(output, array![2.5, 2.5]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that carried hidden state changes the output relative to a
    // fresh start, i.e. the cell state actually persists across `step`
    // calls.
    //
    // Given
    // -----
    // - `hidden_dim = ff_dim = 1`; saturated input/forget/output gate biases
    //   (`+100` → sigmoid ≈ 1), cell-candidate weight 1, identity-ish head.
    // - First call over `[1.0]` builds up cell state; second call over
    //   `[0.0]` with the carried state vs. with `None`.
    //
    // Expect
    // ------
    // - With `None` and input 0 the output is exactly 0 (`g = tanh(0) = 0`
    //   keeps `c = 0`).
    // - With the carried state the forget gate preserves `c > 0`, so the
    //   output is strictly positive.
    fn hidden_state_persists_across_calls() {
        let mut weights = LstmWeights::zeros(1, 1);
        weights.weight_ih = array![[0.0], [0.0], [1.0], [0.0]];
        weights.bias_ih = array![100.0, 100.0, 0.0, 100.0];
        weights.weight_ff = array![[1.0]];
        weights.weight_out = array![[1.0]];
        let model = LstmStepModel::new(weights).unwrap();

        let (_, carried) = model.step(array![1.0].view(), None).unwrap();
        let (fresh_out, _) = model.step(array![0.0].view(), None).unwrap();
        let (carried_out, _) = model.step(array![0.0].view(), Some(carried)).unwrap();

        assert_eq!(fresh_out[0], 0.0);
        assert!(carried_out[0] > 0.1, "carried-state output was {}", carried_out[0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify shape validation for inconsistent weight arrays.
    //
    // Given
    // -----
    // - Consistent zero weights for (hidden_dim = 2, ff_dim = 2), each case
    //   corrupting one array.
    //
    // Expect
    // ------
    // - `ModelError::ShapeMismatch` naming the corrupted array.
    fn new_rejects_inconsistent_shapes() {
        let mut bad_hh = LstmWeights::zeros(2, 2);
        bad_hh.weight_hh = Array2::zeros((7, 2));
        assert!(matches!(
            LstmStepModel::new(bad_hh),
            Err(ModelError::ShapeMismatch { what: "weight_hh rows", .. })
        ));

        let mut bad_bias = LstmWeights::zeros(2, 2);
        bad_bias.bias_ih = Array1::zeros(3);
        assert!(matches!(
            LstmStepModel::new(bad_bias),
            Err(ModelError::ShapeMismatch { what: "bias_ih", .. })
        ));

        let mut bad_head = LstmWeights::zeros(2, 2);
        bad_head.weight_out = Array2::zeros((1, 5));
        assert!(matches!(
            LstmStepModel::new(bad_head),
            Err(ModelError::ShapeMismatch { what: "weight_out columns", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify that an empty window and a wrongly sized hidden state are
    // rejected at step time.
    //
    // Given
    // -----
    // - A valid model with `hidden_dim = 2`; an empty window; a length-3
    //   hidden state.
    //
    // Expect
    // ------
    // - `EmptyWindow` for the former, `ShapeMismatch` for the latter.
    fn step_rejects_degenerate_inputs() {
        let model = LstmStepModel::new(LstmWeights::zeros(2, 2)).unwrap();

        let empty = Array1::<f64>::zeros(0);
        assert_eq!(model.step(empty.view(), None), Err(ModelError::EmptyWindow));

        let bad_state = LstmState::zeros(3);
        assert!(matches!(
            model.step(array![1.0].view(), Some(bad_state)),
            Err(ModelError::ShapeMismatch { what: "hidden state", .. })
        ));
    }
}
