//! membrane_rollout — offline evaluation core for a recurrent membrane-displacement forecaster, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the prediction pipeline to Python via the `_membrane_rollout`
//! extension module. The pipeline is: resample an irregular displacement
//! history onto the model's uniform grid, roll a recurrent step model
//! forward far enough to straddle the requested delay, and blend the last
//! two produced samples by the fractional step remainder. The `evaluate`
//! module scores a model over a held-out recording the same way it would be
//! used online.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`resample`, `normalize`, `model`,
//!   `rollout`, `predict`, `evaluate`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_membrane_rollout` Python extension.
//! - Create and register Python submodules (`forecasting`, `metrics`) under
//!   `membrane_rollout` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input validation, and error mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror the
//!   invariants and signatures of their Rust counterparts (e.g.
//!   `Forecaster` wraps [`LstmStepModel`] + [`MeanScaleNormalizer`] +
//!   [`RolloutConfig`]).
//!
//! Conventions
//! -----------
//! - Python-exposed items live under `_membrane_rollout.<submodule>` and are
//!   typically wrapped by thin pure-Python facades in the top-level
//!   `membrane_rollout` package.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules
//!   and can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports the `_membrane_rollout` module
//!   defined here and wraps its classes in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the end-to-end integration test under `tests/`.
//! - Smoke tests for the PyO3 bindings verify that classes can be
//!   constructed, called, and round-tripped correctly from Python.

pub mod evaluate;
pub mod model;
pub mod normalize;
pub mod predict;
pub mod resample;
pub mod rollout;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use std::str::FromStr;

#[cfg(feature = "python-bindings")]
use crate::{
    evaluate::{
        driver::{EvaluationReport, align_series, evaluate_forecast, sliding_forecast},
        metrics,
    },
    model::lstm::LstmStepModel,
    normalize::affine::MeanScaleNormalizer,
    resample::grid::resample_window,
    rollout::predictor::{RolloutConfig, RolloutPredictor, RoundingPolicy},
    utils::{build_lstm_model, extract_vector},
};

/// Forecaster — Python-facing wrapper for the full prediction pipeline.
///
/// Purpose
/// -------
/// Bundle a validated [`LstmStepModel`], a fitted [`MeanScaleNormalizer`],
/// and a [`RolloutConfig`] into one object Python code can call per window
/// or per recording.
///
/// Key behaviors
/// -------------
/// - Validate and convert the eight weight arrays once at construction;
///   every later call reuses the validated model.
/// - `predict` runs resample + rollout for a single history window.
/// - `forecast_series` runs the sliding-window evaluation loop and returns
///   the (times, values) forecast series.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Forecaster(weight_ih, weight_hh, bias_ih, bias_hh, weight_ff, bias_ff,
/// weight_out, bias_out, mean, scale, rounding=None)`:
/// - `weight_ih`: `(4 * hidden_dim, 1)` float64 array.
/// - `weight_hh`: `(4 * hidden_dim, hidden_dim)` float64 array.
/// - `bias_ih`, `bias_hh`: length `4 * hidden_dim` float64 arrays.
/// - `weight_ff`: `(ff_dim, hidden_dim)`; `bias_ff`: length `ff_dim`.
/// - `weight_out`: `(1, ff_dim)`; `bias_out`: length 1.
/// - `mean`, `scale`: `f64`
///   Normalization statistics fitted on the training data; `scale != 0`.
/// - `rounding`: `Option<&str>`
///   `'exact'` (default), `'nearest'`, or `'truncate'`.
///
/// Fields
/// ------
/// - `model`: [`LstmStepModel`] — validated recurrent step model.
/// - `normalizer`: [`MeanScaleNormalizer`] — fitted, immutable.
/// - `predictor`: [`RolloutPredictor`] — rollout engine with the configured
///   rounding policy.
///
/// Invariants
/// ----------
/// - Weight shapes are mutually consistent; checked once at construction.
/// - The wrapper holds no mutable state; predictions are independent.
///
/// Notes
/// -----
/// - Native Rust callers should use [`crate::predict::predict`] or
///   [`RolloutPredictor`] directly; this type exists solely for the PyO3
///   binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "membrane_rollout.forecasting")]
pub struct Forecaster {
    model: LstmStepModel,
    normalizer: MeanScaleNormalizer,
    predictor: RolloutPredictor,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Forecaster {
    #[new]
    #[pyo3(
        signature = (
            weight_ih,
            weight_hh,
            bias_ih,
            bias_hh,
            weight_ff,
            bias_ff,
            weight_out,
            bias_out,
            mean,
            scale,
            rounding = None,
        ),
        text_signature = "(weight_ih, weight_hh, bias_ih, bias_hh, weight_ff, bias_ff, \
                          weight_out, bias_out, mean, scale, /, rounding=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, weight_ih: &Bound<'py, PyAny>, weight_hh: &Bound<'py, PyAny>,
        bias_ih: &Bound<'py, PyAny>, bias_hh: &Bound<'py, PyAny>, weight_ff: &Bound<'py, PyAny>,
        bias_ff: &Bound<'py, PyAny>, weight_out: &Bound<'py, PyAny>,
        bias_out: &Bound<'py, PyAny>, mean: f64, scale: f64, rounding: Option<&str>,
    ) -> PyResult<Self> {
        let model = build_lstm_model(
            py, weight_ih, weight_hh, bias_ih, bias_hh, weight_ff, bias_ff, weight_out, bias_out,
        )?;
        let normalizer = MeanScaleNormalizer::new(mean, scale)?;
        let policy = match rounding {
            Some(name) => RoundingPolicy::from_str(name)?,
            None => RoundingPolicy::default(),
        };
        let predictor = RolloutPredictor::new(RolloutConfig { rounding: policy });
        Ok(Forecaster { model, normalizer, predictor })
    }

    /// Predict the displacement index `delay` past the last observation of
    /// one irregular history window.
    #[pyo3(
        signature = (timestamps, values, dt_new, delay, seq_len),
        text_signature = "(self, timestamps, values, dt_new, delay, seq_len)"
    )]
    pub fn predict<'py>(
        &self, py: Python<'py>, timestamps: &Bound<'py, PyAny>, values: &Bound<'py, PyAny>,
        dt_new: f64, delay: f64, seq_len: usize,
    ) -> PyResult<f64> {
        let times = extract_vector(py, timestamps, "timestamps")?;
        let vals = extract_vector(py, values, "values")?;

        let window = resample_window(&times, &vals, dt_new, seq_len)?;
        let prediction = self.predictor.predict(&self.model, &self.normalizer, &window, delay)?;
        Ok(prediction)
    }

    /// Run the sliding-window evaluation loop over a full recording and
    /// return the forecast as `(times, values)` lists.
    #[pyo3(
        signature = (timestamps, values, dt_new, delay, seq_len),
        text_signature = "(self, timestamps, values, dt_new, delay, seq_len)"
    )]
    pub fn forecast_series<'py>(
        &self, py: Python<'py>, timestamps: &Bound<'py, PyAny>, values: &Bound<'py, PyAny>,
        dt_new: f64, delay: f64, seq_len: usize,
    ) -> PyResult<(Vec<f64>, Vec<f64>)> {
        let times = extract_vector(py, timestamps, "timestamps")?;
        let vals = extract_vector(py, values, "values")?;

        let forecast = sliding_forecast(
            &self.model,
            &self.normalizer,
            &times,
            &vals,
            dt_new,
            delay,
            seq_len,
            self.predictor.config(),
        )?;
        Ok((forecast.times.to_vec(), forecast.values.to_vec()))
    }
}

/// ForecastReport — evaluation metrics for one scored run, exposed to Python.
///
/// Purpose
/// -------
/// Present the four quality metrics from [`EvaluationReport`] to Python code
/// in a lightweight, read-only wrapper.
///
/// Parameters
/// ----------
/// Instances are constructed by [`score`] and are not created directly by
/// user code.
///
/// Fields
/// ------
/// - `inner`: [`EvaluationReport`]
///   Rust-side report holding the metric values used by the accessors.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "membrane_rollout.metrics")]
pub struct ForecastReport {
    inner: EvaluationReport,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ForecastReport {
    /// Mean absolute error, in signal units.
    #[getter]
    pub fn mae(&self) -> f64 {
        self.inner.mae
    }

    /// Symmetric mean absolute percentage error, 0–100.
    #[getter]
    pub fn smape_pct(&self) -> f64 {
        self.inner.smape_pct
    }

    /// Percent variance explained (R² × 100).
    #[getter]
    pub fn variance_explained_pct(&self) -> f64 {
        self.inner.variance_explained_pct
    }

    /// High-frequency-band SNR in dB; `inf` on exact agreement.
    #[getter]
    pub fn high_freq_snr_db(&self) -> f64 {
        self.inner.high_freq_snr_db
    }
}

/// Score an aligned forecast against ground truth with all four metrics.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "score",
    signature = (predicted, truth, fs, cutoff_hz),
    text_signature = "(predicted, truth, fs, cutoff_hz)"
)]
pub fn score<'py>(
    py: Python<'py>, predicted: &Bound<'py, PyAny>, truth: &Bound<'py, PyAny>, fs: f64,
    cutoff_hz: f64,
) -> PyResult<ForecastReport> {
    let pred = Array1::from(extract_vector(py, predicted, "predicted")?);
    let tru = Array1::from(extract_vector(py, truth, "truth")?);
    let inner = evaluate_forecast(pred.view(), tru.view(), fs, cutoff_hz)?;
    Ok(ForecastReport { inner })
}

/// Interpolate two (times, values) series onto a common uniform grid over
/// their time overlap; returns `(common_times, a_on_grid, b_on_grid)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "align",
    signature = (a_times, a_values, b_times, b_values, n),
    text_signature = "(a_times, a_values, b_times, b_values, n)"
)]
pub fn align<'py>(
    py: Python<'py>, a_times: &Bound<'py, PyAny>, a_values: &Bound<'py, PyAny>,
    b_times: &Bound<'py, PyAny>, b_values: &Bound<'py, PyAny>, n: usize,
) -> PyResult<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    let at = extract_vector(py, a_times, "a_times")?;
    let av = extract_vector(py, a_values, "a_values")?;
    let bt = extract_vector(py, b_times, "b_times")?;
    let bv = extract_vector(py, b_values, "b_values")?;

    let (common, a_on_grid, b_on_grid) = align_series(&at, &av, &bt, &bv, n)?;
    Ok((common.to_vec(), a_on_grid.to_vec(), b_on_grid.to_vec()))
}

/// Mean absolute error between two aligned series.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "mae")]
pub fn mae_py<'py>(
    py: Python<'py>, predicted: &Bound<'py, PyAny>, truth: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let pred = Array1::from(extract_vector(py, predicted, "predicted")?);
    let tru = Array1::from(extract_vector(py, truth, "truth")?);
    Ok(metrics::mae(pred.view(), tru.view())?)
}

/// Symmetric mean absolute percentage error, 0–100.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "smape")]
pub fn smape_py<'py>(
    py: Python<'py>, predicted: &Bound<'py, PyAny>, truth: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let pred = Array1::from(extract_vector(py, predicted, "predicted")?);
    let tru = Array1::from(extract_vector(py, truth, "truth")?);
    Ok(metrics::smape(pred.view(), tru.view())?)
}

/// Percent variance explained (R² × 100).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "percent_variance_explained")]
pub fn percent_variance_explained_py<'py>(
    py: Python<'py>, predicted: &Bound<'py, PyAny>, truth: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let pred = Array1::from(extract_vector(py, predicted, "predicted")?);
    let tru = Array1::from(extract_vector(py, truth, "truth")?);
    Ok(metrics::percent_variance_explained(pred.view(), tru.view())?)
}

/// Signal-to-noise ratio of the high-frequency band, in dB.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "high_freq_snr")]
pub fn high_freq_snr_py<'py>(
    py: Python<'py>, predicted: &Bound<'py, PyAny>, truth: &Bound<'py, PyAny>, fs: f64,
    cutoff_hz: f64,
) -> PyResult<f64> {
    let pred = Array1::from(extract_vector(py, predicted, "predicted")?);
    let tru = Array1::from(extract_vector(py, truth, "truth")?);
    Ok(metrics::high_freq_snr(pred.view(), tru.view(), fs, cutoff_hz)?)
}

/// _membrane_rollout — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_membrane_rollout` Python module and register its submodules
/// used by the public `membrane_rollout` package.
///
/// Key behaviors
/// -------------
/// - Create `forecasting` and `metrics` submodules.
/// - Attach those submodules to the parent `_membrane_rollout` module.
/// - Register the submodules in `sys.modules` so they are importable via
///   dotted paths from Python.
///
/// Notes
/// -----
/// - This function is invoked automatically by Python when importing the
///   compiled extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _membrane_rollout<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let forecasting_mod = PyModule::new(_py, "forecasting")?;
    let metrics_mod = PyModule::new(_py, "metrics")?;
    forecasting(_py, m, &forecasting_mod)?;
    metrics_submodule(_py, m, &metrics_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("membrane_rollout.forecasting", forecasting_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("membrane_rollout.metrics", metrics_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn forecasting<'py>(
    _py: Python, membrane_rollout: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Forecaster>()?;
    membrane_rollout.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn metrics_submodule<'py>(
    _py: Python, membrane_rollout: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<ForecastReport>()?;
    m.add_function(wrap_pyfunction!(score, m)?)?;
    m.add_function(wrap_pyfunction!(align, m)?)?;
    m.add_function(wrap_pyfunction!(mae_py, m)?)?;
    m.add_function(wrap_pyfunction!(smape_py, m)?)?;
    m.add_function(wrap_pyfunction!(percent_variance_explained_py, m)?)?;
    m.add_function(wrap_pyfunction!(high_freq_snr_py, m)?)?;
    membrane_rollout.add_submodule(m)?;
    Ok(())
}
