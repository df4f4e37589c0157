//! Prediction-quality metrics for scored evaluation runs.
//!
//! Purpose
//! -------
//! Score a predicted series against aligned ground truth with the four
//! quantities an evaluation run reports: mean absolute error, symmetric
//! mean absolute percentage error, percent variance explained (R² × 100),
//! and the signal-to-noise ratio of the high-frequency band — the band the
//! forecaster actually has to track, since slow drift is easy and the
//! membrane oscillation is the hard part.
//!
//! Key behaviors
//! -------------
//! - All metrics validate equal, non-empty lengths up front and are pure
//!   functions of their inputs.
//! - [`smape`] guards the both-zero sample case: a term with
//!   `|p| + |t| == 0` contributes zero error rather than 0/0.
//! - [`high_freq_snr`] first-order high-passes *both* series above the
//!   cutoff, then reports `10 · log10(Σ truth_hp² / Σ (pred_hp − truth_hp)²)`
//!   in dB. An exact match yields `+∞`.
//!
//! Conventions
//! -----------
//! - Percentages are returned on a 0–100 scale.
//! - Series are assumed uniformly sampled at `fs` where a sampling rate is
//!   taken; alignment onto a uniform grid is the driver's job.
//!
//! Testing notes
//! -------------
//! - Unit tests pin each metric on hand-computable series, the degenerate
//!   domains (constant truth, bad cutoff), and the exact-match SNR.
use crate::evaluate::errors::{EvalError, EvalResult};
use ndarray::{Array1, ArrayView1};
use std::f64::consts::PI;

fn check_pair(predicted: ArrayView1<f64>, truth: ArrayView1<f64>) -> EvalResult<()> {
    if predicted.len() != truth.len() {
        return Err(EvalError::LengthMismatch { left: predicted.len(), right: truth.len() });
    }
    if predicted.is_empty() {
        return Err(EvalError::EmptySeries);
    }
    Ok(())
}

/// Mean absolute error between a prediction and aligned ground truth.
///
/// Errors
/// ------
/// - `EvalError::LengthMismatch`, `EvalError::EmptySeries`.
pub fn mae(predicted: ArrayView1<f64>, truth: ArrayView1<f64>) -> EvalResult<f64> {
    check_pair(predicted, truth)?;
    let total: f64 =
        predicted.iter().zip(truth.iter()).map(|(p, t)| (p - t).abs()).sum();
    Ok(total / predicted.len() as f64)
}

/// Symmetric mean absolute percentage error, on a 0–100 scale.
///
/// Each sample contributes `2 |p − t| / (|p| + |t|)`; samples where both
/// values are exactly zero contribute zero error.
///
/// Errors
/// ------
/// - `EvalError::LengthMismatch`, `EvalError::EmptySeries`.
pub fn smape(predicted: ArrayView1<f64>, truth: ArrayView1<f64>) -> EvalResult<f64> {
    check_pair(predicted, truth)?;
    let total: f64 = predicted
        .iter()
        .zip(truth.iter())
        .map(|(p, t)| {
            let denom = p.abs() + t.abs();
            if denom > 0.0 { 2.0 * (p - t).abs() / denom } else { 0.0 }
        })
        .sum();
    Ok(100.0 * total / predicted.len() as f64)
}

/// Percent variance explained: `100 · (1 − SS_res / SS_tot)`, i.e. R² on a
/// percentage scale. Negative when the prediction is worse than the truth's
/// mean.
///
/// Errors
/// ------
/// - `EvalError::LengthMismatch`, `EvalError::EmptySeries`.
/// - `EvalError::ConstantTruth` when the ground truth has zero variance.
pub fn percent_variance_explained(
    predicted: ArrayView1<f64>, truth: ArrayView1<f64>,
) -> EvalResult<f64> {
    check_pair(predicted, truth)?;
    let mean_truth = truth.sum() / truth.len() as f64;
    let ss_tot: f64 = truth.iter().map(|t| (t - mean_truth).powi(2)).sum();
    if ss_tot == 0.0 {
        return Err(EvalError::ConstantTruth);
    }
    let ss_res: f64 =
        predicted.iter().zip(truth.iter()).map(|(p, t)| (p - t).powi(2)).sum();
    Ok(100.0 * (1.0 - ss_res / ss_tot))
}

/// Signal-to-noise ratio of the high-frequency band, in dB.
///
/// Both series are passed through a first-order high-pass with cutoff
/// `cutoff_hz` (sampling rate `fs`), then the ratio of filtered ground-
/// truth power to filtered error power is reported:
/// `10 · log10(Σ truth_hp² / Σ (pred_hp − truth_hp)²)`. Exact agreement
/// gives `+∞`; a prediction with no high-frequency content against a truth
/// that has some gives a strongly negative value.
///
/// Errors
/// ------
/// - `EvalError::LengthMismatch`, `EvalError::EmptySeries`.
/// - `EvalError::InvalidCutoff` unless `0 < cutoff_hz < fs / 2` with both
///   finite.
pub fn high_freq_snr(
    predicted: ArrayView1<f64>, truth: ArrayView1<f64>, fs: f64, cutoff_hz: f64,
) -> EvalResult<f64> {
    check_pair(predicted, truth)?;
    if !fs.is_finite() || !cutoff_hz.is_finite() || cutoff_hz <= 0.0 || cutoff_hz >= fs / 2.0 {
        return Err(EvalError::InvalidCutoff { fs, cutoff_hz });
    }

    let pred_hp = high_pass(predicted, fs, cutoff_hz);
    let truth_hp = high_pass(truth, fs, cutoff_hz);

    let signal_power: f64 = truth_hp.iter().map(|v| v * v).sum();
    let noise_power: f64 =
        pred_hp.iter().zip(truth_hp.iter()).map(|(p, t)| (p - t).powi(2)).sum();

    if noise_power == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (signal_power / noise_power).log10())
}

/// First-order RC high-pass: `y[0] = x[0]`,
/// `y[i] = α · (y[i−1] + x[i] − x[i−1])` with `α = rc / (rc + 1/fs)` and
/// `rc = 1 / (2π · cutoff_hz)`.
fn high_pass(x: ArrayView1<f64>, fs: f64, cutoff_hz: f64) -> Array1<f64> {
    let rc = 1.0 / (2.0 * PI * cutoff_hz);
    let dt = 1.0 / fs;
    let alpha = rc / (rc + dt);

    let mut y = Array1::zeros(x.len());
    y[0] = x[0];
    for i in 1..x.len() {
        y[i] = alpha * (y[i - 1] + x[i] - x[i - 1]);
    }
    y
}
