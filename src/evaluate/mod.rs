//! evaluate — sliding-window scoring of a trained forecaster.
//!
//! Purpose
//! -------
//! Everything needed to score a model offline against a held-out recording:
//! the sliding-window driver that produces a forecast series ([`driver`]),
//! alignment of forecast and truth onto a common grid, the four quality
//! metrics ([`metrics`]), and the module error surface ([`errors`]).
//!
//! Key behaviors
//! -------------
//! - [`sliding_forecast`] → [`align_series`] → [`evaluate_forecast`] is the
//!   intended pipeline; each stage is usable on its own.
//! - Failures inside the driver carry the offending window index; metric
//!   domain failures name the degenerate condition.
//!
//! Conventions
//! -----------
//! - Percent metrics are on a 0–100 scale; SNR is in dB.
//! - Nothing here mutates the model or normalizer; evaluation is read-only.

pub mod driver;
pub mod errors;
pub mod metrics;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::driver::{
    EvaluationReport, ForecastSeries, align_series, evaluate_forecast, sliding_forecast,
};
pub use self::errors::{EvalError, EvalResult};
pub use self::metrics::{high_freq_snr, mae, percent_variance_explained, smape};
