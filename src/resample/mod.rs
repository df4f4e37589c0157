//! resample — irregular-history resampling onto the model's uniform cadence.
//!
//! Purpose
//! -------
//! Bundle the resampling half of a prediction call: a piecewise-linear,
//! extrapolating interpolant ([`interp`]), the validated uniform window
//! container ([`data`]), the uniform-grid builder ([`grid`]), and the
//! module's error surface ([`errors`]). Sensor history arrives at irregular
//! real-world timestamps; everything downstream of this module operates on
//! fixed-length windows sampled at the model's native interval.
//!
//! Key behaviors
//! -------------
//! - [`resample_window`] turns raw `(timestamps, values)` history into a
//!   [`Window`] of exactly `seq_len` points spaced `dt_new` apart, ending at
//!   the newest observation, extrapolating linearly at the boundaries.
//! - [`LinearInterpolant`] is exposed directly for callers that need ad-hoc
//!   grid evaluation (the evaluation driver uses it to align predicted and
//!   ground-truth series).
//!
//! Conventions
//! -----------
//! - Windows are ordered oldest → newest with the newest sample last.
//! - Strictly increasing timestamps are a caller responsibility; the module
//!   validates lengths, not monotonicity.
//! - All operations here are pure; nothing is cached between calls.
//!
//! Testing notes
//! -------------
//! - Unit tests live alongside each submodule; the end-to-end behavior is
//!   additionally exercised by the pipeline integration test under `tests/`.

pub mod data;
pub mod errors;
pub mod grid;
pub mod interp;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::Window;
pub use self::errors::{ResampleError, ResampleResult};
pub use self::grid::resample_window;
pub use self::interp::LinearInterpolant;
