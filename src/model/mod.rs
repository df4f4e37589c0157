//! model — the recurrent step-model capability and its production LSTM.
//!
//! The rollout loop treats the trained sequence model as a single opaque
//! capability: [`StepModel::step`] maps a normalized window plus optional
//! recurrent memory to a same-length output and successor memory. This
//! module defines that contract ([`step`]), the production single-layer
//! LSTM + feed-forward implementation ([`lstm`]), and the model error
//! surface ([`errors`]). Training and checkpoint parsing live outside this
//! crate; weights arrive as plain arrays.

pub mod errors;
pub mod lstm;
pub mod step;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ModelError, ModelResult};
pub use self::lstm::{LstmState, LstmStepModel, LstmWeights};
pub use self::step::StepModel;
