//! Reach engine
//!
//! [`Predictor`] owns the loaded artifacts for the life of the process and
//! composes encoding, inference and decoding into `predict()`.

pub mod inference;
pub mod predictor;

pub use inference::run;
pub use predictor::{LoadedArtifacts, Predictor};

pub use reach_types::{ReachError, Result};
