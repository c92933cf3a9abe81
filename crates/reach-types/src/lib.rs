//! Core type definitions for the Reach engagement predictor
//!
//! This crate holds the request/response types, the fixed feature and target
//! contract shared by every stage of the pipeline, configuration, and the
//! error type. It stays free of ML dependencies so the HTTP and CLI layers
//! can depend on it cheaply.

pub mod config;
pub mod errors;
pub mod features;
pub mod outputs;
pub mod requests;

pub use config::*;
pub use errors::*;
pub use features::*;
pub use outputs::*;
pub use requests::*;

/// Result type used throughout Reach
pub type Result<T> = std::result::Result<T, ReachError>;
