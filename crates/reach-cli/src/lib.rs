//! # Reach CLI Library
//!
//! ## Commands
//!
//! - `serve`: Start the HTTP prediction server
//! - `predict`: One-shot prediction against local artifacts
//! - `inspect`: Show the encoded features for a request
//! - `config`: Show, validate or generate configuration

pub mod commands;
pub mod output;
pub mod utils;

pub use output::OutputFormat;
