//! Reach model layer
//!
//! Everything between raw request fields and final metrics except the
//! lifecycle: feature encoding, the network definition, weight restoration,
//! the tokenizer and scaler artifacts, and output decoding.

pub mod architecture;
pub mod attention;
pub mod encoder;
pub mod loader;
pub mod postprocess;
pub mod scaler;
pub mod test_utils;
pub mod tokenizer;

pub use architecture::{ArchitectureSpec, EngagementModel};
pub use encoder::{encode, encode_numeric, encode_text, platform_id};
pub use loader::{load_model, LoadStrategy, LoadedModel};
pub use postprocess::postprocess;
pub use scaler::TargetScaler;
pub use tokenizer::{
    load_tokenizer, tokenizer_from_json, HuggingFaceTokenizerAdapter, TextTokenizer,
    TokenizerHandle, WordIndexTokenizer,
};

pub use reach_types::{ReachError, Result};
