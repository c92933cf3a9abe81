//! Error types for the Reach prediction pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Reach operations
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum ReachError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Missing, unreadable or corrupt artifact files
    #[error("Artifact error: {message}")]
    Artifact { message: String },

    /// Architecture construction / weight restoration errors
    #[error("Model error: {message}")]
    Model { message: String },

    /// Tokenizer artifact errors (load time)
    #[error("Tokenizer error: {message}")]
    Tokenizer { message: String },

    /// Target scaler errors
    #[error("Scaler error: {message}")]
    Scaler { message: String },

    /// Forward pass or numeric failures for a single request
    #[error("Inference error: {message}")]
    Inference { message: String },

    /// Request validation errors
    #[error("Request validation error: {message}")]
    RequestValidation { message: String },

    /// I/O errors
    #[error("I/O error: {message}")]
    IO { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ReachError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an artifact error
    pub fn artifact(message: impl Into<String>) -> Self {
        Self::Artifact {
            message: message.into(),
        }
    }

    /// Create a model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Create a tokenizer error
    pub fn tokenizer(message: impl Into<String>) -> Self {
        Self::Tokenizer {
            message: message.into(),
        }
    }

    /// Create a scaler error
    pub fn scaler(message: impl Into<String>) -> Self {
        Self::Scaler {
            message: message.into(),
        }
    }

    /// Create an inference error
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    /// Create a request validation error
    pub fn request_validation(message: impl Into<String>) -> Self {
        Self::RequestValidation {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::IO {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Initialization failures: the service cannot become ready until the
    /// environment is fixed and the process restarted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::Artifact { .. }
                | Self::Model { .. }
                | Self::Tokenizer { .. }
                | Self::Scaler { .. }
        )
    }

    /// Check if this is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::RequestValidation { .. })
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Artifact { .. } => "ARTIFACT_ERROR",
            Self::Model { .. } => "MODEL_ERROR",
            Self::Tokenizer { .. } => "TOKENIZER_ERROR",
            Self::Scaler { .. } => "SCALER_ERROR",
            Self::Inference { .. } => "INFERENCE_ERROR",
            Self::RequestValidation { .. } => "INVALID_REQUEST",
            Self::IO { .. } => "IO_ERROR",
            Self::Serialization { .. } => "SERIALIZATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Conversion from std::io::Error
impl From<std::io::Error> for ReachError {
    fn from(err: std::io::Error) -> Self {
        Self::io(format!("{}", err))
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for ReachError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("{}", err))
    }
}
