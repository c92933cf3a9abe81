//! Configuration for the Reach service
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables, so a container can be configured without a file.

use crate::{ReachError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Trained artifact locations
    pub artifacts: ArtifactConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Allow cross-origin requests from any origin
    pub enable_cors: bool,
    /// Load model artifacts before accepting traffic
    pub preload: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            preload: true,
        }
    }
}

/// Locations of the trained artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory relative paths are resolved against
    pub base_dir: Option<PathBuf>,
    /// Weights: a safetensors file or a saved-model bundle directory
    pub model_path: PathBuf,
    /// Tokenizer JSON
    pub tokenizer_path: PathBuf,
    /// Target scaler JSON
    pub scaler_path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            model_path: PathBuf::from("SavedModels/transformer"),
            tokenizer_path: PathBuf::from("SavedModels/tokenizer.json"),
            scaler_path: PathBuf::from("SavedModels/y_scaler.json"),
        }
    }
}

impl ArtifactConfig {
    /// Artifacts rooted in one directory, using the default file names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            base_dir: None,
            model_path: dir.join("transformer"),
            tokenizer_path: dir.join("tokenizer.json"),
            scaler_path: dir.join("y_scaler.json"),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(&self.model_path)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.resolve(&self.tokenizer_path)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.resolve(&self.scaler_path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl ReachConfig {
    /// Load from a TOML file; a missing file yields the defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ReachError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ReachError::config(format!("Failed to parse config: {}", e)))
    }

    /// File (if present), then process environment, then validation
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ReachError::config(format!("Invalid PORT value: {}", port)))?;
        }
        if let Some(path) = lookup("REACH_MODEL_PATH") {
            self.artifacts.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("REACH_TOKENIZER_PATH") {
            self.artifacts.tokenizer_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("REACH_SCALER_PATH") {
            self.artifacts.scaler_path = PathBuf::from(path);
        }
        if let Some(level) = lookup("REACH_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ReachError::config("Server port cannot be 0"));
        }
        if self.server.host.is_empty() {
            return Err(ReachError::config("Server host cannot be empty"));
        }

        let paths = [
            ("model_path", &self.artifacts.model_path),
            ("tokenizer_path", &self.artifacts.tokenizer_path),
            ("scaler_path", &self.artifacts.scaler_path),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ReachError::config(format!("{} cannot be empty", name)));
            }
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ReachError::config(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ReachError::serialization(format!("Failed to render config: {}", e)))
    }
}
