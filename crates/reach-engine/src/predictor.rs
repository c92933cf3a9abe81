//! Predictor lifecycle
//!
//! Artifacts are loaded once, under a single-initializer guard, and then
//! shared read-only by every request. Concurrent first callers block on the
//! one in-flight load instead of repeating it.

use std::time::Instant;

use candle_core::Device as CandleDevice;
use once_cell::sync::OnceCell;
use reach_models::{
    encode, load_model, load_tokenizer, postprocess, ArchitectureSpec, EngagementModel,
    LoadStrategy, TargetScaler, TokenizerHandle,
};
use reach_types::{ArtifactConfig, EncodedFeatures, PredictionInput, PredictionOutput, Result};
use tracing::{debug, info};

use crate::inference;

/// Everything `predict()` needs, immutable once loaded
#[derive(Debug)]
pub struct LoadedArtifacts {
    pub model: EngagementModel,
    pub strategy: LoadStrategy,
    pub tokenizer: TokenizerHandle,
    pub scaler: TargetScaler,
}

impl LoadedArtifacts {
    fn load(config: &ArtifactConfig, spec: ArchitectureSpec, device: &CandleDevice) -> Result<Self> {
        let start = Instant::now();

        info!("Building network and restoring weights …");
        let loaded = load_model(spec, &config.model_path(), device)?;

        info!("Loading tokenizer …");
        let tokenizer = load_tokenizer(&config.tokenizer_path())?;

        info!("Loading target scaler …");
        let scaler = TargetScaler::load(&config.scaler_path())?;

        info!(
            "All model artifacts loaded in {:.2?} ({} weights)",
            start.elapsed(),
            loaded.strategy
        );
        Ok(Self {
            model: loaded.model,
            strategy: loaded.strategy,
            tokenizer,
            scaler,
        })
    }

    /// Encode → forward → decode for one request
    pub fn predict(&self, input: &PredictionInput) -> Result<PredictionOutput> {
        let features = encode(self.tokenizer.as_ref(), input)?;
        let raw = inference::run(&self.model, &features)?;
        postprocess(&self.scaler, &raw)
    }
}

/// Process-wide prediction service
#[derive(Debug)]
pub struct Predictor {
    artifacts: ArtifactConfig,
    spec: ArchitectureSpec,
    device: CandleDevice,
    state: OnceCell<LoadedArtifacts>,
}

impl Predictor {
    /// Predictor for the trained architecture; nothing is loaded yet
    pub fn new(artifacts: ArtifactConfig) -> Self {
        Self {
            artifacts,
            spec: ArchitectureSpec::default(),
            device: CandleDevice::Cpu,
            state: OnceCell::new(),
        }
    }

    /// Override the architecture the weights are restored into
    pub fn with_spec(mut self, spec: ArchitectureSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn artifacts(&self) -> &ArtifactConfig {
        &self.artifacts
    }

    /// Load every artifact if not already loaded.
    ///
    /// Idempotent. A failed load leaves the predictor unloaded and the error
    /// is returned to the caller; it is not retried here.
    pub fn load(&self) -> Result<&LoadedArtifacts> {
        self.state
            .get_or_try_init(|| LoadedArtifacts::load(&self.artifacts, self.spec, &self.device))
    }

    pub fn is_loaded(&self) -> bool {
        self.state.get().is_some()
    }

    /// Feature encoding only (loads the tokenizer with everything else)
    pub fn encode(&self, input: &PredictionInput) -> Result<EncodedFeatures> {
        let artifacts = self.load()?;
        encode(artifacts.tokenizer.as_ref(), input)
    }

    /// Predict engagement metrics, loading artifacts first if needed
    pub fn predict(&self, input: &PredictionInput) -> Result<PredictionOutput> {
        let artifacts = self.load()?;
        let start = Instant::now();
        let output = artifacts.predict(input)?;
        debug!(
            "Predicted {} post in {:.2?}: {:?}",
            input.platform,
            start.elapsed(),
            output
        );
        Ok(output)
    }
}
