//! CLI command implementations

pub mod config_cmd;
pub mod inspect;
pub mod predict;
pub mod serve;

use std::path::PathBuf;

use clap::Args;
use reach_types::{ArtifactConfig, PredictionInput};

pub use config_cmd::ConfigCommand;
pub use inspect::InspectCommand;
pub use predict::PredictCommand;
pub use serve::ServeCommand;

/// Post description shared by `predict` and `inspect`
#[derive(Args, Debug, Clone)]
pub struct PostArgs {
    /// Post caption
    #[arg(long, default_value = "")]
    pub caption: String,

    /// Post body text
    #[arg(long, default_value = "")]
    pub content: String,

    /// Platform name (Facebook, Instagram, TikTok, Twitter, YouTube)
    #[arg(short, long)]
    pub platform: String,

    /// Scheduled date, YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub date: String,

    /// Scheduled time, HH:MM
    #[arg(long, default_value = "")]
    pub time: String,

    /// Follower count of the account
    #[arg(short, long, default_value_t = 0)]
    pub followers: i64,

    /// Post will be boosted with ad spend
    #[arg(long)]
    pub ad_boost: bool,

    /// Directory holding transformer/, tokenizer.json and y_scaler.json
    #[arg(long)]
    pub artifacts: Option<PathBuf>,
}

impl PostArgs {
    pub fn to_input(&self) -> PredictionInput {
        PredictionInput::new(&self.caption, &self.content, &self.platform)
            .with_schedule(&self.date, &self.time)
            .with_followers(self.followers)
            .with_ad_boost(self.ad_boost)
    }

    /// Artifact locations, preferring `--artifacts` over configuration
    pub fn artifact_config(&self, configured: &ArtifactConfig) -> ArtifactConfig {
        match &self.artifacts {
            Some(dir) => ArtifactConfig::in_dir(dir),
            None => configured.clone(),
        }
    }
}
