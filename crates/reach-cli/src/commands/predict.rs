//! Predict command - one-shot prediction against local artifacts

use clap::Args;
use colored::Colorize;
use reach_engine::Predictor;
use reach_types::{ReachConfig, Result};

use super::PostArgs;
use crate::output::{print_prediction, OutputFormat};

/// Predict engagement for a single post
#[derive(Args, Debug)]
pub struct PredictCommand {
    #[command(flatten)]
    pub post: PostArgs,
}

pub async fn execute(cmd: PredictCommand, config: ReachConfig, format: OutputFormat) -> Result<()> {
    let input = cmd.post.to_input();
    input.validate()?;

    let predictor = Predictor::new(cmd.post.artifact_config(&config.artifacts));
    if format == OutputFormat::Pretty {
        eprintln!("{}", "Loading model artifacts...".dimmed());
    }
    let output = predictor.predict(&input)?;

    print_prediction(&output, format)
}
