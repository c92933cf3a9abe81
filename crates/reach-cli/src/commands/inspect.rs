//! Inspect command - show the encoded features for a post

use clap::Args;
use reach_models::{encode, load_tokenizer};
use reach_types::{Platform, ReachConfig, Result};

use super::PostArgs;
use crate::output::{print_features, print_warning, OutputFormat};

/// Encode a post and print the network inputs; the model is not loaded
#[derive(Args, Debug)]
pub struct InspectCommand {
    #[command(flatten)]
    pub post: PostArgs,
}

pub async fn execute(cmd: InspectCommand, config: ReachConfig, format: OutputFormat) -> Result<()> {
    let input = cmd.post.to_input();
    input.validate()?;

    if Platform::from_name(&input.platform).is_none() {
        print_warning(&format!(
            "Unknown platform '{}' encodes as {}",
            input.platform,
            Platform::Facebook
        ));
    }

    let artifacts = cmd.post.artifact_config(&config.artifacts);
    let tokenizer = load_tokenizer(&artifacts.tokenizer_path())?;
    let features = encode(tokenizer.as_ref(), &input)?;

    print_features(&features, format)
}
