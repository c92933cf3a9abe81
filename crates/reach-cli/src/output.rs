//! Output formatting utilities

use colored::*;
use reach_types::{
    EncodedFeatures, NumericFeature, PredictionOutput, ReachError, Result, PAD_TOKEN_ID,
};
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| ReachError::serialization(format!("JSON serialization failed: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub fn print_prediction(output: &PredictionOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Pretty => {
            println!("{}", "Predicted engagement".bold());
            for (target, value) in output.iter() {
                println!("  {:<22} {}", target.name(), format!("{:.2}", value).cyan());
            }
            Ok(())
        }
    }
}

pub fn print_features(features: &EncodedFeatures, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(features),
        OutputFormat::Pretty => {
            println!("{}", "Numeric features".bold());
            for feature in NumericFeature::ALL {
                let value = features
                    .numeric(feature)
                    .map_or_else(|| "missing".to_string(), |v| v.to_string());
                println!("  {:<14} {}", feature.name(), value.cyan());
            }

            let tokens = features.token_count();
            println!(
                "{} {} of {} positions used",
                "Token sequence".bold(),
                tokens.to_string().cyan(),
                features.token_sequence.len()
            );
            let shown: Vec<String> = features
                .token_sequence
                .iter()
                .filter(|&&t| t != PAD_TOKEN_ID)
                .map(|t| t.to_string())
                .collect();
            println!("  [{}]", shown.join(", "));
            Ok(())
        }
    }
}

/// Print warning with formatting
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}
