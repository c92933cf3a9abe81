//! Configuration command implementation

use std::path::PathBuf;

use clap::Args;
use colored::*;
use reach_types::{ReachConfig, ReachError, Result};

use crate::output::{print_json, OutputFormat};

#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Show the effective configuration
    #[arg(short, long)]
    pub show: bool,

    /// Validate the configuration and check artifact files exist
    #[arg(short, long)]
    pub validate: bool,

    /// Generate a default configuration file
    #[arg(long)]
    pub generate: bool,

    /// Output file for generated config (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn execute(cmd: ConfigCommand, config: ReachConfig, format: OutputFormat) -> Result<()> {
    if cmd.validate {
        return validate_config(&config);
    }

    if cmd.generate {
        return generate_config(cmd.output);
    }

    // Default: show config
    show_config(&config, format)
}

fn show_config(config: &ReachConfig, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(config);
    }

    println!("{} Current configuration", "⚙️".bright_blue());
    println!("Server:");
    println!("  Host: {}", config.server.host.cyan());
    println!("  Port: {}", config.server.port.to_string().cyan());
    println!("  CORS: {}", config.server.enable_cors.to_string().cyan());
    println!("  Preload: {}", config.server.preload.to_string().cyan());

    println!("Artifacts:");
    println!("  Model: {}", config.artifacts.model_path().display().to_string().cyan());
    println!(
        "  Tokenizer: {}",
        config.artifacts.tokenizer_path().display().to_string().cyan()
    );
    println!("  Scaler: {}", config.artifacts.scaler_path().display().to_string().cyan());

    println!("Logging:");
    println!("  Level: {}", config.logging.level.cyan());
    println!("  Format: {}", config.logging.format.cyan());
    Ok(())
}

fn validate_config(config: &ReachConfig) -> Result<()> {
    config.validate()?;

    let artifacts = [
        ("model", config.artifacts.model_path()),
        ("tokenizer", config.artifacts.tokenizer_path()),
        ("scaler", config.artifacts.scaler_path()),
    ];
    let missing: Vec<String> = artifacts
        .iter()
        .filter(|(_, path)| !path.exists())
        .map(|(name, path)| format!("{} ({})", name, path.display()))
        .collect();

    if !missing.is_empty() {
        return Err(ReachError::artifact(format!(
            "Missing artifacts: {}",
            missing.join(", ")
        )));
    }

    println!("{} Configuration is valid", "✅".green());
    Ok(())
}

fn generate_config(output: Option<PathBuf>) -> Result<()> {
    let content = ReachConfig::default().to_toml_string()?;
    match output {
        Some(path) => {
            std::fs::write(&path, content)?;
            println!("{} Wrote {}", "✅".green(), path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
