//! Reach CLI - engagement prediction from the command line

use std::process;

use clap::{Parser, Subcommand};
use colored::*;
use reach_cli::{
    commands::*,
    output::OutputFormat,
    utils::{print_banner, setup_logging},
};
use reach_types::ReachConfig;

#[derive(Parser)]
#[command(name = "reach")]
#[command(about = "Reach engagement prediction CLI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "reach.toml")]
    config: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the prediction server
    Serve(ServeCommand),

    /// Predict engagement for one post
    Predict(PredictCommand),

    /// Show the encoded features for one post
    Inspect(InspectCommand),

    /// Show, validate or generate configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let config = match ReachConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Failed to load config: {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    setup_logging(&config.logging, cli.verbose, cli.quiet).unwrap_or_else(|e| {
        eprintln!("{} Failed to setup logging: {}", "Error:".red().bold(), e);
        process::exit(1);
    });

    if !cli.quiet && matches!(cli.command, Commands::Serve(_)) {
        print_banner();
    }

    let result = match cli.command {
        Commands::Serve(cmd) => serve::execute(cmd, config).await,
        Commands::Predict(cmd) => predict::execute(cmd, config, cli.format).await,
        Commands::Inspect(cmd) => inspect::execute(cmd, config, cli.format).await,
        Commands::Config(cmd) => config_cmd::execute(cmd, config, cli.format).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
