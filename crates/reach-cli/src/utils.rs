//! CLI utility functions

use std::io;

use colored::*;
use reach_types::{LoggingConfig, ReachError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Setup logging from configuration, adjusted by verbosity flags.
///
/// `RUST_LOG` wins over the configured level unless `--verbose` is given.
pub fn setup_logging(config: &LoggingConfig, verbose: bool, quiet: bool) -> Result<()> {
    let level = if quiet {
        "error".to_string()
    } else if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    };

    let filter = if verbose {
        EnvFilter::new(&level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()
    };

    result.map_err(|e| ReachError::internal(format!("Failed to install subscriber: {}", e)))
}

/// Print the startup banner
pub fn print_banner() {
    println!(
        "{} {}",
        "Reach".bright_blue().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", "Social media engagement prediction".dimmed());
    println!();
}
