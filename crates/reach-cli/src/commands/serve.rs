//! Serve command - start the HTTP prediction server

use clap::Args;
use colored::*;
use reach_server::AxumServer;
use reach_types::{ReachConfig, Result};

/// Start the prediction server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Server host to bind (overrides configuration)
    #[arg(long)]
    pub host: Option<String>,

    /// Server port to bind (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip loading artifacts before accepting requests
    #[arg(long)]
    pub no_preload: bool,
}

pub async fn execute(cmd: ServeCommand, mut config: ReachConfig) -> Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if cmd.no_preload {
        config.server.preload = false;
    }
    config.validate()?;

    println!("{} Starting Reach prediction server...", "🚀".bright_blue());
    println!("Host: {}", config.server.host.cyan());
    println!("Port: {}", config.server.port.to_string().cyan());
    println!("Model: {}", config.artifacts.model_path().display().to_string().cyan());

    AxumServer::from_config(&config).start().await
}
