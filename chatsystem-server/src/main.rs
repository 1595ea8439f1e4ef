//! ChatSystem HTTP server binary

use anyhow::{Context, Result};
use chatsystem_core::config::Config;
use chatsystem_core::http_api::start_server;
use chatsystem_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use chatsystem_core::metrics;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "chatsystem-server")]
#[command(author, version, about = "ChatSystem HTTP API server", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<LogLevel>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::from_env()?,
        };

        if self.host.is_some() || self.port.is_some() {
            let host = match &self.host {
                Some(host) => host.parse().with_context(|| format!("invalid host '{}'", host))?,
                None => config.server.bind_address.ip(),
            };
            let port = self.port.unwrap_or(config.server.bind_address.port());
            config.server.bind_address = SocketAddr::new(host, port);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level.as_str().to_string();
        }
        if self.json_logs {
            config.logging.json_format = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.load_config()?;

    init_logging_with_config(LogConfig::try_from(&config.logging)?)?;
    if config.metrics.enabled {
        metrics::init_metrics();
    }

    info!(
        bind_address = %config.server.bind_address,
        shutdown_timeout = ?config.server.shutdown_timeout,
        "ChatSystem server starting"
    );

    start_server(&config).await?;

    info!("ChatSystem server stopped");
    Ok(())
}
