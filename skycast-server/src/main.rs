//! Binary crate for the `skycast` weather tool server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and selecting a transport
//! - Marshaling each transport's native input into the shared argument map
//! - Serializing the shared result envelope back out

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use skycast_core::{ServerConfig, WeatherService};

mod cli;
mod http;
mod rpc;
mod stdio;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    // Logs go to stderr: stdout belongs to the stdio transport.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "skycast=info,skycast_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ServerConfig::load().context("Failed to load configuration")?;
    let service = Arc::new(WeatherService::from_config(&config)?);

    match cmd.command {
        cli::Command::Stdio => stdio::serve(service).await,
        cli::Command::Http { host, port } => {
            let host = host.unwrap_or_else(|| config.http_host.clone());
            let port = port.unwrap_or(config.http_port);
            http::serve(service, &host, port).await
        }
    }
}
