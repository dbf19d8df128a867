use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use weather_core::{Config, render_png, surface::RasterSurface};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-card", version, about = "Weather card image server")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve `GET /?location=<query>` on port 3000.
    Serve,

    /// Render a single card to a PNG file.
    Render {
        /// Location query, e.g. "Paris" or "48.85,2.35".
        location: String,

        #[arg(long, short, default_value = "card.png")]
        output: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_tracing(&self.log_level);

        let config = Config::load(self.config.as_deref())?;
        let font = RasterSurface::resolve_font(config.font_path.as_deref())?;
        let state = Arc::new(AppState::from_config(&config, font)?);

        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => {
                let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, server::PORT));
                let listener = TcpListener::bind(addr)
                    .await
                    .with_context(|| format!("Failed to bind {addr}"))?;

                tracing::info!(%addr, "Server is running on port {}", server::PORT);
                server::serve(listener, state).await?;
            }
            Command::Render { location, output } => {
                let weather = state.provider.fetch_weather(&location).await?;
                let png =
                    render_png(&weather, state.icons.as_ref(), &state.style, state.font.clone())
                        .await?;

                std::fs::write(&output, png)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                tracing::info!(output = %output.display(), %location, "Card written");
            }
        }

        Ok(())
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
