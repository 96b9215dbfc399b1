//! Prata server entry point.

use anyhow::Result;
use clap::Parser;
use prata::config::Settings;
use prata::web::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Prata - Chat with a YouTube video's transcript
///
/// Starts the web server. Paste a video URL in the browser and ask questions
/// about its content. The name "Prata" comes from the Scandinavian word for
/// "chat."
#[derive(Parser, Debug)]
#[command(name = "prata")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host to bind to (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides configuration and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("prata={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(settings);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
