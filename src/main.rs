use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use voicebridge::{create_router, AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "voicebridge", about = "Voice conversation gateway")]
struct Args {
    /// Configuration file (without extension, resolved by the config crate)
    #[arg(long, default_value = "config/voicebridge")]
    config: String,

    /// Override the HTTP port from the configuration file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Speech service endpoint: {}", cfg.speech.endpoint);
    info!(
        "Audio: {}Hz, {} channel(s), {}ms chunks",
        cfg.audio.sample_rate, cfg.audio.channels, cfg.audio.chunk_interval_ms
    );

    let state = AppState::new(cfg.speech, cfg.audio);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
