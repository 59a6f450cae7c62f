use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use room_recorder::{AppState, Config, HttpEgressClient};
use tracing::info;

#[derive(Parser)]
#[command(name = "room-recorder", about = "Recording control surface for LiveKit rooms")]
struct Args {
    /// Configuration file (without extension)
    #[arg(long, default_value = "config/room-recorder")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Arc::new(Config::load(&args.config)?);

    info!("{} starting", cfg.service.name);
    info!("room service: {}", cfg.livekit.url);

    let client = Arc::new(HttpEgressClient::new(
        reqwest::Client::new(),
        cfg.livekit.clone(),
    ));
    let state = AppState::new(Arc::clone(&cfg), client);
    let router = room_recorder::create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
