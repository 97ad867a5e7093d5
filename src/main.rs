//! Interval Chime - a repeating countdown timer with an audible alarm
//!
//! This is the main entry point for the interval-chime service.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use interval_chime::{
    api::create_router,
    config::Config,
    services::{default_player, log_available_players},
    settings::JsonFileStore,
    state::AppState,
    tasks::label_task,
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("interval_chime={},tower_http=info", config.log_level()))
        .init();

    info!("Starting interval-chime v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, settings={:?}",
          config.host, config.port, config.settings);

    // Report which players can make sound; missing players only mean silence
    let player = default_player();
    log_available_players(player.as_ref());

    // Create application state from the persisted settings
    let settings = Arc::new(JsonFileStore::new(config.settings.clone()));
    let state = Arc::new(AppState::new(
        settings,
        player,
        config.port,
        config.host.clone(),
    ));

    if let Some(duration) = &config.duration {
        if !state.set_duration_text(duration).map_err(anyhow::Error::msg)? {
            warn!("Ignoring invalid --duration {:?}", duration);
        }
    }
    if let Some(sound) = &config.sound {
        state.set_sound_path(Some(sound.clone())).map_err(anyhow::Error::msg)?;
    }

    // Follow timer updates for the countdown label
    tokio::spawn(label_task(state.subscribe()));

    if config.start {
        state.start().map_err(anyhow::Error::msg)?;
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start    - Start the countdown");
    info!("  POST /stop     - Stop the countdown and silence the alarm");
    info!("  PUT  /duration - Set the interval ({{\"duration\": \"HH:MM:SS\"}})");
    info!("  PUT  /sound    - Set the alarm sound ({{\"path\": \"...\"}})");
    info!("  GET  /status   - Current countdown and alarm state");
    info!("  GET  /health   - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Nothing may keep ringing once we exit
    state.shutdown();

    info!("Shutdown complete");
    Ok(())
}
