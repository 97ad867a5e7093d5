//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    state::AppState,
    utils::{format_hms, label},
};
use super::responses::{ApiResponse, DurationRequest, HealthResponse, SoundRequest, StatusResponse};

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(timer) => {
            info!("Start endpoint called");
            Ok(Json(ApiResponse::for_timer("Timer running".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Stop the countdown and silence the alarm
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok(timer) => {
            info!("Stop endpoint called");
            Ok(Json(ApiResponse::for_timer("Timer stopped".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to stop timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /duration - Change the interval length
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let applied = match (&request.duration, request.seconds) {
        (Some(text), _) => state.set_duration_text(text),
        (None, Some(seconds)) => state.set_duration(seconds),
        (None, None) => return Err(StatusCode::BAD_REQUEST),
    };

    let applied = applied.map_err(|e| {
        error!("Failed to set duration: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let timer = state.snapshot().map_err(|e| {
        error!("Failed to read timer state: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let duration = format_hms(timer.duration_seconds as i64);
    if applied {
        Ok(Json(ApiResponse::updated(format!("Duration set to {}", duration), timer)))
    } else {
        Ok(Json(ApiResponse::unchanged(
            format!("Invalid duration, keeping {}", duration),
            timer,
        )))
    }
}

/// Handle PUT /sound - Set or clear the alarm sound file
pub async fn sound_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SoundRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let path = request.path.filter(|p| !p.as_os_str().is_empty());
    let message = match &path {
        Some(p) => format!("Alarm sound set to {}", p.display()),
        None => "Alarm sound cleared, using system alert".to_string(),
    };

    if let Err(e) = state.set_sound_path(path) {
        error!("Failed to set sound path: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    match state.snapshot() {
        Ok(timer) => Ok(Json(ApiResponse::updated(message, timer))),
        Err(e) => {
            error!("Failed to read timer state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let config = match state.config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get timer config: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        label: label(timer.display_seconds),
        duration: format_hms(timer.duration_seconds as i64),
        sound_path: config.sound_path,
        sound_player: state.sound.player_name().to_string(),
        playback_active: state.playback_active(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
