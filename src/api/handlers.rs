//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::{stream, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{
    services::StatsSnapshot,
    state::{presets, AppState, PresetPattern, SessionState},
};
use super::{
    error::ApiError,
    responses::{HealthResponse, SessionResponse, StartRequest, StatusResponse},
};

/// Handle GET /patterns - List the preset catalog
pub async fn patterns_handler() -> Json<Vec<PresetPattern>> {
    Json(presets::catalog())
}

/// Handle POST /session/start - Start a session from a custom pattern or preset
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = body?;
    let (label, pattern) = match (request.pattern, request.preset) {
        (Some(pattern), _) => ("custom".to_string(), pattern),
        (None, Some(id)) => {
            let preset = PresetPattern::from_id(&id).ok_or(ApiError::UnknownPreset(id))?;
            (preset.name.to_string(), preset.pattern)
        }
        (None, None) => return Err(ApiError::MissingPattern),
    };

    let session = state.start_session(pattern)?;
    info!("Start endpoint called - {} session {} started", label, session.session_id);

    Ok(Json(SessionResponse::new(format!("Started {} session", label), session)))
}

/// Handle POST /session/pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let session = state.pause_session();
    info!("Pause endpoint called - session is {}", session.status_label());
    Json(SessionResponse::new("Pause requested", session))
}

/// Handle POST /session/resume - Continue a paused countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let session = state.resume_session();
    info!("Resume endpoint called - session is {}", session.status_label());
    Json(SessionResponse::new("Resume requested", session))
}

/// Handle POST /session/stop - Cancel the session and reset to idle
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let session = state.stop_session();
    info!("Stop endpoint called - session reset");
    Json(SessionResponse::new("Session stopped", session))
}

/// Handle GET /session - Return the current snapshot
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionState> {
    Json(state.timer.snapshot())
}

/// Handle GET /session/events - Stream snapshots as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (current, rx) = state.timer.subscribe_with_snapshot();

    let snapshots = stream::unfold((rx, Some(current)), |(mut rx, pending)| async move {
        if let Some(snapshot) = pending {
            return Some((snapshot, (rx, None)));
        }
        loop {
            match rx.recv().await {
                Ok(snapshot) => return Some((snapshot, (rx, None))),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} snapshots", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let events = snapshots.map(|snapshot| {
        let event = Event::default().event("session");
        Ok(match event.json_data(&snapshot) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to encode session snapshot: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        })
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /stats - Return practice statistics
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}

/// Handle GET /status - Return current session and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        session: state.timer.snapshot(),
        stats: state.stats.snapshot(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
