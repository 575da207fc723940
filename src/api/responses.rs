//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::StatsSnapshot,
    state::{BreathingPattern, SessionState},
};

/// Body of POST /session/start: a custom pattern or a preset id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub pattern: Option<BreathingPattern>,
}

/// API response structure for session control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionState,
}

impl SessionResponse {
    /// Create a response labelled with the session's current status
    pub fn new(message: impl Into<String>, session: SessionState) -> Self {
        Self {
            status: session.status_label().to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            session,
        }
    }
}

/// Status response with session, stats and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session: SessionState,
    pub stats: StatsSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
