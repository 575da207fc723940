//! Shared application state handed to HTTP handlers

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{BreathingPattern, BreathingTimer, SessionState, TimerTiming};
use crate::{error::InvalidPattern, services::PracticeStats};

/// Application state: the breathing timer, practice stats and server metadata
#[derive(Debug)]
pub struct AppState {
    pub timer: BreathingTimer,
    pub stats: Arc<PracticeStats>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create a new AppState with an idle timer and empty stats
    pub fn new(port: u16, host: String, timing: TimerTiming) -> Self {
        let stats = Arc::new(PracticeStats::new());
        let timer = BreathingTimer::with_timing(stats.clone(), timing);

        Self {
            timer,
            stats,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start a session and return its first snapshot
    pub fn start_session(&self, pattern: BreathingPattern) -> Result<SessionState, InvalidPattern> {
        self.timer.start(pattern)?;
        self.record_action("start");
        Ok(self.timer.snapshot())
    }

    pub fn pause_session(&self) -> SessionState {
        self.timer.pause();
        self.record_action("pause");
        self.timer.snapshot()
    }

    pub fn resume_session(&self) -> SessionState {
        self.timer.resume();
        self.record_action("resume");
        self.timer.snapshot()
    }

    pub fn stop_session(&self) -> SessionState {
        self.timer.stop();
        self.record_action("stop");
        self.timer.snapshot()
    }

    /// Stop any running session before the server exits
    pub fn shutdown(&self) {
        if self.timer.snapshot().is_running {
            info!("Stopping active breathing session for shutdown");
            self.timer.stop();
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
