//! Session snapshot published by the breathing timer

use serde::{Deserialize, Serialize};

use super::BreathingPattern;

/// Breathing phase of the current snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    /// Marks a session that ran to completion; never timed
    Rest,
}

/// Snapshot of the active (or last) breathing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub completed_cycles: u32,
    pub total_cycles: u32,
    pub is_running: bool,
    pub is_paused: bool,
    /// Generation of the session that wrote this snapshot, 0 when idle
    pub session_id: u64,
}

impl SessionState {
    /// Fresh state with no session
    pub fn idle() -> Self {
        Self {
            phase: Phase::Inhale,
            remaining_seconds: 0,
            completed_cycles: 0,
            total_cycles: 0,
            is_running: false,
            is_paused: false,
            session_id: 0,
        }
    }

    /// First snapshot of a new session
    pub fn started(session_id: u64, pattern: &BreathingPattern) -> Self {
        Self {
            phase: Phase::Inhale,
            remaining_seconds: pattern.inhale_seconds,
            completed_cycles: 0,
            total_cycles: pattern.cycles,
            is_running: true,
            is_paused: false,
            session_id,
        }
    }

    /// Terminal snapshot of a session that ran every cycle
    pub fn finished(session_id: u64, cycles: u32) -> Self {
        Self {
            phase: Phase::Rest,
            remaining_seconds: 0,
            completed_cycles: cycles,
            total_cycles: cycles,
            is_running: false,
            is_paused: false,
            session_id,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }

    pub fn is_finished(&self) -> bool {
        !self.is_running && self.phase == Phase::Rest
    }

    /// Whether this snapshot belongs to the given running session
    pub fn is_current(&self, session_id: u64) -> bool {
        self.is_running && self.session_id == session_id
    }

    /// Short status label for API responses
    pub fn status_label(&self) -> &'static str {
        if self.is_running && self.is_paused {
            "paused"
        } else if self.is_running {
            "running"
        } else if self.is_finished() {
            "finished"
        } else {
            "idle"
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::idle()
    }
}
