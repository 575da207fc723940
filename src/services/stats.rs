//! Practice statistics recorded when a session completes

use std::sync::Mutex;
use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Completion event reported by the breathing timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: u64,
    /// Seconds actually counted down, excluding pauses and gaps
    pub duration_seconds: u64,
    pub cycles_completed: u32,
    pub finished_at: DateTime<Utc>,
}

/// Receiver of completed sessions.
///
/// Errors are logged by the caller and never undo the completion.
pub trait SessionRecorder: Send + Sync {
    fn record_session(&self, summary: &SessionSummary) -> anyhow::Result<()>;
}

/// Aggregate practice figures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_sessions: u64,
    pub total_seconds: u64,
    pub total_cycles: u64,
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    pub last_session_date: Option<NaiveDate>,
    pub last_session_at: Option<DateTime<Utc>>,
}

impl StatsSnapshot {
    fn apply(&mut self, summary: &SessionSummary) {
        let day = summary.finished_at.date_naive();

        self.current_streak_days = match self.last_session_date {
            Some(last) if last == day => self.current_streak_days.max(1),
            Some(last) if last.succ_opt() == Some(day) => self.current_streak_days + 1,
            // Out-of-order timestamps keep the streak as is
            Some(last) if last > day => self.current_streak_days,
            _ => 1,
        };
        self.longest_streak_days = self.longest_streak_days.max(self.current_streak_days);

        self.total_sessions += 1;
        self.total_seconds += summary.duration_seconds;
        self.total_cycles += u64::from(summary.cycles_completed);
        if self.last_session_date.map_or(true, |last| day >= last) {
            self.last_session_date = Some(day);
            self.last_session_at = Some(summary.finished_at);
        }
    }
}

/// In-memory practice statistics
#[derive(Debug, Default)]
pub struct PracticeStats {
    inner: Mutex<StatsSnapshot>,
}

impl PracticeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current statistics
    pub fn snapshot(&self) -> StatsSnapshot {
        match self.inner.lock() {
            Ok(stats) => stats.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SessionRecorder for PracticeStats {
    fn record_session(&self, summary: &SessionSummary) -> anyhow::Result<()> {
        let mut stats = self
            .inner
            .lock()
            .map_err(|e| anyhow!("Failed to lock practice stats: {}", e))?;

        stats.apply(summary);
        info!(
            "Recorded session {}: {}s, {} cycles, streak {} days",
            summary.session_id,
            summary.duration_seconds,
            summary.cycles_completed,
            stats.current_streak_days
        );
        Ok(())
    }
}
