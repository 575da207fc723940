//! Collaborator services module
//!
//! This module contains the statistics store notified when a breathing
//! session completes.

pub mod stats;

// Re-export main types
pub use stats::{PracticeStats, SessionRecorder, SessionSummary, StatsSnapshot};
