//! State management module
//!
//! This module contains the breathing pattern, session snapshot and timer
//! engine, plus the shared application state handed to HTTP handlers.

pub mod app_state;
pub mod engine;
pub mod pattern;
pub mod presets;
pub mod session_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::{BreathingTimer, SessionPublisher, TimerTiming};
pub use pattern::BreathingPattern;
pub use presets::PresetPattern;
pub use session_state::{Phase, SessionState};
