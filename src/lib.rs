//! Breath Pacer - A guided breathing-exercise timer served over HTTP
//!
//! This library provides the breathing timer engine, which runs a pattern of
//! inhale, hold and exhale phases with pause, resume and stop, along with the
//! practice statistics it reports to and the HTTP surface around it.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::InvalidPattern;
pub use state::{AppState, BreathingPattern, BreathingTimer, Phase, SessionState, TimerTiming};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
