//! Background tasks module
//!
//! This module contains the tasks spawned alongside the HTTP server.

pub mod breathing_session;

// Re-export main functions
pub use breathing_session::{breathing_session_task, SessionContext};
