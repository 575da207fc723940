//! Error types for breathing patterns

use thiserror::Error;

/// Reasons a breathing pattern cannot be run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidPattern {
    #[error("inhale duration must be at least one second")]
    ZeroInhale,

    #[error("exhale duration must be at least one second")]
    ZeroExhale,

    #[error("a session needs at least one cycle")]
    ZeroCycles,
}
