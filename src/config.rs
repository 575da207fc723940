//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::state::TimerTiming;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "breath-pacer")]
#[command(about = "A guided breathing-exercise timer served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Pause between breathing cycles in seconds
    #[arg(long, default_value = "1")]
    pub cycle_gap: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Countdown timing; the tick stays at one second
    pub fn timing(&self) -> TimerTiming {
        TimerTiming {
            cycle_gap: Duration::from_secs(self.cycle_gap),
            ..TimerTiming::default()
        }
    }
}
