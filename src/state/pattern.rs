//! Breathing pattern definition and validation

use serde::{Deserialize, Serialize};

use crate::error::InvalidPattern;

/// Durations and repetitions for one breathing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub inhale_seconds: u32,
    /// Zero skips the hold phase entirely
    #[serde(default)]
    pub hold_seconds: u32,
    pub exhale_seconds: u32,
    pub cycles: u32,
}

impl BreathingPattern {
    /// Build a pattern, rejecting durations the timer cannot run
    pub fn new(
        inhale_seconds: u32,
        hold_seconds: u32,
        exhale_seconds: u32,
        cycles: u32,
    ) -> Result<Self, InvalidPattern> {
        let pattern = Self {
            inhale_seconds,
            hold_seconds,
            exhale_seconds,
            cycles,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    /// Check the pattern invariants
    pub fn validate(&self) -> Result<(), InvalidPattern> {
        if self.inhale_seconds == 0 {
            return Err(InvalidPattern::ZeroInhale);
        }
        if self.exhale_seconds == 0 {
            return Err(InvalidPattern::ZeroExhale);
        }
        if self.cycles == 0 {
            return Err(InvalidPattern::ZeroCycles);
        }
        Ok(())
    }

    /// Whether the hold phase runs at all
    pub fn has_hold(&self) -> bool {
        self.hold_seconds > 0
    }

    /// Length of one inhale/hold/exhale cycle in seconds
    pub fn cycle_seconds(&self) -> u64 {
        u64::from(self.inhale_seconds) + u64::from(self.hold_seconds) + u64::from(self.exhale_seconds)
    }

    /// Counted-down seconds for the whole session, excluding pauses and gaps
    pub fn session_seconds(&self) -> u64 {
        self.cycle_seconds().saturating_mul(u64::from(self.cycles))
    }
}
