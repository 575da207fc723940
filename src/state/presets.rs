//! Built-in catalog of named breathing patterns

use serde::Serialize;

use super::BreathingPattern;

/// A named pattern offered to clients
#[derive(Debug, Clone, Serialize)]
pub struct PresetPattern {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub pattern: BreathingPattern,
}

impl PresetPattern {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        pattern: BreathingPattern,
    ) -> Self {
        Self { id, name, description, pattern }
    }

    pub fn classic_box() -> Self {
        Self::new(
            "classic-box",
            "Classic Box",
            "Equal inhale, hold and exhale to steady focus",
            BreathingPattern { inhale_seconds: 4, hold_seconds: 4, exhale_seconds: 4, cycles: 5 },
        )
    }

    pub fn relax_478() -> Self {
        Self::new(
            "relax-478",
            "4-7-8 Relaxation",
            "Long hold and slow exhale for winding down",
            BreathingPattern { inhale_seconds: 4, hold_seconds: 7, exhale_seconds: 8, cycles: 4 },
        )
    }

    pub fn natural_rhythm() -> Self {
        Self::new(
            "natural-rhythm",
            "Natural Rhythm",
            "Gentle breathing with a slightly longer exhale",
            BreathingPattern { inhale_seconds: 4, hold_seconds: 0, exhale_seconds: 6, cycles: 6 },
        )
    }

    pub fn coherent() -> Self {
        Self::new(
            "coherent",
            "Coherent Breathing",
            "Balanced five-second breaths",
            BreathingPattern { inhale_seconds: 5, hold_seconds: 0, exhale_seconds: 5, cycles: 6 },
        )
    }

    pub fn deep_calm() -> Self {
        Self::new(
            "deep-calm",
            "Deep Calm",
            "Short pause and a double-length exhale",
            BreathingPattern { inhale_seconds: 4, hold_seconds: 2, exhale_seconds: 8, cycles: 5 },
        )
    }

    /// Look up a preset by its id
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "classic-box" => Some(Self::classic_box()),
            "relax-478" => Some(Self::relax_478()),
            "natural-rhythm" => Some(Self::natural_rhythm()),
            "coherent" => Some(Self::coherent()),
            "deep-calm" => Some(Self::deep_calm()),
            _ => None,
        }
    }
}

/// All presets in display order
pub fn catalog() -> Vec<PresetPattern> {
    vec![
        PresetPattern::classic_box(),
        PresetPattern::relax_478(),
        PresetPattern::natural_rhythm(),
        PresetPattern::coherent(),
        PresetPattern::deep_calm(),
    ]
}
