use serde::{Deserialize, Serialize};

use crate::config::Difficulty;

/// Loose persistence snapshot of a run.
///
/// The persistence collaborator decides where this lives; JSON is the
/// interchange shape. Restoring validates structure only. Plausibility
/// checks (score auditing, stale saves) are deliberately not the engine's
/// business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    /// Level the run resumes on, 1-based.
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub difficulty: Difficulty,
    pub player_x: f32,
    pub player_y: f32,
}

impl SaveState {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Structural validity: a finite pose and counters a run could actually
    /// resume from.
    pub fn is_valid(&self) -> bool {
        self.player_x.is_finite() && self.player_y.is_finite() && self.level >= 1 && self.lives >= 1
    }
}
