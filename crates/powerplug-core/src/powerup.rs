use serde::{Deserialize, Serialize};

/// Power-up kinds a level can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Adds a flat bonus to the player's horizontal target speed.
    SpeedBoost,
    /// Grants a life, or bonus score when lives are already capped.
    ExtraLife,
    /// Obstacle overlaps stop costing lives while active.
    Invincibility,
}

impl PowerUpKind {
    /// Timed kinds occupy the session's single effect slot; `ExtraLife`
    /// applies instantly and never does.
    pub fn is_timed(&self) -> bool {
        !matches!(self, PowerUpKind::ExtraLife)
    }
}

/// The one timed power-up effect a session tracks at a time.
///
/// Expiry is an absolute timestamp on the session clock. The clock only
/// advances during Playing ticks, so pausing freezes the remaining window
/// without any bookkeeping here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub expires_at_ms: u64,
}

impl ActiveEffect {
    pub fn new(kind: PowerUpKind, now_ms: u64, duration_ms: u64) -> Self {
        Self {
            kind,
            expires_at_ms: now_ms + duration_ms,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}
