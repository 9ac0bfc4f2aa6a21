use serde::{Deserialize, Serialize};

use crate::powerup::PowerUpKind;

/// Gameplay facts the engine emits, batched per tick in occurrence order.
///
/// Achievement, audio, and UI collaborators consume these however they like;
/// the engine never queries back. Payloads carry enough context that
/// subscribers do not need to re-read session state to interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A jump impulse fired this tick.
    Jumped,
    /// A coin was picked up. `total_collected` counts the whole run, not the
    /// current level.
    CoinCollected { total_collected: u32 },
    /// A power-up was picked up and its effect applied.
    PowerUpCollected { kind: PowerUpKind },
    /// The player was hit by an obstacle or fell off-screen.
    ObstacleHit { lives_remaining: u32 },
    /// The outlet was reached. `time_bonus` is already folded into the score.
    LevelCompleted {
        level: u32,
        elapsed_ms: u64,
        lives_lost: u32,
        time_bonus: u32,
    },
    /// The last configured level was completed. Always follows the final
    /// `LevelCompleted` in the same batch.
    GameCompleted { final_score: u32 },
}
