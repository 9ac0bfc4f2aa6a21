//! Boundary types shared between the powerplug engine and its collaborators.
//!
//! Everything a renderer, input layer, persistence store, or achievement
//! tracker exchanges with the engine lives here: input snapshots, the event
//! vocabulary, difficulty and engine configuration, power-up effects, and
//! the save format. The engine crate depends on this one; collaborators
//! never need the engine's internals.

pub mod config;
pub mod events;
pub mod input;
pub mod powerup;
pub mod snapshot;

/// Test fixtures shared across the workspace.
///
/// Enable with the `test-helpers` feature from dev-dependencies.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::config::{Difficulty, DifficultyProfile, EngineConfig};
    use crate::input::InputState;
    use crate::snapshot::SaveState;

    /// Nothing held this tick.
    pub fn idle() -> InputState {
        InputState::NONE
    }

    /// Walk right.
    pub fn hold_right() -> InputState {
        InputState::new(false, true, false)
    }

    /// Walk left.
    pub fn hold_left() -> InputState {
        InputState::new(true, false, false)
    }

    /// Jump without moving.
    pub fn hold_jump() -> InputState {
        InputState::new(false, false, true)
    }

    /// Auto-hop rightward, the standard traversal input.
    pub fn hold_right_jump() -> InputState {
        InputState::new(false, true, true)
    }

    /// Easy profile stripped of every hazard, for traversal sims that must
    /// not lose a life mid-walk.
    pub fn calm_profile() -> DifficultyProfile {
        DifficultyProfile {
            obstacle_density: 0.0,
            obstacle_speed: 0.0,
            ..DifficultyProfile::for_difficulty(Difficulty::Easy)
        }
    }

    /// Default config with a small level cap, so run-completion paths are
    /// cheap to drive.
    pub fn short_run_config(max_levels: u32) -> EngineConfig {
        EngineConfig {
            max_levels,
            ..EngineConfig::default()
        }
    }

    /// A structurally valid mid-run save.
    pub fn sample_save() -> SaveState {
        SaveState {
            level: 2,
            score: 700,
            lives: 3,
            difficulty: Difficulty::Medium,
            player_x: 50.0,
            player_y: 400.0,
        }
    }
}
