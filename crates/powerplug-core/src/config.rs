use serde::{Deserialize, Serialize};

/// Selected game difficulty. Fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Per-difficulty gameplay numbers.
///
/// This is the one canonical table: physics, the level generator, and the
/// session all read the same profile, so jump reachability math and level
/// geometry can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    /// Starting lives.
    pub lives: u32,
    /// Downward acceleration per tick.
    pub gravity: f32,
    /// Jump impulse. Negative because y grows downward.
    pub jump_power: f32,
    /// Horizontal target speed while a direction is held.
    pub base_speed: f32,
    /// Patrol speed for moving obstacles. Zero disables patrols.
    pub obstacle_speed: f32,
    /// Ground obstacles per platform, on average.
    pub obstacle_density: f32,
    /// Power-ups the generator tries to place per level.
    pub power_up_count: u32,
    /// Platforms beyond the ground on level 1.
    pub platform_count: u32,
}

impl DifficultyProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                lives: 5,
                gravity: 0.4,
                jump_power: -11.0,
                base_speed: 4.0,
                obstacle_speed: 0.0,
                obstacle_density: 0.35,
                power_up_count: 3,
                platform_count: 5,
            },
            Difficulty::Medium => Self {
                difficulty,
                lives: 3,
                gravity: 0.5,
                jump_power: -12.0,
                base_speed: 5.0,
                obstacle_speed: 0.5,
                obstacle_density: 0.55,
                power_up_count: 2,
                platform_count: 6,
            },
            Difficulty::Hard => Self {
                difficulty,
                lives: 1,
                gravity: 0.6,
                jump_power: -13.0,
                base_speed: 6.0,
                obstacle_speed: 1.0,
                obstacle_density: 0.8,
                power_up_count: 1,
                platform_count: 7,
            },
        }
    }

    /// Horizontal distance one full jump arc covers at `base_speed`.
    ///
    /// The arc is airborne for `2 * |jump_power| / gravity` ticks, so harder
    /// profiles actually jump further; their generator margins are what make
    /// them harder.
    pub fn max_jump_distance(&self) -> f32 {
        self.base_speed * 2.0 * self.jump_power.abs() / self.gravity
    }

    /// Peak height of one jump arc above the launch point.
    pub fn max_jump_height(&self) -> f32 {
        self.jump_power * self.jump_power / (2.0 * self.gravity)
    }

    /// Fraction of [`Self::max_jump_distance`] the generator may spend on the
    /// horizontal step between consecutive platforms.
    pub fn horizontal_margin(&self) -> f32 {
        match self.difficulty {
            Difficulty::Easy => 0.70,
            Difficulty::Medium => 0.80,
            Difficulty::Hard => 0.90,
        }
    }

    /// Fraction of [`Self::max_jump_height`] the generator may spend on the
    /// vertical delta between consecutive platforms.
    pub fn vertical_margin(&self) -> f32 {
        match self.difficulty {
            Difficulty::Easy => 0.50,
            Difficulty::Medium => 0.60,
            Difficulty::Hard => 0.70,
        }
    }
}

/// Engine tuning independent of difficulty.
///
/// Every field has a default; a config file only needs to name what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Milliseconds of game time one tick represents.
    pub tick_ms: u64,
    /// Completing this level finishes the run.
    pub max_levels: u32,
    /// Lives never exceed this; overflow extra-life pickups pay score.
    pub lives_cap: u32,
    pub coin_score: u32,
    pub extra_life_overflow_score: u32,
    /// Level time under which the completion bonus is nonzero.
    pub time_budget_ms: u64,
    pub time_bonus_divisor: u32,
    /// Flat addition to horizontal target speed while boosted.
    pub speed_boost_amount: f32,
    pub speed_boost_ms: u64,
    pub invincibility_ms: u64,
    /// Post-hit invincibility window.
    pub hit_grace_ms: u64,
    /// Seed for procedural level generation.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 500.0,
            tick_ms: 16,
            max_levels: 10,
            lives_cap: 5,
            coin_score: 100,
            extra_life_overflow_score: 200,
            time_budget_ms: 30_000,
            time_bonus_divisor: 100,
            speed_boost_amount: 2.0,
            speed_boost_ms: 5_000,
            invincibility_ms: 5_000,
            hit_grace_ms: 1_500,
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Load from the TOML file named by `POWERPLUG_CONFIG`, falling back to
    /// `config/powerplug.toml`. A missing file is the normal case and uses
    /// defaults silently; a file that exists but does not parse is reported
    /// and ignored.
    pub fn load() -> Self {
        let path = std::env::var("POWERPLUG_CONFIG")
            .unwrap_or_else(|_| "config/powerplug.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<EngineConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    EngineConfig::default()
                }
            },
            Err(_) => EngineConfig::default(),
        }
    }

    /// Score awarded for finishing a level after `elapsed_ms` of play time:
    /// the unspent share of the time budget, floored. Zero once the budget
    /// is gone, never negative.
    pub fn time_bonus(&self, elapsed_ms: u64) -> u32 {
        (self.time_budget_ms.saturating_sub(elapsed_ms) / u64::from(self.time_bonus_divisor)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_scale_monotonically() {
        let easy = DifficultyProfile::for_difficulty(Difficulty::Easy);
        let medium = DifficultyProfile::for_difficulty(Difficulty::Medium);
        let hard = DifficultyProfile::for_difficulty(Difficulty::Hard);

        assert!(easy.lives > medium.lives && medium.lives > hard.lives);
        assert!(easy.gravity < medium.gravity && medium.gravity < hard.gravity);
        assert!(easy.base_speed < medium.base_speed && medium.base_speed < hard.base_speed);
        assert!(easy.obstacle_density < hard.obstacle_density);
        assert!(easy.power_up_count > hard.power_up_count);
        assert!(easy.platform_count < hard.platform_count);
    }

    #[test]
    fn easy_profile_matches_table() {
        let easy = DifficultyProfile::for_difficulty(Difficulty::Easy);
        assert_eq!(easy.lives, 5);
        assert_eq!(easy.gravity, 0.4);
        assert_eq!(easy.jump_power, -11.0);
        assert_eq!(easy.base_speed, 4.0);
        assert_eq!(easy.obstacle_speed, 0.0);
        assert_eq!(easy.platform_count, 5);
    }

    #[test]
    fn jump_envelope_widens_with_difficulty() {
        // Harder profiles jump further and higher in absolute terms; the
        // margins are what tighten.
        let easy = DifficultyProfile::for_difficulty(Difficulty::Easy);
        let hard = DifficultyProfile::for_difficulty(Difficulty::Hard);
        assert!(hard.max_jump_distance() > easy.max_jump_distance());
        assert!(easy.horizontal_margin() < hard.horizontal_margin());
        assert!(easy.vertical_margin() < hard.vertical_margin());
    }

    #[test]
    fn jump_envelope_formulas() {
        let easy = DifficultyProfile::for_difficulty(Difficulty::Easy);
        // base 4.0, 2 * 11 / 0.4 = 55 airborne ticks
        assert!((easy.max_jump_distance() - 220.0).abs() < 1e-3);
        // 11^2 / (2 * 0.4) = 151.25
        assert!((easy.max_jump_height() - 151.25).abs() < 1e-3);
    }

    #[test]
    fn config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.viewport_width, 800.0);
        assert_eq!(config.viewport_height, 500.0);
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.max_levels, 10);
        assert_eq!(config.lives_cap, 5);
        assert_eq!(config.time_budget_ms, 30_000);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: EngineConfig = toml::from_str("max_levels = 3\nseed = 7\n").unwrap();
        assert_eq!(config.max_levels, 3);
        assert_eq!(config.seed, 7);
        assert_eq!(config.tick_ms, 16, "unnamed fields must default");
        assert_eq!(config.coin_score, 100);
    }

    #[test]
    fn time_bonus_floors_and_saturates() {
        let config = EngineConfig::default();
        assert_eq!(config.time_bonus(0), 300);
        assert_eq!(config.time_bonus(16), 299, "16ms leaves 29984, floored to 299");
        assert_eq!(config.time_bonus(29_999), 0);
        assert_eq!(config.time_bonus(30_000), 0);
        assert_eq!(config.time_bonus(u64::MAX), 0, "overlong levels must not underflow");
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"medium\"");
        let back: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(back, Difficulty::Hard);
    }
}
