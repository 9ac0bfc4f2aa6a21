use serde::{Deserialize, Serialize};

use powerplug_core::config::{Difficulty, DifficultyProfile, EngineConfig};
use powerplug_core::events::EngineEvent;
use powerplug_core::input::InputState;
use powerplug_core::powerup::{ActiveEffect, PowerUpKind};
use powerplug_core::snapshot::SaveState;

use crate::camera::Camera;
use crate::collision::resolve_collisions;
use crate::entity::{Level, Player};
use crate::level_gen::{LevelSource, ProceduralLevels};
use crate::physics::tick_player;

/// Run-loop state. Simulation only advances in `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    /// Frozen on the completion screen until acknowledged.
    LevelComplete,
    /// Terminal results screen; acknowledging returns to the menu.
    GameOver,
}

/// One run of the game: the player, the current level, the camera, and all
/// run counters, advanced by fixed ticks.
///
/// Collaborators drive it through a narrow surface: `tick` with the frame's
/// input, the transition calls (`start`, `pause`, `resume`, the two
/// acknowledgements), and read-only accessors. Every gameplay fact leaves
/// through the [`EngineEvent`] batch `tick` returns; the session never calls
/// out. Time is the session's own tick-accumulated clock, so a paused run
/// freezes every countdown with no extra bookkeeping.
pub struct GameSession {
    config: EngineConfig,
    source: Box<dyn LevelSource>,
    state: GameState,
    profile: DifficultyProfile,
    player: Player,
    level: Level,
    camera: Camera,
    score: u32,
    lives: u32,
    /// 1-based index of the level being played (or just completed).
    level_index: u32,
    /// Accumulated play time in ms. Advances only during Playing ticks.
    clock_ms: u64,
    level_started_ms: u64,
    /// Lives at level entry, for the completion report.
    level_start_lives: u32,
    coins_collected: u32,
    /// The single timed power-up effect slot.
    active_effect: Option<ActiveEffect>,
    /// Set when the last configured level is completed; the pending
    /// acknowledgement then ends the run instead of advancing it.
    run_finished: bool,
}

impl GameSession {
    pub fn new(config: EngineConfig, source: Box<dyn LevelSource>) -> Self {
        let profile = DifficultyProfile::for_difficulty(Difficulty::Easy);
        let level = source.generate(1, &profile);
        let player = Player::spawn(&profile);
        Self {
            config,
            source,
            state: GameState::Menu,
            profile,
            player,
            level,
            camera: Camera::default(),
            score: 0,
            lives: profile.lives,
            level_index: 1,
            clock_ms: 0,
            level_started_ms: 0,
            level_start_lives: profile.lives,
            coins_collected: 0,
            active_effect: None,
            run_finished: false,
        }
    }

    /// Session backed by the seeded procedural generator.
    pub fn procedural(config: EngineConfig) -> Self {
        let source = ProceduralLevels::new(config.seed, config.viewport_width);
        Self::new(config, Box::new(source))
    }

    /// Advance the simulation by one fixed tick and return the tick's
    /// events in occurrence order.
    ///
    /// Outside `Playing` this is a no-op returning an empty batch, so hosts
    /// can keep their frame loop ticking unconditionally.
    pub fn tick(&mut self, input: InputState) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.state != GameState::Playing {
            return events;
        }

        self.clock_ms += self.config.tick_ms;
        self.expire_effects();

        let origin = self.player.position;
        if tick_player(&mut self.player, input, self.profile.gravity, self.level.width) {
            events.push(EngineEvent::Jumped);
        }
        resolve_collisions(&mut self.player, origin, &self.level.platforms);

        for power_up in &mut self.level.power_ups {
            power_up.pulse();
        }

        self.check_obstacles(&mut events);
        self.check_coins(&mut events);
        self.check_power_ups(&mut events);
        self.check_outlet(&mut events);
        self.check_fall(&mut events);

        self.camera.follow(
            self.player.bounds().center_x(),
            self.config.viewport_width,
            self.level.width,
        );
        events
    }

    /// Clear the effect slot and the invincibility flag once their absolute
    /// deadlines pass. Runs before physics so an expiring boost no longer
    /// shapes this tick's easing.
    fn expire_effects(&mut self) {
        if let Some(effect) = self.active_effect
            && effect.is_expired(self.clock_ms)
        {
            self.active_effect = None;
            self.clear_effect(effect.kind);
        }
        if self.player.invincible && self.clock_ms >= self.player.invincible_until_ms {
            self.player.invincible = false;
        }
    }

    fn check_obstacles(&mut self, events: &mut Vec<EngineEvent>) {
        for obstacle in &mut self.level.obstacles {
            obstacle.advance();
        }
        if self.player.invincible {
            return;
        }
        let bounds = self.player.bounds();
        if self.level.obstacles.iter().any(|o| bounds.overlaps(&o.rect)) {
            self.apply_hit(events);
        }
    }

    fn check_coins(&mut self, events: &mut Vec<EngineEvent>) {
        if self.state != GameState::Playing {
            return;
        }
        let bounds = self.player.bounds();
        let Some(coin) = self
            .level
            .coins
            .iter_mut()
            .find(|c| !c.collected && bounds.overlaps(&c.rect))
        else {
            return;
        };
        coin.collected = true;
        self.score += self.config.coin_score;
        self.coins_collected += 1;
        events.push(EngineEvent::CoinCollected {
            total_collected: self.coins_collected,
        });
    }

    fn check_power_ups(&mut self, events: &mut Vec<EngineEvent>) {
        if self.state != GameState::Playing {
            return;
        }
        let bounds = self.player.bounds();
        let Some(power_up) = self
            .level
            .power_ups
            .iter_mut()
            .find(|p| !p.collected && bounds.overlaps(&p.rect))
        else {
            return;
        };
        power_up.collected = true;
        let kind = power_up.kind;
        self.apply_power_up(kind);
        events.push(EngineEvent::PowerUpCollected { kind });
    }

    fn check_outlet(&mut self, events: &mut Vec<EngineEvent>) {
        if self.state != GameState::Playing {
            return;
        }
        if !self.player.bounds().overlaps(&self.level.outlet.rect) {
            return;
        }
        let elapsed_ms = self.elapsed_ms();
        let time_bonus = self.config.time_bonus(elapsed_ms);
        self.score += time_bonus;
        self.state = GameState::LevelComplete;
        events.push(EngineEvent::LevelCompleted {
            level: self.level_index,
            elapsed_ms,
            lives_lost: self.level_start_lives.saturating_sub(self.lives),
            time_bonus,
        });
        tracing::debug!(level = self.level_index, elapsed_ms, time_bonus, "Level complete");
        if self.level_index >= self.config.max_levels {
            self.run_finished = true;
            events.push(EngineEvent::GameCompleted {
                final_score: self.score,
            });
        }
    }

    fn check_fall(&mut self, events: &mut Vec<EngineEvent>) {
        if self.state != GameState::Playing {
            return;
        }
        // Falls bypass invincibility: without the respawn the player would
        // keep falling below the level forever.
        if self.player.position.y > self.config.viewport_height {
            self.apply_hit(events);
        }
    }

    /// One life lost: respawn at the level start with a grace window. Ends
    /// the run when no lives remain.
    fn apply_hit(&mut self, events: &mut Vec<EngineEvent>) {
        self.lives = self.lives.saturating_sub(1);
        self.player.respawn();
        self.player.invincible = true;
        self.player.invincible_until_ms = self.clock_ms + self.config.hit_grace_ms;
        events.push(EngineEvent::ObstacleHit {
            lives_remaining: self.lives,
        });
        if self.lives == 0 {
            self.state = GameState::GameOver;
            tracing::debug!(score = self.score, level = self.level_index, "Run ended");
        }
    }

    fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::ExtraLife => {
                if self.lives < self.config.lives_cap {
                    self.lives += 1;
                } else {
                    self.score += self.config.extra_life_overflow_score;
                }
            }
            PowerUpKind::SpeedBoost => {
                self.replace_effect(kind, self.config.speed_boost_ms);
                self.player.speed_boost = self.config.speed_boost_amount;
            }
            PowerUpKind::Invincibility => {
                self.replace_effect(kind, self.config.invincibility_ms);
                self.player.invincible = true;
                self.player.invincible_until_ms = self.clock_ms + self.config.invincibility_ms;
            }
        }
    }

    /// Expire whatever currently holds the timed-effect slot, then install
    /// the new effect.
    fn replace_effect(&mut self, kind: PowerUpKind, duration_ms: u64) {
        if let Some(previous) = self.active_effect.take() {
            self.clear_effect(previous.kind);
        }
        self.active_effect = Some(ActiveEffect::new(kind, self.clock_ms, duration_ms));
    }

    fn clear_effect(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::SpeedBoost => self.player.speed_boost = 0.0,
            PowerUpKind::Invincibility => self.player.invincible = false,
            PowerUpKind::ExtraLife => {}
        }
    }

    /// Begin a fresh run from the menu. Ignored in any other state.
    pub fn start(&mut self, difficulty: Difficulty) {
        if self.state != GameState::Menu {
            tracing::debug!(state = ?self.state, "Ignored start outside the menu");
            return;
        }
        self.profile = DifficultyProfile::for_difficulty(difficulty);
        self.level_index = 1;
        self.level = self.source.generate(1, &self.profile);
        self.player = Player::spawn(&self.profile);
        self.camera = Camera::default();
        self.score = 0;
        self.lives = self.profile.lives;
        self.clock_ms = 0;
        self.level_started_ms = 0;
        self.level_start_lives = self.profile.lives;
        self.coins_collected = 0;
        self.active_effect = None;
        self.run_finished = false;
        self.state = GameState::Playing;
        tracing::debug!(?difficulty, "Run started");
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
        } else {
            tracing::debug!(state = ?self.state, "Ignored pause");
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
        } else {
            tracing::debug!(state = ?self.state, "Ignored resume");
        }
    }

    /// Leave the completion screen: on to the next level, or to the results
    /// screen when the completed level was the last configured one.
    pub fn acknowledge_level_complete(&mut self) {
        if self.state != GameState::LevelComplete {
            tracing::debug!(state = ?self.state, "Ignored level-complete acknowledgement");
            return;
        }
        if self.run_finished {
            self.state = GameState::GameOver;
            return;
        }
        self.level_index += 1;
        self.level = self.source.generate(self.level_index, &self.profile);
        self.player.respawn();
        self.level_started_ms = self.clock_ms;
        self.level_start_lives = self.lives;
        self.state = GameState::Playing;
        tracing::debug!(level = self.level_index, "Next level");
    }

    pub fn acknowledge_game_over(&mut self) {
        if self.state == GameState::GameOver {
            self.state = GameState::Menu;
        } else {
            tracing::debug!(state = ?self.state, "Ignored game-over acknowledgement");
        }
    }

    /// Snapshot the run for the persistence collaborator.
    pub fn save(&self) -> SaveState {
        SaveState {
            level: self.level_index,
            score: self.score,
            lives: self.lives,
            difficulty: self.profile.difficulty,
            player_x: self.player.position.x,
            player_y: self.player.position.y,
        }
    }

    /// Re-enter a saved run: re-apply the difficulty, regenerate the saved
    /// level, place the player at the saved pose, and resume Playing.
    /// Returns `false` and changes nothing when the snapshot is structurally
    /// invalid.
    pub fn restore(&mut self, save: &SaveState) -> bool {
        if !save.is_valid() {
            tracing::debug!("Rejected invalid save state");
            return false;
        }
        self.profile = DifficultyProfile::for_difficulty(save.difficulty);
        self.level_index = save.level;
        self.level = self.source.generate(save.level, &self.profile);
        self.player = Player::spawn(&self.profile);
        self.player.position.x = save.player_x;
        self.player.position.y = save.player_y;
        self.score = save.score;
        self.lives = save.lives;
        self.level_started_ms = self.clock_ms;
        self.level_start_lives = save.lives;
        self.coins_collected = 0;
        self.active_effect = None;
        self.run_finished = false;
        self.camera.follow(
            self.player.bounds().center_x(),
            self.config.viewport_width,
            self.level.width,
        );
        self.state = GameState::Playing;
        tracing::debug!(level = save.level, "Run restored");
        true
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level_index(&self) -> u32 {
        self.level_index
    }

    pub fn coins_collected(&self) -> u32 {
        self.coins_collected
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Play time in the current level, in ms. Frozen while not Playing.
    pub fn elapsed_ms(&self) -> u64 {
        self.clock_ms - self.level_started_ms
    }

    pub fn active_effect(&self) -> Option<ActiveEffect> {
        self.active_effect
    }
}
