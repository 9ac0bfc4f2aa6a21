use serde::{Deserialize, Serialize};

use powerplug_core::config::DifficultyProfile;
use powerplug_core::powerup::PowerUpKind;

use crate::geometry::{Aabb, Vec2};
use crate::physics;

/// Player sprite extents.
pub const PLAYER_WIDTH: f32 = 32.0;
pub const PLAYER_HEIGHT: f32 = 48.0;
/// Where every level starts the player, and where respawns return them.
pub const PLAYER_SPAWN: Vec2 = Vec2::new(50.0, 400.0);

/// Collectible and goal extents.
pub const COIN_SIZE: f32 = 20.0;
pub const POWER_UP_SIZE: f32 = 30.0;
pub const OUTLET_SIZE: f32 = 40.0;
pub const OBSTACLE_SIZE: f32 = 20.0;

/// The player-controlled sprite.
///
/// Owned by the session and mutated only by the physics step, the collision
/// resolver, and the interaction handlers. Movement constants are copied in
/// from the difficulty profile at spawn so a mid-run profile change cannot
/// retune a live player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub speed_x: f32,
    pub speed_y: f32,
    /// Airborne-from-a-jump flag. Cleared by landing, not by apex.
    pub is_jumping: bool,
    /// Ticks remaining before another grounded jump press may fire.
    pub jump_buffer_ticks: u32,
    pub base_speed: f32,
    /// Flat bonus to target speed while a boost effect is active.
    pub speed_boost: f32,
    pub jump_power: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub air_friction: f32,
    pub invincible: bool,
    /// Session-clock deadline for the current invincibility window.
    pub invincible_until_ms: u64,
}

impl Player {
    /// Fresh player at the level spawn, tuned by the profile.
    pub fn spawn(profile: &DifficultyProfile) -> Self {
        Self {
            position: PLAYER_SPAWN,
            speed_x: 0.0,
            speed_y: 0.0,
            is_jumping: false,
            jump_buffer_ticks: 0,
            base_speed: profile.base_speed,
            speed_boost: 0.0,
            jump_power: profile.jump_power,
            acceleration: physics::ACCELERATION,
            deceleration: physics::DECELERATION,
            air_friction: physics::AIR_FRICTION,
            invincible: false,
            invincible_until_ms: 0,
        }
    }

    /// Return to the spawn point after a hit. Motion state resets; tuning
    /// and any active speed boost survive.
    pub fn respawn(&mut self) {
        self.position = PLAYER_SPAWN;
        self.speed_x = 0.0;
        self.speed_y = 0.0;
        self.is_jumping = false;
        self.jump_buffer_ticks = 0;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

/// A static platform. Index 0 in [`Level::platforms`] is always the ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Aabb,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Aabb::new(x, y, width, height),
        }
    }
}

/// Patrol bounds for a moving obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub speed_x: f32,
    pub start_x: f32,
    pub range: f32,
}

/// A hazard. Static by default; with a patrol it oscillates between
/// `start_x - range` and `start_x + range`, reversing at each bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Aabb,
    pub patrol: Option<Patrol>,
}

impl Obstacle {
    pub fn fixed(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Aabb::new(x, y, width, height),
            patrol: None,
        }
    }

    pub fn patrolling(x: f32, y: f32, width: f32, height: f32, speed_x: f32, range: f32) -> Self {
        Self {
            rect: Aabb::new(x, y, width, height),
            patrol: Some(Patrol {
                speed_x,
                start_x: x,
                range,
            }),
        }
    }

    /// Advance one tick of patrol motion. No-op for static obstacles.
    /// Bounds are inclusive: landing exactly on one still reverses.
    pub fn advance(&mut self) {
        let Some(patrol) = &mut self.patrol else {
            return;
        };
        self.rect.x += patrol.speed_x;
        if self.rect.x >= patrol.start_x + patrol.range || self.rect.x <= patrol.start_x - patrol.range
        {
            patrol.speed_x = -patrol.speed_x;
        }
    }
}

/// A coin. Collection flips `collected`; it never flips back within a level
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub rect: Aabb,
    pub collected: bool,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Aabb::new(x, y, COIN_SIZE, COIN_SIZE),
            collected: false,
        }
    }
}

/// A collectible power-up hovering over a platform.
///
/// `pulse_phase` drives the renderer's bobbing animation and has no gameplay
/// meaning; the engine just accumulates it while the power-up is on board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Aabb,
    pub kind: PowerUpKind,
    pub collected: bool,
    pub pulse_rate: f32,
    pub pulse_phase: f32,
}

impl PowerUp {
    pub fn new(x: f32, y: f32, kind: PowerUpKind, pulse_rate: f32) -> Self {
        Self {
            rect: Aabb::new(x, y, POWER_UP_SIZE, POWER_UP_SIZE),
            kind,
            collected: false,
            pulse_rate,
            pulse_phase: 0.0,
        }
    }

    pub fn pulse(&mut self) {
        if !self.collected {
            self.pulse_phase += self.pulse_rate;
        }
    }
}

/// The level goal. Touching it while playing completes the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    pub rect: Aabb,
}

impl Outlet {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Aabb::new(x, y, OUTLET_SIZE, OUTLET_SIZE),
        }
    }
}

/// One generated level. `platforms[0]` is always the ground slab spanning
/// the full level width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
    pub outlet: Outlet,
    pub width: f32,
}

impl Level {
    pub fn ground(&self) -> &Platform {
        &self.platforms[0]
    }

    /// Coins still on the board.
    pub fn active_coins(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter().filter(|c| !c.collected)
    }

    /// Power-ups still on the board.
    pub fn active_power_ups(&self) -> impl Iterator<Item = &PowerUp> {
        self.power_ups.iter().filter(|p| !p.collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerplug_core::config::Difficulty;

    #[test]
    fn spawn_applies_profile_tuning() {
        let profile = DifficultyProfile::for_difficulty(Difficulty::Hard);
        let player = Player::spawn(&profile);
        assert_eq!(player.position, PLAYER_SPAWN);
        assert_eq!(player.base_speed, 6.0);
        assert_eq!(player.jump_power, -13.0);
        assert_eq!(player.speed_boost, 0.0);
        assert!(!player.is_jumping);
    }

    #[test]
    fn respawn_resets_motion_but_keeps_tuning() {
        let profile = DifficultyProfile::for_difficulty(Difficulty::Easy);
        let mut player = Player::spawn(&profile);
        player.position = Vec2::new(900.0, 120.0);
        player.speed_x = 3.5;
        player.speed_y = -8.0;
        player.is_jumping = true;
        player.speed_boost = 2.0;

        player.respawn();

        assert_eq!(player.position, PLAYER_SPAWN);
        assert_eq!(player.speed_x, 0.0);
        assert_eq!(player.speed_y, 0.0);
        assert!(!player.is_jumping);
        assert_eq!(player.speed_boost, 2.0, "boost is governed by the effect slot");
        assert_eq!(player.base_speed, 4.0);
    }

    #[test]
    fn static_obstacle_never_moves() {
        let mut obstacle = Obstacle::fixed(100.0, 430.0, 20.0, 20.0);
        for _ in 0..50 {
            obstacle.advance();
        }
        assert_eq!(obstacle.rect.x, 100.0);
    }

    #[test]
    fn patrol_stays_in_band_and_reverses() {
        // 0.5 px/tick over a 50 px range: exactly at the bound after 100
        // ticks, which must still reverse.
        let mut obstacle = Obstacle::patrolling(300.0, 430.0, 20.0, 20.0, 0.5, 50.0);
        let mut reversed = false;
        let mut previous_speed = 0.5;
        for _ in 0..100 {
            obstacle.advance();
            let speed = obstacle.patrol.unwrap().speed_x;
            if speed != previous_speed {
                reversed = true;
            }
            previous_speed = speed;
            assert!(
                (250.0..=350.0).contains(&obstacle.rect.x),
                "patrol left its band at x={}",
                obstacle.rect.x
            );
        }
        assert!(reversed, "patrol must reverse at the inclusive bound");
        assert_eq!(obstacle.rect.x, 350.0);
        assert_eq!(obstacle.patrol.unwrap().speed_x, -0.5);
    }

    #[test]
    fn patrol_reverses_at_lower_bound_too() {
        let mut obstacle = Obstacle::patrolling(300.0, 430.0, 20.0, 20.0, -2.0, 10.0);
        for _ in 0..6 {
            obstacle.advance();
        }
        assert!(
            obstacle.patrol.unwrap().speed_x > 0.0,
            "must head right again after touching start_x - range"
        );
    }

    #[test]
    fn pulse_stops_after_collection() {
        let mut power_up = PowerUp::new(0.0, 0.0, PowerUpKind::SpeedBoost, 0.01);
        power_up.pulse();
        power_up.pulse();
        assert!((power_up.pulse_phase - 0.02).abs() < 1e-6);

        power_up.collected = true;
        power_up.pulse();
        assert!((power_up.pulse_phase - 0.02).abs() < 1e-6, "collected power-ups stop animating");
    }

    #[test]
    fn active_iterators_skip_collected() {
        let mut level = Level {
            platforms: vec![Platform::new(0.0, 450.0, 800.0, 50.0)],
            obstacles: vec![],
            coins: vec![Coin::new(100.0, 410.0), Coin::new(200.0, 410.0)],
            power_ups: vec![PowerUp::new(150.0, 420.0, PowerUpKind::ExtraLife, 0.01)],
            outlet: Outlet::new(700.0, 410.0),
            width: 800.0,
        };
        level.coins[0].collected = true;
        assert_eq!(level.active_coins().count(), 1);
        assert_eq!(level.active_power_ups().count(), 1);
        level.power_ups[0].collected = true;
        assert_eq!(level.active_power_ups().count(), 0);
    }

    #[test]
    fn level_round_trips_through_json() {
        // Render and persistence collaborators consume these types as JSON.
        let level = Level {
            platforms: vec![Platform::new(0.0, 450.0, 800.0, 50.0)],
            obstacles: vec![Obstacle::patrolling(300.0, 430.0, 20.0, 20.0, 0.5, 50.0)],
            coins: vec![Coin::new(100.0, 410.0)],
            power_ups: vec![PowerUp::new(150.0, 420.0, PowerUpKind::Invincibility, 0.01)],
            outlet: Outlet::new(700.0, 410.0),
            width: 800.0,
        };
        let json = serde_json::to_string(&level).unwrap();
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back, level, "level changed across serde");
        assert!(json.contains("\"invincibility\""), "got {json}");
    }
}
