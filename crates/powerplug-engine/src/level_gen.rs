use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use powerplug_core::config::DifficultyProfile;
use powerplug_core::powerup::PowerUpKind;

use crate::entity::{
    COIN_SIZE, Coin, Level, OBSTACLE_SIZE, OUTLET_SIZE, Obstacle, Outlet, PLAYER_SPAWN,
    POWER_UP_SIZE, Platform, PowerUp,
};

/// Top of the ground slab.
pub const GROUND_Y: f32 = 450.0;
/// Ground slab thickness.
pub const GROUND_HEIGHT: f32 = 50.0;
/// Generated platform slab thickness.
pub const PLATFORM_HEIGHT: f32 = 20.0;

/// Height band for platform tops. The walk may leave the low end when a
/// weak jump arc demands it; it never leaves the high end.
const BAND_TOP: f32 = 150.0;
const BAND_BOTTOM: f32 = 400.0;
/// Platform width on level 1; later levels shrink it, never below the floor.
const BASE_PLATFORM_WIDTH: f32 = 100.0;
const MIN_PLATFORM_WIDTH: f32 = 50.0;
const PLATFORM_WIDTH_SHRINK: f32 = 10.0;
/// Lower bound on the horizontal step fraction; the difficulty margin caps it.
const MIN_STEP_FRACTION: f32 = 0.45;
/// Extra platforms granted per level beyond the first, and the cap on them.
const MAX_EXTRA_PLATFORMS: u32 = 6;
/// Ground extends this far past the rightmost placed object.
const GROUND_MARGIN: f32 = 200.0;
/// Rejection-sampling budget for obstacle and power-up placement.
const PLACEMENT_RETRIES: u32 = 12;
/// Minimum center distance between collectibles.
const ITEM_SEPARATION: f32 = 40.0;
/// Coins closer than this to the outlet center are dropped.
const OUTLET_CLEARANCE: f32 = 60.0;
/// Chance a platform carries a coin.
const COIN_CHANCE: f64 = 0.8;
/// Ground obstacles never spawn left of this, keeping the spawn area clear.
const OBSTACLE_MIN_X: f32 = 120.0;
/// Patrol bounce range as a fraction of the host platform's width.
const PATROL_RANGE_FACTOR: f32 = 0.6;

/// Where a session's levels come from. Chosen once at construction; the
/// session never knows whether levels are generated, authored, or replayed.
pub trait LevelSource {
    /// Build the level for a 1-based index under the given profile.
    fn generate(&self, level_index: u32, profile: &DifficultyProfile) -> Level;
}

/// Seeded procedural level source.
///
/// Each `(seed, level_index)` pair maps to its own RNG stream, so the same
/// seed always replays the same run and a restored save can regenerate the
/// exact level it was taken in.
#[derive(Debug, Clone)]
pub struct ProceduralLevels {
    seed: u64,
    viewport_width: f32,
}

impl ProceduralLevels {
    pub fn new(seed: u64, viewport_width: f32) -> Self {
        Self {
            seed,
            viewport_width,
        }
    }

    fn rng_for_level(&self, level_index: u32) -> StdRng {
        let stream = self.seed ^ u64::from(level_index).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(stream)
    }
}

impl LevelSource for ProceduralLevels {
    fn generate(&self, level_index: u32, profile: &DifficultyProfile) -> Level {
        let mut rng = self.rng_for_level(level_index);

        let extra = level_index.saturating_sub(1).min(MAX_EXTRA_PLATFORMS);
        let platform_count = profile.platform_count + extra;
        let platform_width = (BASE_PLATFORM_WIDTH
            - PLATFORM_WIDTH_SHRINK * level_index.saturating_sub(1) as f32)
            .max(MIN_PLATFORM_WIDTH);

        let mut platforms = walk_platforms(&mut rng, profile, platform_count, platform_width);
        let power_ups = place_power_ups(&mut rng, &platforms, profile);
        let mut coins = place_coins(&mut rng, &platforms, &power_ups);
        let obstacles = place_obstacles(&mut rng, &platforms, profile, platform_count);

        // The final platform hosts the outlet; the ground then grows to span
        // everything placed, outlet included.
        let goal = &platforms[platforms.len() - 1].rect;
        let outlet = Outlet::new(goal.center_x() - OUTLET_SIZE / 2.0, goal.y - OUTLET_SIZE);

        let rightmost = platforms[1..]
            .iter()
            .map(|p| p.rect.right())
            .chain(obstacles.iter().map(|o| o.rect.right()))
            .chain(coins.iter().map(|c| c.rect.right()))
            .chain(power_ups.iter().map(|p| p.rect.right()))
            .chain(std::iter::once(outlet.rect.right()))
            .fold(0.0f32, f32::max);
        let width = (rightmost + GROUND_MARGIN).max(self.viewport_width);
        platforms[0] = Platform::new(0.0, GROUND_Y, width, GROUND_HEIGHT);

        // Keep the goal zone visually unambiguous.
        coins.retain(|coin| {
            !within(
                coin.rect.center_x(),
                coin.rect.center_y(),
                outlet.rect.center_x(),
                outlet.rect.center_y(),
                OUTLET_CLEARANCE,
            )
        });

        tracing::debug!(
            level_index,
            seed = self.seed,
            platforms = platform_count,
            coins = coins.len(),
            power_ups = power_ups.len(),
            obstacles = obstacles.len(),
            width,
            "Generated level"
        );

        Level {
            platforms,
            obstacles,
            coins,
            power_ups,
            outlet,
            width,
        }
    }
}

/// True when two centers sit closer than `distance`.
fn within(ax: f32, ay: f32, bx: f32, by: f32, distance: f32) -> bool {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy < distance * distance
}

/// Walk left to right from the player spawn, placing each platform one
/// bounded jump from the previous one. Index 0 is the ground placeholder,
/// resized by the caller once everything else is placed.
fn walk_platforms(
    rng: &mut StdRng,
    profile: &DifficultyProfile,
    platform_count: u32,
    platform_width: f32,
) -> Vec<Platform> {
    let max_distance = profile.max_jump_distance();
    let step_cap = profile.horizontal_margin();
    let rise_cap = profile.vertical_margin() * profile.max_jump_height();

    let mut platforms = Vec::with_capacity(platform_count as usize + 1);
    platforms.push(Platform::new(0.0, GROUND_Y, 800.0, GROUND_HEIGHT));

    let mut x = PLAYER_SPAWN.x;
    let mut y = GROUND_Y;
    for _ in 0..platform_count {
        x += max_distance * rng.random_range(MIN_STEP_FRACTION..=step_cap);
        let delta = rng.random_range(-rise_cap..=rise_cap);
        // The band clamp is cosmetic; the arc clamp is the reachability
        // guarantee and wins when they disagree.
        y = (y + delta).clamp(BAND_TOP, BAND_BOTTOM).max(y - rise_cap);
        platforms.push(Platform::new(x, y, platform_width, PLATFORM_HEIGHT));
    }
    platforms
}

/// Drop power-ups over randomly chosen platforms, never the ground and never
/// the final platform. A draw that crowds an earlier power-up is retried,
/// then given up on.
fn place_power_ups(
    rng: &mut StdRng,
    platforms: &[Platform],
    profile: &DifficultyProfile,
) -> Vec<PowerUp> {
    let mut power_ups = Vec::new();
    let hosts = 1..platforms.len().saturating_sub(1);
    if hosts.is_empty() {
        return power_ups;
    }
    for _ in 0..profile.power_up_count {
        for _ in 0..PLACEMENT_RETRIES {
            let host = &platforms[rng.random_range(hosts.clone())].rect;
            let x = host.center_x() - POWER_UP_SIZE / 2.0;
            let y = host.y - POWER_UP_SIZE;
            let crowded = power_ups.iter().any(|p: &PowerUp| {
                within(
                    p.rect.center_x(),
                    p.rect.center_y(),
                    x + POWER_UP_SIZE / 2.0,
                    y + POWER_UP_SIZE / 2.0,
                    ITEM_SEPARATION,
                )
            });
            if !crowded {
                let kind = match rng.random_range(0..3) {
                    0 => PowerUpKind::SpeedBoost,
                    1 => PowerUpKind::ExtraLife,
                    _ => PowerUpKind::Invincibility,
                };
                let pulse_rate = rng.random_range(0.005..0.015);
                power_ups.push(PowerUp::new(x, y, kind, pulse_rate));
                break;
            }
        }
    }
    power_ups
}

/// Hover a coin over most platforms, skipping spots already claimed by a
/// power-up or another coin.
fn place_coins(rng: &mut StdRng, platforms: &[Platform], power_ups: &[PowerUp]) -> Vec<Coin> {
    let mut coins: Vec<Coin> = Vec::new();
    for platform in &platforms[1..] {
        if !rng.random_bool(COIN_CHANCE) {
            continue;
        }
        let x = platform.rect.center_x() - COIN_SIZE / 2.0;
        let y = platform.rect.y - COIN_SIZE - 10.0;
        let center = (x + COIN_SIZE / 2.0, y + COIN_SIZE / 2.0);
        let crowded = coins
            .iter()
            .map(|c| (c.rect.center_x(), c.rect.center_y()))
            .chain(
                power_ups
                    .iter()
                    .map(|p| (p.rect.center_x(), p.rect.center_y())),
            )
            .any(|(cx, cy)| within(center.0, center.1, cx, cy, ITEM_SEPARATION));
        if !crowded {
            coins.push(Coin::new(x, y));
        }
    }
    coins
}

/// Scatter static obstacles along the ground away from platform shadows,
/// then seat patrol obstacles on interior platforms when the profile moves
/// them at all.
fn place_obstacles(
    rng: &mut StdRng,
    platforms: &[Platform],
    profile: &DifficultyProfile,
    platform_count: u32,
) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();
    let span_end = platforms[platforms.len() - 1].rect.right();
    let ground_count = (profile.obstacle_density * platform_count as f32).round() as u32;

    for _ in 0..ground_count {
        for _ in 0..PLACEMENT_RETRIES {
            let x = rng.random_range(OBSTACLE_MIN_X..span_end);
            let shadowed = platforms[1..]
                .iter()
                .any(|p| x + OBSTACLE_SIZE > p.rect.x && x < p.rect.right());
            let crowded = obstacles
                .iter()
                .any(|o: &Obstacle| (o.rect.x - x).abs() < ITEM_SEPARATION);
            if !shadowed && !crowded {
                obstacles.push(Obstacle::fixed(
                    x,
                    GROUND_Y - OBSTACLE_SIZE,
                    OBSTACLE_SIZE,
                    OBSTACLE_SIZE,
                ));
                break;
            }
        }
    }

    // Interior platforms only: never the first (the landing the player has
    // to make) and never the last (the outlet's).
    if profile.obstacle_speed > 0.0 && platforms.len() > 3 {
        let interior = 2..platforms.len() - 1;
        let patrol_count = (platform_count / 3).max(1);
        let mut used = Vec::new();
        for _ in 0..patrol_count {
            for _ in 0..PLACEMENT_RETRIES {
                let index = rng.random_range(interior.clone());
                if used.contains(&index) {
                    continue;
                }
                let host = &platforms[index].rect;
                obstacles.push(Obstacle::patrolling(
                    host.center_x() - OBSTACLE_SIZE / 2.0,
                    host.y - OBSTACLE_SIZE,
                    OBSTACLE_SIZE,
                    OBSTACLE_SIZE,
                    profile.obstacle_speed,
                    host.width * PATROL_RANGE_FACTOR,
                ));
                used.push(index);
                break;
            }
        }
    }

    obstacles
}
