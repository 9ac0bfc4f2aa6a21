use crate::entity::{PLAYER_HEIGHT, PLAYER_WIDTH, Platform, Player};
use crate::geometry::{Aabb, Vec2};

/// Vertical speed beyond which one overlap test per tick could step clean
/// over a thin platform, so the resolver sweeps in sub-steps instead.
pub const SWEEP_THRESHOLD: f32 = 10.0;
/// Vertical units each sweep sub-step covers.
pub const SWEEP_GRANULARITY: f32 = 5.0;

/// Resolve the tentative position left by the physics step against every
/// platform. `origin` is the player's position before the step; the crossing
/// tests compare against it so a box already past a face never snaps back
/// through it. Returns true when the player ends the tick standing on a
/// platform.
pub fn resolve_collisions(player: &mut Player, origin: Vec2, platforms: &[Platform]) -> bool {
    resolve_horizontal(player, origin, platforms);

    // X is final; sweep the vertical displacement when one step could tunnel.
    let steps = if player.speed_y.abs() > SWEEP_THRESHOLD {
        (player.speed_y.abs() / SWEEP_GRANULARITY).ceil() as u32
    } else {
        1
    };
    for step in 1..=steps {
        let candidate_y = origin.y + player.speed_y * (step as f32 / steps as f32);
        if let Some(grounded) = resolve_vertical(player, origin.y, candidate_y, platforms) {
            return grounded;
        }
    }
    false
}

/// Side hits lock position only. Horizontal speed is kept so a held
/// direction keeps grinding against the wall and releases instantly past
/// its corner.
fn resolve_horizontal(player: &mut Player, origin: Vec2, platforms: &[Platform]) {
    for platform in platforms {
        let probe = Aabb::new(player.position.x, origin.y, PLAYER_WIDTH, PLAYER_HEIGHT);
        if !probe.overlaps(&platform.rect) {
            continue;
        }
        if player.speed_x > 0.0 && origin.x + PLAYER_WIDTH <= platform.rect.x {
            player.position.x = platform.rect.x - PLAYER_WIDTH;
        } else if player.speed_x < 0.0 && origin.x >= platform.rect.right() {
            player.position.x = platform.rect.right();
        }
    }
}

/// Test one candidate Y against every platform. `Some(grounded)` when a
/// platform resolved the motion, `None` when this candidate passes free.
fn resolve_vertical(
    player: &mut Player,
    origin_y: f32,
    candidate_y: f32,
    platforms: &[Platform],
) -> Option<bool> {
    let probe = Aabb::new(player.position.x, candidate_y, PLAYER_WIDTH, PLAYER_HEIGHT);
    for platform in platforms {
        if !probe.overlaps(&platform.rect) {
            continue;
        }
        if player.speed_y > 0.0 && origin_y + PLAYER_HEIGHT <= platform.rect.y {
            player.position.y = platform.rect.y - PLAYER_HEIGHT;
            player.speed_y = 0.0;
            player.is_jumping = false;
            return Some(true);
        }
        if player.speed_y < 0.0 && origin_y >= platform.rect.bottom() {
            player.position.y = platform.rect.bottom();
            player.speed_y = 0.0;
            return Some(false);
        }
    }
    None
}
