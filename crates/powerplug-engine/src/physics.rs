use powerplug_core::input::InputState;

use crate::entity::{PLAYER_WIDTH, Player};

/// Horizontal speed gained per tick while a direction is held.
pub const ACCELERATION: f32 = 0.5;
/// Grounded speed retention per tick with no direction held.
pub const DECELERATION: f32 = 0.8;
/// Airborne speed retention per tick with no direction held.
pub const AIR_FRICTION: f32 = 0.95;
/// Speeds below this snap to zero instead of decaying forever.
pub const STOP_EPSILON: f32 = 0.1;
/// Ticks a jump press stays buffered; also the minimum spacing between jumps.
pub const JUMP_BUFFER_TICKS: u32 = 8;

/// Advance the player one tick: gravity, horizontal easing, the buffered
/// jump trigger, then integration. Returns true when a jump impulse fired.
///
/// The position this leaves is tentative; the collision resolver must run on
/// it before anything else reads the player.
pub fn tick_player(player: &mut Player, input: InputState, gravity: f32, level_width: f32) -> bool {
    player.speed_y += gravity;

    if input.right {
        let target = player.base_speed + player.speed_boost;
        player.speed_x = ease_toward(player.speed_x, target, player.acceleration);
    } else if input.left {
        let target = -(player.base_speed + player.speed_boost);
        player.speed_x = ease_toward(player.speed_x, target, player.acceleration);
    } else {
        player.speed_x *= if player.is_jumping {
            player.air_friction
        } else {
            player.deceleration
        };
        if player.speed_x.abs() < STOP_EPSILON {
            player.speed_x = 0.0;
        }
    }

    // The trigger consults the buffer value the tick was entered with, so a
    // fresh press fires immediately while a launch leaves the buffer full,
    // spacing consecutive jumps at least JUMP_BUFFER_TICKS apart.
    let buffered = player.jump_buffer_ticks;
    if input.jump && !player.is_jumping {
        player.jump_buffer_ticks = JUMP_BUFFER_TICKS;
    } else {
        player.jump_buffer_ticks = player.jump_buffer_ticks.saturating_sub(1);
    }
    let jumped = input.jump && !player.is_jumping && buffered == 0;
    if jumped {
        player.speed_y = player.jump_power;
        player.is_jumping = true;
    }

    player.position.x += player.speed_x;
    player.position.y += player.speed_y;
    player.position.x = player.position.x.clamp(0.0, level_width - PLAYER_WIDTH);

    jumped
}

/// Move `current` toward `target` by at most `step`, never overshooting.
fn ease_toward(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}
