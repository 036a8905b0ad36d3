//! Demo-mode controller
//!
//! Picks the highest platform the player can still reach, steers toward its
//! center and jumps as soon as it is grounded. Purely a function of the
//! current state, so demo runs stay deterministic.

use super::state::{GameState, Platform};
use super::tick::TickInput;

/// Only aim for platforms within this fraction of the theoretical reach
const REACH_SLACK: f32 = 0.85;
/// Horizontal distance (px) treated as "already above the target"
const AIM_DEADZONE: f32 = 3.0;

/// Input the autopilot would give this tick
pub fn steer(state: &GameState) -> TickInput {
    let tuning = &state.tuning;
    let player = &state.player;

    let gravity = tuning.gravity * state.game_speed;
    let run_speed = tuning.player_speed * state.game_speed;
    let jump_speed = -tuning.jump_velocity;
    let feet = player.pos.y;

    // How much higher the feet can still get
    let rise_left = if player.on_ground {
        jump_speed * jump_speed / (2.0 * gravity)
    } else if player.vel.y < 0.0 {
        player.vel.y * player.vel.y / (2.0 * gravity)
    } else {
        0.0
    };
    let ceiling = feet - rise_left * REACH_SLACK;

    let reachable = |p: &Platform| -> bool {
        let top = p.rect.top();
        if top < ceiling {
            return false;
        }
        if !player.on_ground {
            return true;
        }
        // Grounded: must be above us and close enough to cover mid-air
        if top >= feet - 1.0 {
            return false;
        }
        let apex = jump_speed * jump_speed / (2.0 * gravity);
        let drop = (apex - (feet - top)).max(0.0);
        let airtime = jump_speed / gravity + (2.0 * drop / gravity).sqrt();
        let nearest_x = player.pos.x.clamp(p.rect.left(), p.rect.right());
        (nearest_x - player.pos.x).abs() <= run_speed * airtime * REACH_SLACK
    };

    // Highest reachable platform, nearest horizontally on ties
    let target = state
        .platforms
        .active()
        .map(|(_, p)| p)
        .filter(|&p| reachable(p))
        .min_by(|a, b| {
            a.rect
                .top()
                .total_cmp(&b.rect.top())
                .then_with(|| {
                    let da = (a.rect.center_x() - player.pos.x).abs();
                    let db = (b.rect.center_x() - player.pos.x).abs();
                    da.total_cmp(&db)
                })
        });

    // Nothing comfortably reachable: try the closest platform above anyway
    let target = target.or_else(|| {
        state
            .platforms
            .active()
            .map(|(_, p)| p)
            .filter(|p| p.rect.top() < feet - 1.0)
            .max_by(|a, b| a.rect.top().total_cmp(&b.rect.top()))
    });

    let Some(target) = target else {
        return TickInput {
            autopilot: true,
            ..Default::default()
        };
    };

    let dx = target.rect.center_x() - player.pos.x;
    TickInput {
        left: dx < -AIM_DEADZONE,
        right: dx > AIM_DEADZONE,
        jump: player.on_ground,
        autopilot: true,
    }
}
