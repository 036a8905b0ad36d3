//! Simulation tick
//!
//! One tick runs, in order: player physics/collision, camera follow,
//! platform scroll/despawn/refill, and the game-over check.

use super::animation::PlayerState;
use super::autopilot;
use super::collision::find_landing;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Move left held (wins over `right` if both are held)
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Jump pressed this tick (edge, not held)
    pub jump: bool,
    /// Demo mode - the autopilot drives the player
    pub autopilot: bool,
}

/// Advance the run by one timestep of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // A finished run is frozen until the session starts a new one
    if state.over {
        return;
    }

    state.time_ticks += 1;

    let steered;
    let input = if input.autopilot {
        steered = autopilot::steer(state);
        &steered
    } else {
        input
    };

    update_player(state, input, dt);
    update_camera(state);
    update_platforms(state);
    check_game_over(state);
}

/// Player physics, landing, state/animation, score and game speed
pub fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let speed = state.game_speed;
    let player = &mut state.player;

    player.prev_hitbox = player.hitbox;
    let was_airborne = !player.on_ground;

    // Horizontal movement
    let moving = if input.left {
        player.vel.x = -state.tuning.player_speed * speed;
        player.facing_right = false;
        true
    } else if input.right {
        player.vel.x = state.tuning.player_speed * speed;
        player.facing_right = true;
        true
    } else {
        player.vel.x = 0.0;
        false
    };

    // Jump: also ask for a new platform above the one we're leaving so the
    // supply stays ahead of the climb
    if input.jump && player.on_ground {
        player.vel.y = state.tuning.jump_velocity;
        player.on_ground = false;

        let from_slot = player.current_platform;
        let from = state.platforms.get(from_slot).rect;
        state.events.push(GameEvent::Jumped { from_slot });
        state.request_platform(from.center_x(), from.top());
    }

    let tuning = &state.tuning;
    let player = &mut state.player;

    // Gravity, capped at terminal velocity
    player.vel.y += tuning.gravity * dt * speed;
    if player.vel.y > tuning.max_fall_speed {
        player.vel.y = tuning.max_fall_speed;
    }

    player.pos += player.vel * dt;
    player.sync_hitbox();

    // Landing (never while still rising)
    player.on_ground = false;
    if player.vel.y >= 0.0 {
        if let Some(landing) = find_landing(&player.hitbox, &player.prev_hitbox, &state.platforms) {
            player.pos.y = landing.surface_y;
            player.vel.y = 0.0;
            player.on_ground = true;
            player.current_platform = landing.slot;
            player.sync_hitbox();

            if was_airborne {
                player.platforms_hit += 1;
                state.events.push(GameEvent::Landed {
                    slot: landing.slot,
                    surface_y: landing.surface_y,
                });
            }
        }
    }

    // State machine + animation
    let next = PlayerState::derive(player.on_ground, moving);
    let changed = player.state.transition(next);
    player.animations.update(player.state, dt * speed, changed);

    // Score is the best height reached; speed follows score
    let height = state.start_y - player.hitbox.top();
    if height > state.score as f32 {
        state.score = height as u32;
    }
    state.game_speed = tuning.speed_for_score(state.score);
}

/// Center the camera on the player without ever looking below the start
pub fn update_camera(state: &mut GameState) {
    let tuning = &state.tuning;
    let camera = &mut state.camera;

    camera.target.x = state.player.pos.x;
    camera.target.y = state.player.pos.y - tuning.screen_height / 3.0;

    let floor = state.start_y - tuning.half_height() + CAMERA_FLOOR_MARGIN;
    if camera.target.y > floor {
        camera.target.y = floor;
    }

    camera.offset = glam::Vec2::new(tuning.half_width(), tuning.half_height());
}

/// Free platforms that scrolled off the bottom, then top up the supply above
/// the view if the highest platform is getting close to the top edge
pub fn update_platforms(state: &mut GameState) {
    let bottom_limit = state.camera.visible_bottom(&state.tuning) + DESPAWN_MARGIN;
    let freed = state.platforms.despawn_below(bottom_limit);
    if freed > 0 {
        log::debug!("Despawned {} platforms below y={}", freed, bottom_limit);
        state.events.push(GameEvent::PlatformsDespawned { count: freed });
    }

    let visible_top = state.camera.visible_top(&state.tuning);
    let (ref_x, ref_y) = match state.platforms.highest_active() {
        None => (state.tuning.half_width(), visible_top),
        Some((_, highest)) if highest.rect.y > visible_top + REFILL_MARGIN => {
            (highest.rect.center_x(), highest.rect.y)
        }
        Some(_) => return,
    };

    let step = state.tuning.platform_max_gap as f32 + PLATFORM_HEIGHT;
    for j in 0..REFILL_BATCH {
        state.request_platform(ref_x, ref_y - j as f32 * step);
    }
}

/// End the run once the player drops far enough below the view.
/// Returns true on the tick the run ends.
pub fn check_game_over(state: &mut GameState) -> bool {
    let limit = state.camera.visible_bottom(&state.tuning) + GAME_OVER_MARGIN;
    if state.over || state.player.pos.y <= limit {
        return false;
    }

    state.over = true;
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!(
        "Run over: score {} ({} platforms hit, {} ticks)",
        state.score,
        state.player.platforms_hit,
        state.time_ticks
    );
    true
}
