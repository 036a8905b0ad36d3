//! Sky Hop - An endless vertical platform-jumping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, platform pool)
//! - `game`: Session shell (menu/playing/game-over, fixed timestep)
//! - `view`: Render-collaborator data for an external renderer
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod sim;
pub mod tuning;
pub mod view;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{FrameInput, Game, Phase};
pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the accumulator accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Viewport dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player physics (pixels, seconds; y grows downward)
    pub const GRAVITY: f32 = 980.0;
    pub const JUMP_VELOCITY: f32 = -450.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const MAX_FALL_SPEED: f32 = 800.0;
    pub const PLAYER_HITBOX_WIDTH: f32 = 32.0;
    pub const PLAYER_HITBOX_HEIGHT: f32 = 32.0;
    /// Player spawns this far above the first platform's top
    pub const SPAWN_LIFT: f32 = 2.0;

    /// Feet region: starts this far above the hitbox bottom...
    pub const FEET_INSET: f32 = 10.0;
    /// ...and is this tall (so it pokes 5px below the hitbox)
    pub const FEET_HEIGHT: f32 = 15.0;
    /// Previous-bottom tolerance for counting an overlap as a landing
    pub const LANDING_TOLERANCE: f32 = 1.0;

    /// Platform pool
    pub const MAX_PLATFORMS: usize = 22;
    pub const INITIAL_PLATFORMS: usize = 8;
    pub const PLATFORM_HEIGHT: f32 = 32.0;
    pub const PLATFORM_MIN_GAP: i32 = 50;
    pub const PLATFORM_MAX_GAP: i32 = 100;
    pub const MAX_HORIZONTAL_GAP: i32 = 160;
    pub const PLATFORM_MIN_WIDTH: i32 = 80;
    pub const PLATFORM_MAX_WIDTH: i32 = 180;
    /// Generated platform centers stay this far from either screen edge
    pub const PLATFORM_EDGE_MARGIN: f32 = 50.0;
    /// First platform: centered, near the bottom of the screen
    pub const FIRST_PLATFORM_WIDTH: f32 = 200.0;
    pub const FIRST_PLATFORM_BOTTOM_OFFSET: f32 = 100.0;

    /// Scroll/despawn: platforms this far below the visible bottom are freed
    pub const DESPAWN_MARGIN: f32 = 100.0;
    /// Refill once the highest platform sinks within this of the visible top
    pub const REFILL_MARGIN: f32 = 150.0;
    /// Platforms requested per refill
    pub const REFILL_BATCH: usize = 5;

    /// Camera never shows more than this below the start height
    pub const CAMERA_FLOOR_MARGIN: f32 = 50.0;
    /// Player below the visible bottom by more than this ends the run
    pub const GAME_OVER_MARGIN: f32 = 50.0;

    /// Game speed multiplier from score
    pub const SPEED_PER_POINT: f32 = 0.0005;
    pub const MAX_GAME_SPEED: f32 = 2.5;
}

/// Game speed multiplier for a given score: `1 + score * per_point`, capped.
#[inline]
pub fn speed_for_score(score: u32, per_point: f32, max_speed: f32) -> f32 {
    (1.0 + score as f32 * per_point).clamp(1.0, max_speed)
}

/// Clamp `x` into `[min, max]` without panicking on an inverted range
/// (which `f32::clamp` would). `min` wins if the range is inverted.
#[inline]
pub fn clamp_soft(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}
