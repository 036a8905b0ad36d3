//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod animation;
pub mod autopilot;
pub mod collision;
pub mod pool;
pub mod rect;
pub mod state;
pub mod tick;

pub use animation::{Animation, AnimationSet, PlayerState};
pub use collision::{Landing, find_landing};
pub use pool::{PlatformPool, PoolError, roll_platform};
pub use rect::Rect;
pub use state::{Camera, GameEvent, GameState, Platform, PlatformKind, Player};
pub use tick::{TickInput, check_game_over, tick, update_camera, update_platforms, update_player};
