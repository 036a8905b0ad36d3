//! Landing detection between the player and platforms
//!
//! Only the feet region counts for landing, and only if the player's
//! previous-tick bottom was at or above the platform's top. A player falling
//! past a platform's side, or rising through it, never lands on it.

use super::pool::PlatformPool;
use super::rect::Rect;
use crate::consts::{FEET_HEIGHT, FEET_INSET, LANDING_TOLERANCE};

/// Result of a landing query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Slot of the platform landed on
    pub slot: usize,
    /// The platform's top; the player's feet snap here
    pub surface_y: f32,
}

/// Thin band at the bottom of the hitbox used for landing checks
pub fn feet_region(hitbox: &Rect) -> Rect {
    Rect::new(
        hitbox.x,
        hitbox.bottom() - FEET_INSET,
        hitbox.width,
        FEET_HEIGHT,
    )
}

/// Whether a player who was at `prev_hitbox` last tick and is at `hitbox`
/// now lands on `platform`
pub fn lands_on(hitbox: &Rect, prev_hitbox: &Rect, platform: &Rect) -> bool {
    feet_region(hitbox).overlaps(platform)
        && prev_hitbox.bottom() <= platform.top() + LANDING_TOLERANCE
}

/// First active platform (slot order) the player lands on this tick.
///
/// Callers only ask while the player is falling or still (`vel.y >= 0`).
pub fn find_landing(hitbox: &Rect, prev_hitbox: &Rect, pool: &PlatformPool) -> Option<Landing> {
    pool.active()
        .find(|(_, p)| lands_on(hitbox, prev_hitbox, &p.rect))
        .map(|(slot, p)| Landing {
            slot,
            surface_y: p.rect.top(),
        })
}
