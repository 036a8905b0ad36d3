//! Game state and core simulation types
//!
//! One `GameState` is one run: player, platform pool, camera, score and the
//! seeded RNG that drives platform generation.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationSet, PlayerState};
use super::pool::PlatformPool;
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Platform visual variant (cosmetic only, no effect on physics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Grass,
    Stone,
    Wood,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 3] = [PlatformKind::Grass, PlatformKind::Stone, PlatformKind::Wood];

    /// Index into per-kind asset tables
    pub fn index(self) -> usize {
        match self {
            PlatformKind::Grass => 0,
            PlatformKind::Stone => 1,
            PlatformKind::Wood => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// A platform slot in the pool
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
    /// Inactive slots are invisible, non-collidable and free for reuse
    pub active: bool,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Bottom-center of the sprite
    pub pos: Vec2,
    pub vel: Vec2,
    pub hitbox: Rect,
    /// Hitbox at the start of the current tick (landing tie-break)
    pub prev_hitbox: Rect,
    pub state: PlayerState,
    pub facing_right: bool,
    pub on_ground: bool,
    /// Slot index of the platform last stood on
    pub current_platform: usize,
    /// Fresh landings this run (not used for scoring)
    pub platforms_hit: u32,
    pub animations: AnimationSet,
}

impl Player {
    /// Spawn standing on top of `platform`, centered
    pub fn spawn_on(platform: &Platform, slot: usize) -> Self {
        let pos = Vec2::new(platform.rect.center_x(), platform.rect.top() - SPAWN_LIFT);
        let hitbox = Rect::from_bottom_center(pos, PLAYER_HITBOX_WIDTH, PLAYER_HITBOX_HEIGHT);
        Self {
            pos,
            vel: Vec2::ZERO,
            hitbox,
            prev_hitbox: hitbox,
            state: PlayerState::Idle,
            facing_right: true,
            on_ground: true,
            current_platform: slot,
            platforms_hit: 0,
            animations: AnimationSet::default(),
        }
    }

    /// Recompute the hitbox from the bottom-center anchor
    pub fn sync_hitbox(&mut self) {
        self.hitbox = Rect::from_bottom_center(self.pos, PLAYER_HITBOX_WIDTH, PLAYER_HITBOX_HEIGHT);
    }
}

/// 2D follow camera (screen-space offset + world-space target)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World point shown at `offset`
    pub target: Vec2,
    /// Screen point the target maps to (viewport center)
    pub offset: Vec2,
}

impl Camera {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            target: Vec2::ZERO,
            offset: Vec2::new(tuning.half_width(), tuning.half_height()),
        }
    }

    /// World y of the top edge of the view
    #[inline]
    pub fn visible_top(&self, tuning: &Tuning) -> f32 {
        self.target.y - tuning.half_height()
    }

    /// World y of the bottom edge of the view
    #[inline]
    pub fn visible_bottom(&self, tuning: &Tuning) -> f32 {
        self.target.y + tuning.half_height()
    }

    /// Convert a world position to screen space
    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.target + self.offset
    }
}

/// Things that happened during a tick, drained by the session layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Jump launched from the given platform slot
    Jumped { from_slot: usize },
    /// Fresh landing (player was airborne) on the given slot, feet at `surface_y`
    Landed { slot: usize, surface_y: f32 },
    /// A free slot was filled
    PlatformSpawned { slot: usize },
    /// Platforms scrolled off the bottom and were freed
    PlatformsDespawned { count: usize },
    /// A generation request found no free slot and was dropped
    GenerationDropped,
    /// Player fell off the bottom of the screen
    GameOver { score: u32 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Platform generation RNG
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub player: Player,
    pub platforms: PlatformPool,
    pub camera: Camera,
    /// Best height climbed above the start, in pixels (never decreases)
    pub score: u32,
    /// Multiplier on movement, gravity and animation playback
    pub game_speed: f32,
    /// Hitbox top at spawn; score is measured from here
    pub start_y: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once the game-over condition fires; the run no longer ticks
    pub over: bool,
    /// Generation requests dropped because the pool was full
    pub dropped_generations: u32,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new run: seed the initial platform chain, spawn the player on
    /// slot 0 and frame the camera.
    ///
    /// `tuning` must pass `Tuning::validate` (the generator's ranges must be
    /// ordered); `Game::with_tuning` checks this for hosts.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "unvalidated tuning: {:?}", tuning.validate());
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut platforms = PlatformPool::new();
        platforms.seed_initial(&mut rng, &tuning);

        let player = Player::spawn_on(platforms.get(0), 0);
        let start_y = player.pos.y - PLAYER_HITBOX_HEIGHT;

        let mut state = Self {
            seed,
            rng,
            camera: Camera::new(&tuning),
            tuning,
            player,
            platforms,
            score: 0,
            game_speed: 1.0,
            start_y,
            time_ticks: 0,
            over: false,
            dropped_generations: 0,
            events: Vec::new(),
        };
        super::tick::update_camera(&mut state);
        state
    }

    /// Ask the pool for one new platform above `(ref_x, ref_y)`.
    /// A full pool drops the request; the drop is counted and reported.
    pub fn request_platform(&mut self, ref_x: f32, ref_y: f32) -> Option<usize> {
        match self.platforms.generate(&mut self.rng, &self.tuning, ref_x, ref_y) {
            Ok(slot) => {
                self.events.push(GameEvent::PlatformSpawned { slot });
                Some(slot)
            }
            Err(e) => {
                log::debug!("Dropped platform request at ({ref_x}, {ref_y}): {e}");
                self.dropped_generations += 1;
                self.events.push(GameEvent::GenerationDropped);
                None
            }
        }
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
