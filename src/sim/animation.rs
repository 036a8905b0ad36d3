//! Player state machine and sprite animation clocks

use serde::{Deserialize, Serialize};

/// Discrete player state, derived each tick from grounded/movement flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Walking,
    Jumping,
}

impl PlayerState {
    /// Airborne always wins; otherwise walking if a direction is held
    pub fn derive(on_ground: bool, moving: bool) -> Self {
        if !on_ground {
            PlayerState::Jumping
        } else if moving {
            PlayerState::Walking
        } else {
            PlayerState::Idle
        }
    }

    /// Move to `next`, returning true if the state actually changed
    /// (the caller restarts the animation on change)
    pub fn transition(&mut self, next: PlayerState) -> bool {
        let changed = *self != next;
        *self = next;
        changed
    }
}

/// Frame-based animation clock (no interpolation between frames)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub frames: u32,
    /// Seconds each frame is shown
    pub frame_time: f32,
    pub current_frame: u32,
    pub elapsed: f32,
}

impl Animation {
    pub fn new(frames: u32, frame_time: f32) -> Self {
        Self {
            frames: frames.max(1),
            frame_time,
            current_frame: 0,
            elapsed: 0.0,
        }
    }

    /// Restart at frame 0
    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.elapsed = 0.0;
    }

    /// Accumulate `dt`; once a full frame time has elapsed, step one frame
    /// (wrapping) and drop the remainder.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= self.frame_time {
            self.current_frame = (self.current_frame + 1) % self.frames;
            self.elapsed = 0.0;
        }
    }
}

/// The three player animations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSet {
    pub idle: Animation,
    pub walk: Animation,
    pub jump: Animation,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self {
            idle: Animation::new(5, 0.15),
            walk: Animation::new(8, 0.1),
            jump: Animation::new(8, 0.1),
        }
    }
}

impl AnimationSet {
    pub fn for_state(&self, state: PlayerState) -> &Animation {
        match state {
            PlayerState::Idle => &self.idle,
            PlayerState::Walking => &self.walk,
            PlayerState::Jumping => &self.jump,
        }
    }

    pub fn for_state_mut(&mut self, state: PlayerState) -> &mut Animation {
        match state {
            PlayerState::Idle => &mut self.idle,
            PlayerState::Walking => &mut self.walk,
            PlayerState::Jumping => &mut self.jump,
        }
    }

    /// Drive the animation for `state`: restart it if the state just changed,
    /// otherwise advance it by `dt`
    pub fn update(&mut self, state: PlayerState, dt: f32, state_changed: bool) {
        let anim = self.for_state_mut(state);
        if state_changed {
            anim.reset();
        } else {
            anim.advance(dt);
        }
    }
}
