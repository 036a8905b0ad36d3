//! Session shell around the simulation
//!
//! Owns the menu / playing / game-over flow, the fixed-step accumulator and
//! the high score table. Hosts (native runner, wasm bridge) feed it one
//! `FrameInput` per rendered frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{HighScoreEntry, HighScores};
use crate::sim::{GameEvent, GameState, Rect, TickInput, tick};
use crate::tuning::{Tuning, TuningError};

/// Start button size on the menu screen
pub const START_BUTTON_WIDTH: f32 = 256.0;
pub const START_BUTTON_HEIGHT: f32 = 128.0;

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen with the start button
    #[default]
    Menu,
    /// A run is in progress
    Playing,
    /// Run ended, showing the final score
    GameOver,
}

/// Input gathered by the host for one rendered frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Jump pressed this frame
    pub jump: bool,
    /// Escape pressed this frame
    pub escape: bool,
    /// Enter/confirm pressed this frame
    pub confirm: bool,
    /// Screen position of a mouse click this frame
    pub click: Option<Vec2>,
    /// Let the demo controller play
    pub autopilot: bool,
}

/// A play session: phases, current run and leaderboard
#[derive(Debug, Clone)]
pub struct Game {
    phase: Phase,
    state: GameState,
    tuning: Tuning,
    high_scores: HighScores,
    base_seed: u64,
    runs_started: u64,
    accumulator: f32,
    /// Jump pressed on a frame that ran no substep yet
    pending_jump: bool,
    last_rank: Option<usize>,
    last_run_new_best: bool,
}

impl Game {
    /// New session on the menu, default tuning
    pub fn new(seed: u64) -> Self {
        Self::from_valid_tuning(seed, Tuning::default())
    }

    /// New session on the menu with custom tuning.
    /// Fails with `TuningError::Invalid` if `tuning` does not validate.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_valid_tuning(seed, tuning))
    }

    fn from_valid_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            phase: Phase::Menu,
            state: GameState::with_tuning(seed, tuning.clone()),
            tuning,
            high_scores: HighScores::new(),
            base_seed: seed,
            runs_started: 0,
            accumulator: 0.0,
            pending_jump: false,
            last_rank: None,
            last_run_new_best: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current (or most recently finished) run
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Best score this session (0 before any scoring run)
    pub fn high_score(&self) -> u32 {
        self.high_scores.best()
    }

    /// Leaderboard rank of the last finished run, if it placed
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Whether the last finished run beat the previous high score
    pub fn last_run_new_best(&self) -> bool {
        self.last_run_new_best
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Menu start button, in screen space
    pub fn start_button(&self) -> Rect {
        Rect::new(
            self.tuning.half_width() - START_BUTTON_WIDTH / 2.0,
            self.tuning.half_height(),
            START_BUTTON_WIDTH,
            START_BUTTON_HEIGHT,
        )
    }

    /// Seed for the next run. Run 0 uses the session seed as-is.
    fn next_seed(&self) -> u64 {
        self.base_seed
            .wrapping_add(self.runs_started.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Throw away the current run and start a fresh one
    pub fn start_run(&mut self) {
        let seed = self.next_seed();
        self.runs_started += 1;
        self.state = GameState::with_tuning(seed, self.tuning.clone());
        self.accumulator = 0.0;
        self.pending_jump = false;
        self.phase = Phase::Playing;
        log::info!("Run {} started with seed: {}", self.runs_started, seed);
    }

    /// Advance one rendered frame of `dt` seconds.
    /// Returns the simulation events produced during this frame.
    pub fn update(&mut self, dt: f32, input: &FrameInput) -> Vec<GameEvent> {
        match self.phase {
            Phase::Menu => {
                let clicked = input
                    .click
                    .is_some_and(|p| self.start_button().contains(p));
                if clicked || input.confirm {
                    self.start_run();
                }
                Vec::new()
            }
            Phase::Playing => {
                if input.escape {
                    log::info!("Run abandoned at score {}", self.state.score);
                    self.phase = Phase::Menu;
                    return Vec::new();
                }
                self.step(dt, input)
            }
            Phase::GameOver => {
                if input.confirm {
                    self.phase = Phase::Menu;
                }
                Vec::new()
            }
        }
    }

    /// Fixed-step simulation for one frame
    fn step(&mut self, dt: f32, input: &FrameInput) -> Vec<GameEvent> {
        self.pending_jump |= input.jump;
        // A NaN would poison the accumulator for the rest of the session
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut tick_input = TickInput {
            left: input.left,
            right: input.right,
            jump: self.pending_jump,
            autopilot: input.autopilot,
        };

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &tick_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            tick_input.jump = false;
            self.pending_jump = false;

            events.extend(self.state.take_events());
            if self.state.over {
                self.finish_run();
                break;
            }
        }

        // Drop backlog we couldn't simulate
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        events
    }

    /// Record the finished run and show the game-over screen
    fn finish_run(&mut self) {
        let previous_best = self.high_scores.best();
        let entry = HighScoreEntry {
            score: self.state.score,
            platforms_hit: self.state.player.platforms_hit,
            ticks: self.state.time_ticks,
        };

        self.last_rank = self.high_scores.add_score(entry);
        self.last_run_new_best = entry.score > previous_best;
        if self.last_run_new_best {
            log::info!("New high score: {} (was {})", entry.score, previous_best);
        }
        self.accumulator = 0.0;
        self.phase = Phase::GameOver;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirm() -> FrameInput {
        FrameInput {
            confirm: true,
            ..Default::default()
        }
    }

    fn click(x: f32, y: f32) -> FrameInput {
        FrameInput {
            click: Some(Vec2::new(x, y)),
            ..Default::default()
        }
    }

    /// Put the running game into free fall so it ends quickly
    fn doom(game: &mut Game, score: u32) {
        game.state.platforms.clear();
        game.state.player.on_ground = false;
        game.state.score = score;
    }

    fn run_until_over(game: &mut Game) {
        for _ in 0..600 {
            game.update(1.0 / 60.0, &FrameInput::default());
            if game.phase() == Phase::GameOver {
                return;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn test_starts_on_menu() {
        let game = Game::new(1);
        assert_eq!(game.phase(), Phase::Menu);
        assert_eq!(game.high_score(), 0);
        assert_eq!(game.runs_started(), 0);
        assert_eq!(game.start_button(), Rect::new(272.0, 300.0, 256.0, 128.0));
    }

    #[test]
    fn test_menu_ignores_time_passing() {
        let mut game = Game::new(1);
        for _ in 0..10 {
            game.update(0.1, &FrameInput { jump: true, ..Default::default() });
        }
        assert_eq!(game.phase(), Phase::Menu);
        assert_eq!(game.state().time_ticks, 0);
    }

    #[test]
    fn test_confirm_starts_run() {
        let mut game = Game::new(1);
        game.update(SIM_DT, &confirm());
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.runs_started(), 1);
        assert_eq!(game.state().seed, 1);
        assert_eq!(game.state().time_ticks, 0);
    }

    #[test]
    fn test_click_on_button() {
        let mut game = Game::new(1);
        // Right edge is exclusive
        game.update(SIM_DT, &click(528.0, 350.0));
        assert_eq!(game.phase(), Phase::Menu);
        game.update(SIM_DT, &click(100.0, 100.0));
        assert_eq!(game.phase(), Phase::Menu);
        // Top-left corner is inside
        game.update(SIM_DT, &click(272.0, 300.0));
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_fixed_substeps() {
        let mut game = Game::new(2);
        game.start_run();

        game.update(0.045, &FrameInput::default());
        assert_eq!(game.state().time_ticks, 5);

        // Long frames are clamped and capped
        game.update(10.0, &FrameInput::default());
        assert_eq!(game.state().time_ticks, 5 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_non_finite_frame_delta_is_ignored() {
        let mut game = Game::new(2);
        game.start_run();

        game.update(f32::NAN, &FrameInput::default());
        game.update(f32::INFINITY, &FrameInput::default());
        assert_eq!(game.state().time_ticks, 0);

        // Later frames still advance the run
        game.update(0.045, &FrameInput::default());
        assert_eq!(game.state().time_ticks, 5);
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            platform_min_gap: 120,
            ..Tuning::default()
        };
        let err = Game::with_tuning(1, tuning).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));

        let tuning = Tuning {
            gravity: 1200.0,
            ..Tuning::default()
        };
        let game = Game::with_tuning(1, tuning).unwrap();
        assert_eq!(game.tuning().gravity, 1200.0);
        assert_eq!(game.state().tuning.gravity, 1200.0);
    }

    #[test]
    fn test_jump_is_latched_and_used_once() {
        let mut game = Game::new(3);
        game.start_run();

        // Too short for a substep: the press is kept
        let events = game.update(0.001, &FrameInput { jump: true, ..Default::default() });
        assert!(events.is_empty());
        assert_eq!(game.state().time_ticks, 0);

        let events = game.update(0.045, &FrameInput::default());
        assert!(game.state().player.vel.y < 0.0);
        let jumps = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Jumped { .. }))
            .count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_escape_abandons_without_recording() {
        let mut game = Game::new(4);
        game.start_run();
        game.state.score = 500;

        game.update(SIM_DT, &FrameInput { escape: true, ..Default::default() });
        assert_eq!(game.phase(), Phase::Menu);
        assert_eq!(game.high_score(), 0);
        assert!(game.high_scores().is_empty());
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut game = Game::new(5);
        game.start_run();
        doom(&mut game, 250);
        run_until_over(&mut game);

        assert_eq!(game.high_score(), 250);
        assert!(game.last_run_new_best());
        assert_eq!(game.last_rank(), Some(1));

        // Frozen until confirmed
        let ticks = game.state().time_ticks;
        game.update(0.1, &FrameInput::default());
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.state().time_ticks, ticks);

        game.update(SIM_DT, &confirm());
        assert_eq!(game.phase(), Phase::Menu);

        // A worse run keeps the old best
        game.update(SIM_DT, &confirm());
        doom(&mut game, 100);
        run_until_over(&mut game);
        assert_eq!(game.high_score(), 250);
        assert!(!game.last_run_new_best());
        assert_eq!(game.last_rank(), Some(2));
    }

    #[test]
    fn test_equal_score_is_not_new_best() {
        let mut game = Game::new(6);
        game.start_run();
        doom(&mut game, 300);
        run_until_over(&mut game);
        game.update(SIM_DT, &confirm());
        game.update(SIM_DT, &confirm());
        doom(&mut game, 300);
        run_until_over(&mut game);

        assert_eq!(game.high_score(), 300);
        assert!(!game.last_run_new_best());
    }

    #[test]
    fn test_each_run_is_reset_and_reseeded() {
        let mut game = Game::new(7);
        game.start_run();
        let first_seed = game.state().seed;
        game.update(0.1, &FrameInput { right: true, ..Default::default() });
        assert!(game.state().time_ticks > 0);

        game.start_run();
        assert_ne!(game.state().seed, first_seed);
        assert_eq!(game.state().time_ticks, 0);
        assert_eq!(game.state().score, 0);
        assert!(game.state().player.on_ground);

        // Same session seed, same run seeds
        let mut other = Game::new(7);
        other.start_run();
        other.start_run();
        assert_eq!(other.state().seed, game.state().seed);
    }
}
