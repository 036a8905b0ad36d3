//! Browser bridge
//!
//! Exposes `Game` to a JavaScript renderer. The page calls `frame` from its
//! `requestAnimationFrame` loop and draws the returned `RenderFrame` JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::game::{FrameInput, Game, Phase};
use crate::view::{Assets, RenderFrame};

/// Input bit flags for `WebGame::frame`
pub const INPUT_LEFT: u32 = 1 << 0;
pub const INPUT_RIGHT: u32 = 1 << 1;
pub const INPUT_JUMP: u32 = 1 << 2;
pub const INPUT_ESCAPE: u32 = 1 << 3;
pub const INPUT_CONFIRM: u32 = 1 << 4;
pub const INPUT_AUTOPILOT: u32 = 1 << 5;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Sky Hop starting...");
}

/// Decode the packed key bits plus mouse state into a frame's input
fn decode_input(keys: u32, cursor_x: f32, cursor_y: f32, clicked: bool) -> FrameInput {
    FrameInput {
        left: keys & INPUT_LEFT != 0,
        right: keys & INPUT_RIGHT != 0,
        jump: keys & INPUT_JUMP != 0,
        escape: keys & INPUT_ESCAPE != 0,
        confirm: keys & INPUT_CONFIRM != 0,
        click: clicked.then(|| Vec2::new(cursor_x, cursor_y)),
        autopilot: keys & INPUT_AUTOPILOT != 0,
    }
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    assets: Assets,
}

#[wasm_bindgen]
impl WebGame {
    /// New session; a zero seed picks one from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WebGame {
        let seed = if seed == 0 { js_sys::Date::now() as u64 } else { seed };
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            game: Game::new(seed),
            assets: Assets::default(),
        }
    }

    /// Report the loaded background texture size (enables parallax tiles)
    pub fn set_background_size(&mut self, width: f32, height: f32) {
        self.assets.background = Some(Vec2::new(width, height));
    }

    /// Report the player sprite frame size (enables source rects)
    pub fn set_player_frame_size(&mut self, width: f32, height: f32) {
        self.assets.player_frame = Some(Vec2::new(width, height));
    }

    /// Advance one rendered frame and return the `RenderFrame` as JSON
    pub fn frame(
        &mut self,
        dt: f32,
        keys: u32,
        cursor_x: f32,
        cursor_y: f32,
        clicked: bool,
    ) -> Result<String, JsValue> {
        let input = decode_input(keys, cursor_x, cursor_y, clicked);
        self.game.update(dt, &input);
        serde_json::to_string(&RenderFrame::build(&self.game, &self.assets))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn phase(&self) -> String {
        match self.game.phase() {
            Phase::Menu => "menu",
            Phase::Playing => "playing",
            Phase::GameOver => "game_over",
        }
        .to_string()
    }

    pub fn high_score(&self) -> u32 {
        self.game.high_score()
    }
}
