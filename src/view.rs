//! Per-frame data for an external renderer
//!
//! The crate never draws. `RenderFrame::build` snapshots a `Game` into plain,
//! serializable data: world sprites in camera space, parallax background
//! tiles, HUD text and the menu / game-over overlays. Every sprite carries a
//! fallback color so a host with missing textures can still draw rectangles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::game::{Game, Phase};
use crate::sim::{Camera, GameState, PlatformKind, PlayerState, Rect};
use crate::tuning::Tuning;

/// Background scroll rate relative to the camera
pub const PARALLAX_FACTOR: f32 = 0.2;

pub const TITLE: &str = "SKY HOP";
pub const MENU_HINT: &str = "Use A/D to move and SPACE to jump";
pub const GAME_OVER_TITLE: &str = "YOU FELL!";
pub const GAME_OVER_HINT: &str = "Press ENTER to return to the menu";
pub const HUD_MENU_HINT: &str = "ESC: Menu";

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const GREEN: Rgba = Rgba([0, 228, 48, 255]);
    pub const BLUE: Rgba = Rgba([0, 121, 241, 255]);
    pub const RED: Rgba = Rgba([230, 41, 55, 255]);
    pub const BROWN: Rgba = Rgba([127, 106, 79, 255]);
    pub const DARK_BROWN: Rgba = Rgba([76, 63, 47, 255]);
    pub const BEIGE: Rgba = Rgba([211, 176, 131, 255]);
}

/// Solid color for the player when its sprite sheet is missing
pub fn player_fallback_color(state: PlayerState) -> Rgba {
    match state {
        PlayerState::Idle => Rgba::GREEN,
        PlayerState::Walking => Rgba::BLUE,
        PlayerState::Jumping => Rgba::RED,
    }
}

/// Solid color for a platform when its texture is missing
pub fn platform_fallback_color(kind: PlatformKind) -> Rgba {
    match kind {
        PlatformKind::Grass => Rgba::BROWN,
        PlatformKind::Stone => Rgba::DARK_BROWN,
        PlatformKind::Wood => Rgba::BEIGE,
    }
}

/// Source rectangle of animation frame `frame` in a horizontal strip.
/// Facing left mirrors the frame with a negative width.
pub fn sprite_source(frame: u32, frame_size: Vec2, facing_right: bool) -> Rect {
    let k = frame as f32;
    if facing_right {
        Rect::new(k * frame_size.x, 0.0, frame_size.x, frame_size.y)
    } else {
        Rect::new((k + 1.0) * frame_size.x, 0.0, -frame_size.x, frame_size.y)
    }
}

/// Starting offset of a wrapped, scrolled tile row/column (always <= 0)
fn wrap_offset(scroll: f32, size: f32) -> f32 {
    let mut offset = (-scroll) % size;
    if offset > 0.0 {
        offset -= size;
    }
    offset
}

/// Top-left corners of the background tiles covering the viewport, scrolled
/// by `factor` of the camera's movement
pub fn parallax_tiles(camera: &Camera, tuning: &Tuning, texture: Vec2, factor: f32) -> Vec<Vec2> {
    if texture.x <= 0.0 || texture.y <= 0.0 {
        return Vec::new();
    }

    let camera_top = camera.visible_top(tuning);
    let offset_y = wrap_offset(camera_top * factor, texture.y);
    let offset_x = wrap_offset(camera.target.x * factor, texture.x);

    let mut tiles = Vec::new();
    let mut y = (offset_y - texture.y).trunc();
    while y < tuning.screen_height {
        let mut x = (offset_x - texture.x).trunc();
        while x < tuning.screen_width {
            tiles.push(Vec2::new(x, y));
            x += texture.x;
        }
        y += texture.y;
    }
    tiles
}

/// Texture sizes the host managed to load; `None` means draw the fallback
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    /// Gameplay background texture size
    pub background: Option<Vec2>,
    /// Size of one player animation frame
    pub player_frame: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSprite {
    pub slot: usize,
    pub rect: Rect,
    pub kind: PlatformKind,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSprite {
    /// Bottom-center anchor in world space
    pub position: Vec2,
    /// Same anchor after the camera transform
    pub screen_position: Vec2,
    pub hitbox: Rect,
    pub facing_right: bool,
    pub state: PlayerState,
    pub frame: u32,
    pub frame_count: u32,
    /// Sprite-sheet source rect, if the frame size is known
    pub source: Option<Rect>,
    pub color: Rgba,
}

/// Everything drawn in world space through the camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub camera: Camera,
    /// Screen-space tile origins; empty without a background texture
    pub background: Vec<Vec2>,
    /// Active platforms in slot order
    pub platforms: Vec<PlatformSprite>,
    pub player: PlayerSprite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuView {
    pub title: String,
    pub start_button: Rect,
    /// Present once a run has scored
    pub high_score: Option<String>,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverView {
    pub title: String,
    pub score: String,
    pub high_score: Option<String>,
    pub new_best: bool,
    pub hint: String,
}

/// Snapshot handed to the renderer once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub phase: Phase,
    /// Gameplay and game-over screens draw the world
    pub world: Option<WorldView>,
    /// HUD lines, top-left first; empty outside gameplay
    pub hud: Vec<String>,
    pub menu: Option<MenuView>,
    pub game_over: Option<GameOverView>,
}

fn high_score_line(high_score: u32) -> Option<String> {
    (high_score > 0).then(|| format!("High Score: {}", high_score))
}

/// HUD text for a run in progress
pub fn hud_lines(state: &GameState) -> Vec<String> {
    vec![
        format!("Platforms: {}", state.score),
        format!("Speed: {:.1}x", state.game_speed),
        HUD_MENU_HINT.to_string(),
    ]
}

impl WorldView {
    pub fn build(state: &GameState, assets: &Assets) -> Self {
        let background = assets
            .background
            .map(|size| parallax_tiles(&state.camera, &state.tuning, size, PARALLAX_FACTOR))
            .unwrap_or_default();

        let platforms = state
            .platforms
            .active()
            .map(|(slot, p)| PlatformSprite {
                slot,
                rect: p.rect,
                kind: p.kind,
                color: platform_fallback_color(p.kind),
            })
            .collect();

        let player = &state.player;
        let anim = player.animations.for_state(player.state);
        let player = PlayerSprite {
            position: player.pos,
            screen_position: state.camera.world_to_screen(player.pos),
            hitbox: player.hitbox,
            facing_right: player.facing_right,
            state: player.state,
            frame: anim.current_frame,
            frame_count: anim.frames,
            source: assets
                .player_frame
                .map(|size| sprite_source(anim.current_frame, size, player.facing_right)),
            color: player_fallback_color(player.state),
        };

        Self {
            camera: state.camera,
            background,
            platforms,
            player,
        }
    }
}

impl RenderFrame {
    pub fn build(game: &Game, assets: &Assets) -> Self {
        let phase = game.phase();
        let high_score = game.high_score();
        match phase {
            Phase::Menu => Self {
                phase,
                world: None,
                hud: Vec::new(),
                menu: Some(MenuView {
                    title: TITLE.to_string(),
                    start_button: game.start_button(),
                    high_score: high_score_line(high_score),
                    hint: MENU_HINT.to_string(),
                }),
                game_over: None,
            },
            Phase::Playing => Self {
                phase,
                world: Some(WorldView::build(game.state(), assets)),
                hud: hud_lines(game.state()),
                menu: None,
                game_over: None,
            },
            Phase::GameOver => Self {
                phase,
                world: Some(WorldView::build(game.state(), assets)),
                hud: Vec::new(),
                menu: None,
                game_over: Some(GameOverView {
                    title: GAME_OVER_TITLE.to_string(),
                    score: format!("Platforms: {}", game.state().score),
                    high_score: high_score_line(high_score),
                    new_best: game.last_run_new_best(),
                    hint: GAME_OVER_HINT.to_string(),
                }),
            },
        }
    }
}
