//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a run can be
//! re-tuned from a JSON file without a rebuild. Defaults match `consts`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Error loading or validating a tuning file
#[derive(Debug)]
pub enum TuningError {
    /// File could not be read
    Io(String),
    /// File is not valid tuning JSON
    Parse(String),
    /// Values parsed but are unusable
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(msg) => write!(f, "I/O error: {}", msg),
            TuningError::Parse(msg) => write!(f, "Parse error: {}", msg),
            TuningError::Invalid(msg) => write!(f, "Invalid tuning: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e.to_string())
    }
}

/// Game balance knobs (pixels, seconds; y grows downward)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Player ===
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative = up)
    pub jump_velocity: f32,
    pub player_speed: f32,
    pub max_fall_speed: f32,

    // === Platforms ===
    pub platform_min_gap: i32,
    pub platform_max_gap: i32,
    pub max_horizontal_gap: i32,
    pub platform_min_width: i32,
    pub platform_max_width: i32,
    pub platform_edge_margin: f32,

    // === Difficulty ===
    pub speed_per_point: f32,
    pub max_game_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            player_speed: PLAYER_SPEED,
            max_fall_speed: MAX_FALL_SPEED,

            platform_min_gap: PLATFORM_MIN_GAP,
            platform_max_gap: PLATFORM_MAX_GAP,
            max_horizontal_gap: MAX_HORIZONTAL_GAP,
            platform_min_width: PLATFORM_MIN_WIDTH,
            platform_max_width: PLATFORM_MAX_WIDTH,
            platform_edge_margin: PLATFORM_EDGE_MARGIN,

            speed_per_point: SPEED_PER_POINT,
            max_game_speed: MAX_GAME_SPEED,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string (missing keys use defaults)
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the defaults as a template)
    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| Err(TuningError::Invalid(msg));

        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return invalid(format!(
                "screen must be positive, got {}x{}",
                self.screen_width, self.screen_height
            ));
        }
        if !(self.gravity > 0.0) {
            return invalid(format!("gravity must be positive, got {}", self.gravity));
        }
        if !(self.jump_velocity < 0.0) {
            return invalid(format!(
                "jump_velocity must be negative (upward), got {}",
                self.jump_velocity
            ));
        }
        if !(self.player_speed >= 0.0) {
            return invalid(format!(
                "player_speed must be non-negative, got {}",
                self.player_speed
            ));
        }
        if !(self.max_fall_speed > 0.0) {
            return invalid(format!(
                "max_fall_speed must be positive, got {}",
                self.max_fall_speed
            ));
        }
        if self.platform_min_gap < 0 || self.platform_min_gap > self.platform_max_gap {
            return invalid(format!(
                "platform gap range [{}, {}] is not ordered and non-negative",
                self.platform_min_gap, self.platform_max_gap
            ));
        }
        if self.max_horizontal_gap < 0 {
            return invalid(format!(
                "max_horizontal_gap must be non-negative, got {}",
                self.max_horizontal_gap
            ));
        }
        if self.platform_min_width <= 0 || self.platform_min_width > self.platform_max_width {
            return invalid(format!(
                "platform width range [{}, {}] is not ordered and positive",
                self.platform_min_width, self.platform_max_width
            ));
        }
        if !(self.platform_edge_margin >= 0.0
            && self.platform_edge_margin * 2.0 < self.screen_width)
        {
            return invalid(format!(
                "platform_edge_margin {} does not fit a {}px wide screen",
                self.platform_edge_margin, self.screen_width
            ));
        }
        if !(self.speed_per_point >= 0.0) {
            return invalid(format!(
                "speed_per_point must be non-negative, got {}",
                self.speed_per_point
            ));
        }
        if !(self.max_game_speed >= 1.0) {
            return invalid(format!(
                "max_game_speed must be at least 1.0, got {}",
                self.max_game_speed
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.screen_width / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.screen_height / 2.0
    }

    /// Lowest and highest x a platform center may take
    #[inline]
    pub fn platform_x_bounds(&self) -> (f32, f32) {
        (
            self.platform_edge_margin,
            self.screen_width - self.platform_edge_margin,
        )
    }

    /// Game speed multiplier for a score under this tuning
    #[inline]
    pub fn speed_for_score(&self, score: u32) -> f32 {
        crate::speed_for_score(score, self.speed_per_point, self.max_game_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.platform_x_bounds(), (50.0, 750.0));
        assert_eq!(tuning.half_height(), 300.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "gravity": 1200.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 1200.0);
        assert_eq!(tuning.jump_velocity, JUMP_VELOCITY);
        assert_eq!(tuning.screen_width, SCREEN_WIDTH);
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let json = Tuning::default().to_json_pretty().unwrap();
        assert_eq!(Tuning::from_json_str(&json).unwrap(), Tuning::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json_str(r#"{ "platform_min_gap": 120 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));

        let err = Tuning::from_json_str(r#"{ "jump_velocity": 450.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));

        let err = Tuning::from_json_str(r#"{ "platform_edge_margin": 400.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));

        let err = Tuning::from_json_str(r#"{ "max_game_speed": 0.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json_str("{ gravity: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
