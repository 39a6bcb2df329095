//! Data-driven game balance
//!
//! Every numeric rule of the simulation lives in [`Tuning`]. The defaults are
//! the classic layout from [`crate::consts`]; a JSON file can override any
//! subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Upper bound on grid rows and columns
const MAX_GRID_SIDE: usize = 64;
/// Bricks and the paddle are at least this tall
const MIN_SOLID_HEIGHT: f32 = 2.0;

/// Numeric rules for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,

    pub ball_radius: f32,
    pub ball_reset_speed: f32,
    pub ball_reset_spread: f32,
    pub ball_reset_lift: f32,
    pub ball_max_speed: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_y: f32,
    pub paddle_step: f32,
    pub restitution: f32,
    pub english: f32,

    pub rows: usize,
    pub cols: usize,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_offset_x: f32,
    pub brick_offset_y: f32,
    pub brick_padding_x: f32,
    pub brick_padding_y: f32,

    pub starting_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_reset_speed: BALL_RESET_SPEED,
            ball_reset_spread: BALL_RESET_SPREAD,
            ball_reset_lift: BALL_RESET_LIFT,
            ball_max_speed: BALL_MAX_SPEED,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_y: PADDLE_Y,
            paddle_step: PADDLE_STEP,
            restitution: PADDLE_RESTITUTION,
            english: PADDLE_ENGLISH,

            rows: BRICK_ROWS,
            cols: BRICK_COLS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_offset_x: BRICK_OFFSET_X,
            brick_offset_y: BRICK_OFFSET_Y,
            brick_padding_x: BRICK_PADDING_X,
            brick_padding_y: BRICK_PADDING_Y,

            starting_lives: STARTING_LIVES,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Total number of bricks in a fresh grid
    pub fn brick_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Where a respawned ball appears
    pub fn reset_position(&self) -> glam::Vec2 {
        glam::Vec2::new(
            self.field_width / 2.0,
            self.field_height - self.ball_reset_lift,
        )
    }

    /// Clamp values that would otherwise produce a degenerate game.
    ///
    /// Non-finite numbers fall back to their defaults. The grid always holds
    /// at least one brick. The ball can never cover a brick or the paddle in a
    /// single frame.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (value, fallback) in [
            (&mut self.field_width, defaults.field_width),
            (&mut self.field_height, defaults.field_height),
            (&mut self.ball_radius, defaults.ball_radius),
            (&mut self.ball_reset_speed, defaults.ball_reset_speed),
            (&mut self.ball_reset_spread, defaults.ball_reset_spread),
            (&mut self.ball_reset_lift, defaults.ball_reset_lift),
            (&mut self.ball_max_speed, defaults.ball_max_speed),
            (&mut self.paddle_width, defaults.paddle_width),
            (&mut self.paddle_height, defaults.paddle_height),
            (&mut self.paddle_y, defaults.paddle_y),
            (&mut self.paddle_step, defaults.paddle_step),
            (&mut self.restitution, defaults.restitution),
            (&mut self.english, defaults.english),
            (&mut self.brick_width, defaults.brick_width),
            (&mut self.brick_height, defaults.brick_height),
            (&mut self.brick_offset_x, defaults.brick_offset_x),
            (&mut self.brick_offset_y, defaults.brick_offset_y),
            (&mut self.brick_padding_x, defaults.brick_padding_x),
            (&mut self.brick_padding_y, defaults.brick_padding_y),
        ] {
            if !value.is_finite() {
                *value = fallback;
            }
        }

        self.field_width = self.field_width.max(1.0);
        self.field_height = self.field_height.max(1.0);
        self.ball_radius = self.ball_radius.max(0.0);
        self.paddle_width = self.paddle_width.clamp(1.0, self.field_width);
        self.paddle_height = self.paddle_height.max(MIN_SOLID_HEIGHT);
        self.brick_height = self.brick_height.max(MIN_SOLID_HEIGHT);
        self.restitution = self.restitution.max(1.0);

        self.rows = self.rows.clamp(1, MAX_GRID_SIDE);
        self.cols = self.cols.clamp(1, MAX_GRID_SIDE);

        let speed_limit = self.speed_limit();
        self.ball_reset_speed = self.ball_reset_speed.clamp(-speed_limit, speed_limit);
        self.ball_reset_spread = self.ball_reset_spread.abs().min(speed_limit);
        self.ball_max_speed = self
            .ball_max_speed
            .max(self.ball_reset_speed.abs())
            .min(speed_limit);

        self.starting_lives = self.starting_lives.max(1);
        self
    }

    /// Largest per-axis speed that cannot skip past a brick or the paddle
    pub fn speed_limit(&self) -> f32 {
        self.brick_height.min(self.paddle_height) - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    #[test]
    fn test_default_matches_classic_layout() {
        let t = Tuning::default();
        assert_eq!(t.brick_count(), 56);
        assert_eq!(t.starting_lives, 3);
        assert_eq!(t.reset_position(), glam::Vec2::new(240.0, 660.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "rows": 2, "cols": 3 }"#).unwrap();
        assert_eq!(t.brick_count(), 6);
        assert_eq!(t.field_width, FIELD_WIDTH);
        assert_eq!(t.restitution, PADDLE_RESTITUTION);
    }

    #[test]
    fn test_sanitized_rejects_energy_loss() {
        let t = Tuning::from_json(r#"{ "restitution": 0.5, "starting_lives": 0 }"#).unwrap();
        assert_eq!(t.restitution, 1.0);
        assert_eq!(t.starting_lives, 1);
    }

    #[test]
    fn test_sanitized_replaces_non_finite_values() {
        let t = Tuning::from_json(r#"{ "ball_reset_spread": 1e39, "english": -1e39 }"#).unwrap();
        assert_eq!(t.ball_reset_spread, BALL_RESET_SPREAD);
        assert_eq!(t.english, PADDLE_ENGLISH);

        let mut state = GameState::with_tuning(7, t);
        state.start_game();
        assert!(state.ball.vel.is_finite());
    }

    #[test]
    fn test_sanitized_bounds_grid() {
        let t = Tuning::from_json(r#"{ "rows": 4294967296, "cols": 4294967296 }"#).unwrap();
        assert_eq!(t.rows, MAX_GRID_SIDE);
        assert_eq!(t.cols, MAX_GRID_SIDE);
        assert_eq!(t.brick_count(), MAX_GRID_SIDE * MAX_GRID_SIDE);
    }

    #[test]
    fn test_empty_grid_does_not_win_instantly() {
        let t = Tuning::from_json(r#"{ "rows": 0, "cols": 0 }"#).unwrap();
        assert_eq!(t.brick_count(), 1);

        let mut state = GameState::with_tuning(3, t);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        let events = tick(&mut state, &start);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!events.contains(&GameEvent::Win));
    }

    #[test]
    fn test_ball_speed_stays_below_brick_height() {
        let t = Tuning::from_json(r#"{ "ball_max_speed": 40, "ball_reset_speed": 40 }"#).unwrap();
        assert!(t.ball_max_speed < t.brick_height);
        assert!(t.ball_max_speed < t.paddle_height);

        let mut state = GameState::with_tuning(11, t);
        state.start_game();
        assert!(state.ball.vel.y.abs() < state.tuning.brick_height);
        assert!(state.ball.vel.x.abs() < state.tuning.brick_height);
    }

    #[test]
    fn test_defaults_survive_sanitizing() {
        assert_eq!(Tuning::default().sanitized(), Tuning::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ rows: ").is_err());
    }
}
