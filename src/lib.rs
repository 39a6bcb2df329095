//! Breakout - A classic brick-breaking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Sound cues and procedural sound synthesis
//! - `platform`: Input latching between browser events and simulation frames
//! - `persistence`: Key/value storage backends
//! - `runner`: Headless autopilot games
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one 60 Hz animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play field dimensions (pixels, y grows downward)
    pub const FIELD_WIDTH: f32 = 480.0;
    pub const FIELD_HEIGHT: f32 = 720.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Vertical launch speed after a reset (pixels per frame, upward)
    pub const BALL_RESET_SPEED: f32 = 3.0;
    /// Reset dx is drawn uniformly from [-BALL_RESET_SPREAD, BALL_RESET_SPREAD)
    pub const BALL_RESET_SPREAD: f32 = 3.0;
    /// Reset height above the bottom of the field
    pub const BALL_RESET_LIFT: f32 = 60.0;
    /// Per-axis speed cap; stays below brick height so first-hit-wins holds
    pub const BALL_MAX_SPEED: f32 = 12.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 90.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    pub const PADDLE_Y: f32 = 690.0;
    /// Incremental control step (pixels per frame at full deflection)
    pub const PADDLE_STEP: f32 = 7.0;
    /// Speed multiplier on paddle bounce
    pub const PADDLE_RESTITUTION: f32 = 1.1;
    /// Lateral speed per pixel of offset from paddle center
    pub const PADDLE_ENGLISH: f32 = 0.1;

    /// Brick grid layout
    pub const BRICK_ROWS: usize = 8;
    pub const BRICK_COLS: usize = 7;
    pub const BRICK_WIDTH: f32 = 57.0;
    pub const BRICK_HEIGHT: f32 = 16.0;
    pub const BRICK_OFFSET_X: f32 = 10.0;
    pub const BRICK_OFFSET_Y: f32 = 90.0;
    pub const BRICK_PADDING_X: f32 = 10.0;
    pub const BRICK_PADDING_Y: f32 = 7.0;

    /// Lives at the start of every game
    pub const STARTING_LIVES: u8 = 3;
}

/// Clamp a paddle's left edge so the whole paddle stays inside the field
#[inline]
pub fn clamp_span(left: f32, width: f32, field_width: f32) -> f32 {
    left.clamp(0.0, (field_width - width).max(0.0))
}

/// Clamp each velocity component to `[-max, max]`
#[inline]
pub fn clamp_velocity(vel: Vec2, max: f32) -> Vec2 {
    vel.clamp(Vec2::splat(-max), Vec2::splat(max))
}
