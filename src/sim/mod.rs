//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are pixels per frame)
//! - Seeded RNG only
//! - Stable iteration order (row-major brick scan)
//! - No rendering or platform dependencies

pub mod collision;
pub mod control;
pub mod rect;
pub mod state;
pub mod tick;

pub use control::{ControlScheme, PaddleCommand, drive_paddle};
pub use rect::Rect;
pub use state::{
    Ball, BallState, Brick, BrickGrid, BrickStatus, GameEvent, GamePhase, GameState, Paddle,
};
pub use tick::{TickInput, tick};
