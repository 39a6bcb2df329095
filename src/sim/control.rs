//! Paddle controller
//!
//! Two control schemes drive the paddle: absolute (the paddle centre follows
//! the pointer) and incremental (keys or a gamepad stick push the paddle a
//! fixed step per frame). Either way the paddle never leaves the field.

use serde::{Deserialize, Serialize};

use super::state::Paddle;
use crate::tuning::Tuning;

/// How player input maps to paddle movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlScheme {
    /// Paddle snaps to the pointer x
    #[default]
    Absolute,
    /// Directional input moves the paddle by a fixed step per frame
    Incremental,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::Absolute => "absolute",
            ControlScheme::Incremental => "incremental",
        }
    }
}

/// One frame's paddle instruction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PaddleCommand {
    /// Leave the paddle where it is
    #[default]
    Hold,
    /// Center the paddle on this field x
    MoveTo(f32),
    /// Move by `axis * paddle_step`, axis in [-1, 1]
    Step(f32),
}

/// Apply a command to the paddle
pub fn drive_paddle(paddle: &mut Paddle, command: PaddleCommand, tuning: &Tuning) {
    match command {
        PaddleCommand::Hold => {}
        PaddleCommand::MoveTo(x) => {
            // Pointer positions outside the field are ignored
            if x > 0.0 && x < tuning.field_width {
                paddle.center_on(x, tuning.field_width);
            }
        }
        PaddleCommand::Step(axis) => {
            if axis.is_finite() {
                let axis = axis.clamp(-1.0, 1.0);
                paddle.nudge(axis * tuning.paddle_step, tuning.field_width);
            }
        }
    }
}
