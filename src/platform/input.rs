//! Latched input state

use crate::sim::{ControlScheme, PaddleCommand, TickInput};

/// Logical keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Start,
    Autopilot,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Enter" => Some(Key::Start),
            "i" | "I" => Some(Key::Autopilot),
            _ => None,
        }
    }
}

/// Input state written by event handlers, read once per frame
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    /// Last pointer position in field coordinates
    pointer_x: Option<f32>,
    left: bool,
    right: bool,
    /// Gamepad stick x after the dead zone
    gamepad_axis: f32,
    gamepad_start: bool,
    /// One-shot start trigger, cleared on sample
    start: bool,
    autopilot: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_moved(&mut self, field_x: f32) {
        self.pointer_x = Some(field_x);
    }

    /// Pointer left the canvas
    pub fn pointer_left(&mut self) {
        self.pointer_x = None;
    }

    /// Click or tap
    pub fn click(&mut self) {
        self.start = true;
    }

    /// Returns true if the key was consumed
    pub fn key_down(&mut self, key: Key) -> bool {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Start => self.start = true,
            Key::Autopilot => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
        }
        true
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Start | Key::Autopilot => {}
        }
    }

    /// Update the polled gamepad state
    pub fn set_gamepad(&mut self, axis: f32, start_pressed: bool, dead_zone: f32) {
        self.gamepad_axis = if axis.abs() < dead_zone || !axis.is_finite() {
            0.0
        } else {
            axis.clamp(-1.0, 1.0)
        };
        // Edge-triggered: holding the button does not restart every frame
        if start_pressed && !self.gamepad_start {
            self.start = true;
        }
        self.gamepad_start = start_pressed;
    }

    /// Drop held keys (e.g. on window blur, where key-up events are lost)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.gamepad_axis = 0.0;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Directional axis from keys and gamepad, in [-1, 1]
    fn axis(&self) -> f32 {
        let keys = match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        (keys + self.gamepad_axis).clamp(-1.0, 1.0)
    }

    /// Produce this frame's input and clear one-shot triggers
    pub fn sample(&mut self, scheme: ControlScheme) -> TickInput {
        let paddle = match scheme {
            ControlScheme::Absolute => self
                .pointer_x
                .map(PaddleCommand::MoveTo)
                .unwrap_or(PaddleCommand::Hold),
            ControlScheme::Incremental => {
                let axis = self.axis();
                if axis == 0.0 {
                    PaddleCommand::Hold
                } else {
                    PaddleCommand::Step(axis)
                }
            }
        };
        let input = TickInput {
            paddle,
            start: self.start,
            autopilot: self.autopilot,
        };
        self.start = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_one_shot() {
        let mut latch = InputLatch::new();
        latch.click();
        assert!(latch.sample(ControlScheme::Absolute).start);
        assert!(!latch.sample(ControlScheme::Absolute).start);
    }

    #[test]
    fn test_absolute_uses_last_pointer() {
        let mut latch = InputLatch::new();
        assert_eq!(
            latch.sample(ControlScheme::Absolute).paddle,
            PaddleCommand::Hold
        );
        latch.pointer_moved(100.0);
        latch.pointer_moved(120.0);
        assert_eq!(
            latch.sample(ControlScheme::Absolute).paddle,
            PaddleCommand::MoveTo(120.0)
        );
        // Pointer position stays latched between events
        assert_eq!(
            latch.sample(ControlScheme::Absolute).paddle,
            PaddleCommand::MoveTo(120.0)
        );
        latch.pointer_left();
        assert_eq!(
            latch.sample(ControlScheme::Absolute).paddle,
            PaddleCommand::Hold
        );
    }

    #[test]
    fn test_incremental_keys() {
        let mut latch = InputLatch::new();
        latch.key_down(Key::Left);
        assert_eq!(
            latch.sample(ControlScheme::Incremental).paddle,
            PaddleCommand::Step(-1.0)
        );
        latch.key_down(Key::Right);
        // Both held cancel out
        assert_eq!(
            latch.sample(ControlScheme::Incremental).paddle,
            PaddleCommand::Hold
        );
        latch.key_up(Key::Left);
        assert_eq!(
            latch.sample(ControlScheme::Incremental).paddle,
            PaddleCommand::Step(1.0)
        );
    }

    #[test]
    fn test_gamepad_dead_zone_and_edge_trigger() {
        let mut latch = InputLatch::new();
        latch.set_gamepad(0.1, false, 0.15);
        assert_eq!(
            latch.sample(ControlScheme::Incremental).paddle,
            PaddleCommand::Hold
        );

        latch.set_gamepad(0.5, true, 0.15);
        let input = latch.sample(ControlScheme::Incremental);
        assert_eq!(input.paddle, PaddleCommand::Step(0.5));
        assert!(input.start);

        // Still held: no new trigger
        latch.set_gamepad(0.5, true, 0.15);
        assert!(!latch.sample(ControlScheme::Incremental).start);
    }

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom(" "), Some(Key::Start));
        assert_eq!(Key::from_dom("Escape"), None);

        let mut latch = InputLatch::new();
        latch.key_down(Key::Autopilot);
        assert!(latch.sample(ControlScheme::Absolute).autopilot);
    }

    #[test]
    fn test_release_all() {
        let mut latch = InputLatch::new();
        latch.key_down(Key::Right);
        latch.set_gamepad(0.9, false, 0.15);
        latch.release_all();
        assert_eq!(
            latch.sample(ControlScheme::Incremental).paddle,
            PaddleCommand::Hold
        );
    }
}
