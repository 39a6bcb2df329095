//! Axis-aligned rectangle geometry for bricks and the paddle
//!
//! Field coordinates put the origin at the top-left corner with y growing
//! downward, so `min` is the top-left corner of a rectangle.

use glam::Vec2;

/// An axis-aligned rectangle in field space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict containment: points on the border are outside.
    ///
    /// Brick and paddle hits both use open intervals, so a ball centred
    /// exactly on an edge does not register.
    pub fn contains_open(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x > self.min.x && point.x < max.x && point.y > self.min.y && point.y < max.y
    }

    /// Open containment on the x axis only
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x > self.min.x && x < self.min.x + self.size.x
    }

    /// Open containment on the y axis only
    #[inline]
    pub fn spans_y(&self, y: f32) -> bool {
        y > self.min.y && y < self.min.y + self.size.y
    }
}
