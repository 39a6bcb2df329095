//! Mapping between the play field and the canvas
//!
//! The field keeps its aspect ratio and is centered in the canvas; the
//! leftover space is letterboxed.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas size in pixels
    pub canvas: Vec2,
    /// Field size in field units
    pub field: Vec2,
}

impl Viewport {
    pub fn new(canvas_width: f32, canvas_height: f32, field: Vec2) -> Self {
        Self {
            canvas: Vec2::new(canvas_width.max(1.0), canvas_height.max(1.0)),
            field,
        }
    }

    /// Canvas pixels per field unit
    pub fn scale(&self) -> f32 {
        (self.canvas.x / self.field.x).min(self.canvas.y / self.field.y)
    }

    /// Canvas-pixel offset of the field's top-left corner
    pub fn offset(&self) -> Vec2 {
        (self.canvas - self.field * self.scale()) * 0.5
    }

    /// Field coordinates (y down) to normalized device coordinates (y up)
    pub fn field_to_ndc(&self, p: Vec2) -> Vec2 {
        let px = self.offset() + p * self.scale();
        Vec2::new(px.x / self.canvas.x * 2.0 - 1.0, 1.0 - px.y / self.canvas.y * 2.0)
    }

    /// Canvas pixel position to field coordinates
    pub fn canvas_to_field(&self, px: Vec2) -> Vec2 {
        (px - self.offset()) / self.scale()
    }
}
