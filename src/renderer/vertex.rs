//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements, as 0xRRGGBB sRGB
pub mod colors {
    pub const BACKGROUND: u32 = 0x222733;
    pub const FOREGROUND: u32 = 0xffffff;
    pub const LIFE_SPENT: u32 = 0x4e525c;
    /// Brick colors, one per pair of rows (top to bottom)
    pub const BRICKS: [u32; 4] = [0x700f16, 0x81161d, 0x911d25, 0xa52730];

    /// Brick color for a grid row
    pub fn brick(row: usize) -> u32 {
        BRICKS[(row / 2).min(BRICKS.len() - 1)]
    }

    fn srgb_to_linear(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    /// Linear RGBA for an sRGB surface
    pub fn linear(hex: u32) -> [f32; 4] {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        [channel(16), channel(8), channel(0), 1.0]
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_brick_rows_share_colors_in_pairs() {
            assert_eq!(brick(0), brick(1));
            assert_ne!(brick(1), brick(2));
            assert_eq!(brick(7), 0xa52730);
            // Extra rows from custom tuning reuse the last color
            assert_eq!(brick(12), 0xa52730);
        }

        #[test]
        fn test_linear_endpoints() {
            assert_eq!(linear(0xffffff), [1.0, 1.0, 1.0, 1.0]);
            assert_eq!(linear(0x000000), [0.0, 0.0, 0.0, 1.0]);
            let bg = linear(BACKGROUND);
            assert!(bg[2] > bg[0]);
        }
    }
}
