//! Shape generation for 2D primitives
//!
//! All shapes are triangle lists in field coordinates.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;
use crate::sim::Rect;

/// Corner radius used for bricks, paddle and life markers
pub const CORNER_RADIUS: f32 = 2.0;

fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(3);
    push_triangle(&mut vertices, a, b, c, color);
    vertices
}

/// Filled axis-aligned rectangle
pub fn rect(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let min = r.min;
    let max = r.max();
    push_triangle(&mut vertices, min, Vec2::new(max.x, min.y), max, color);
    push_triangle(&mut vertices, min, max, Vec2::new(min.x, max.y), color);
    vertices
}

/// Filled rectangle with quarter-circle corners
pub fn rounded_rect(r: Rect, radius: f32, color: [f32; 4], corner_segments: u32) -> Vec<Vertex> {
    let radius = radius.min(r.size.x / 2.0).min(r.size.y / 2.0).max(0.0);
    if radius <= 0.0 || corner_segments == 0 {
        return rect(r, color);
    }

    let min = r.min;
    let max = r.max();
    let mut vertices = Vec::with_capacity(18 + 12 * corner_segments as usize);

    let inner_w = r.size.x - 2.0 * radius;
    let inner_h = r.size.y - 2.0 * radius;
    // Center column, full height
    vertices.extend(rect(
        Rect::new(min.x + radius, min.y, inner_w, r.size.y),
        color,
    ));
    // Side strips between the corners
    vertices.extend(rect(Rect::new(min.x, min.y + radius, radius, inner_h), color));
    vertices.extend(rect(
        Rect::new(max.x - radius, min.y + radius, radius, inner_h),
        color,
    ));

    // Corner fans; y grows downward so the top-left corner spans [PI, 1.5 PI]
    let corners = [
        (Vec2::new(min.x + radius, min.y + radius), PI),
        (Vec2::new(max.x - radius, min.y + radius), 1.5 * PI),
        (Vec2::new(max.x - radius, max.y - radius), 0.0),
        (Vec2::new(min.x + radius, max.y - radius), FRAC_PI_2),
    ];
    for (center, start) in corners {
        for i in 0..corner_segments {
            let t1 = start + FRAC_PI_2 * i as f32 / corner_segments as f32;
            let t2 = start + FRAC_PI_2 * (i + 1) as f32 / corner_segments as f32;
            push_triangle(
                &mut vertices,
                center,
                center + radius * Vec2::new(t1.cos(), t1.sin()),
                center + radius * Vec2::new(t2.cos(), t2.sin()),
                color,
            );
        }
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        push_triangle(
            &mut vertices,
            center,
            center + radius * Vec2::new(theta1.cos(), theta1.sin()),
            center + radius * Vec2::new(theta2.cos(), theta2.sin()),
            color,
        );
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        let mut lo = Vec2::splat(f32::MAX);
        let mut hi = Vec2::splat(f32::MIN);
        for v in vertices {
            let p = Vec2::from(v.position);
            lo = lo.min(p);
            hi = hi.max(p);
        }
        (lo, hi)
    }

    #[test]
    fn test_rect_is_two_triangles() {
        let r = Rect::new(10.0, 20.0, 30.0, 5.0);
        let v = rect(r, [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(bounds(&v), (Vec2::new(10.0, 20.0), Vec2::new(40.0, 25.0)));
    }

    #[test]
    fn test_rounded_rect_stays_inside() {
        let r = Rect::new(10.0, 90.0, 57.0, 16.0);
        let v = rounded_rect(r, CORNER_RADIUS, [1.0; 4], 4);
        assert_eq!(v.len() % 3, 0);
        let (lo, hi) = bounds(&v);
        assert!(lo.x >= 10.0 - 1e-4 && lo.y >= 90.0 - 1e-4);
        assert!(hi.x <= 67.0 + 1e-4 && hi.y <= 106.0 + 1e-4);
    }

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::new(5.0, 5.0), 2.0, [1.0; 4], 16);
        assert_eq!(v.len(), 48);
        let (lo, hi) = bounds(&v);
        assert!((lo - Vec2::new(3.0, 3.0)).abs().max_element() < 1e-4);
        assert!((hi - Vec2::new(7.0, 7.0)).abs().max_element() < 1e-4);
    }
}
