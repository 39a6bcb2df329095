//! Collision detection and response for the play field
//!
//! Everything is axis-aligned and the ball is treated as a point for brick
//! and paddle overlap. Walls use the ball's radius and a one-frame lookahead
//! so a fast ball reflects before it can overshoot the boundary.

use glam::Vec2;

use super::state::Paddle;
use crate::clamp_velocity;

/// Which boundaries the ball's next position would cross
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Left or right wall
    pub side: bool,
    /// Ceiling
    pub top: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.side || self.top
    }
}

/// Predict wall contact from the next-frame position `pos + vel`
pub fn wall_lookahead(pos: Vec2, vel: Vec2, radius: f32, field_width: f32) -> WallContact {
    let next = pos + vel;
    WallContact {
        side: next.x > field_width - radius || next.x < radius,
        top: next.y < radius,
    }
}

/// Reflect velocity off whichever walls were contacted.
///
/// Each axis flips at most once no matter how far past the wall the
/// lookahead position lies.
#[inline]
pub fn reflect_walls(vel: Vec2, contact: WallContact) -> Vec2 {
    Vec2::new(
        if contact.side { -vel.x } else { vel.x },
        if contact.top { -vel.y } else { vel.y },
    )
}

/// Check whether the ball sits inside the paddle's band while falling onto it
pub fn paddle_contact(pos: Vec2, vel: Vec2, paddle: &Paddle) -> bool {
    let rect = paddle.rect();
    vel.y > 0.0 && rect.spans_y(pos.y) && rect.spans_x(pos.x)
}

/// Result of a paddle bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rebound {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Bounce the ball off the paddle.
///
/// The ball is lifted to rest on the paddle top, vertical speed is inverted
/// and scaled by `restitution`, and horizontal speed is replaced by
/// "english" proportional to the offset from the paddle center.
pub fn paddle_rebound(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    paddle: &Paddle,
    restitution: f32,
    english: f32,
    max_speed: f32,
) -> Rebound {
    let offset = pos.x - paddle.center_x();
    let vel = Vec2::new(offset * english, -vel.y * restitution);
    Rebound {
        pos: Vec2::new(pos.x, paddle.y - radius),
        vel: clamp_velocity(vel, max_speed),
    }
}

/// Check if the ball's next position drops below the bottom of the field
pub fn crosses_floor(pos: Vec2, vel: Vec2, radius: f32, field_height: f32) -> bool {
    pos.y + vel.y > field_height - radius
}

/// Reflect vertical velocity after a brick hit
#[inline]
pub fn reflect_brick(vel: Vec2) -> Vec2 {
    Vec2::new(vel.x, -vel.y)
}
