//! Collision response for axis-aligned bodies
//!
//! Detection lives in [`super::rect::classify`]; this module turns a detected
//! contact into velocity and position changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::{GeometryError, Rect, Side, positive};

/// Play field bounds, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Like [`Field::new`], but rejects non-positive or NaN sizes
    pub fn checked(width: f32, height: f32) -> Result<Self, GeometryError> {
        Ok(Self {
            width: positive("field width", width)?,
            height: positive("field height", height)?,
        })
    }
}

/// Walls struck during one wall check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top
    }
}

/// Keep a ball inside the left, right and top walls.
///
/// A wall hit clamps the rectangle back onto the wall and inverts the
/// matching velocity component. The bottom edge is open: a ball crossing it
/// keeps going so the match can count it as lost.
pub fn bounce_off_walls(rect: &mut Rect, vel: &mut Vec2, field: Field) -> WallHits {
    let mut hits = WallHits::default();

    if rect.left() < 0.0 {
        rect.x = 0.0;
        vel.x = -vel.x;
        hits.left = true;
    } else if rect.right() > field.width {
        rect.x = field.width - rect.w;
        vel.x = -vel.x;
        hits.right = true;
    }

    if rect.top() < 0.0 {
        rect.y = 0.0;
        vel.y = -vel.y;
        hits.top = true;
    }

    hits
}

/// Ball has fully left the field through the bottom edge
#[inline]
pub fn is_below_field(rect: &Rect, field: Field) -> bool {
    rect.top() > field.height
}

/// Invert the velocity component matching the struck side
#[inline]
pub fn reflect(vel: Vec2, side: Side) -> Vec2 {
    if side.is_vertical() {
        Vec2::new(vel.x, -vel.y)
    } else {
        Vec2::new(-vel.x, vel.y)
    }
}

/// Normalized horizontal offset of the ball from the paddle center.
///
/// Roughly -1 at the paddle's left tip, +1 at its right tip. Magnitudes below
/// `min_impact` are raised to it (keeping the offset's sign, `+0.0` counts as
/// positive) so dead-center hits still angle the ball.
pub fn impact_factor(ball: &Rect, paddle: &Rect, min_impact: f32) -> f32 {
    let dx = ball.center().x - paddle.center().x;
    let half_width = (ball.w + paddle.w) / 2.0;
    let impact = (dx / half_width).clamp(-1.0, 1.0);

    if impact.abs() < min_impact {
        min_impact.copysign(impact)
    } else {
        impact
    }
}
