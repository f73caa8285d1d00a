//! Axis-aligned rectangle geometry
//!
//! Every entity (ball, paddle, block) is a rectangle in field coordinates:
//! x grows to the right, y grows downward, `(x, y)` is the top-left corner.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A rectangle or field with a size the simulation cannot use
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// Width or height not strictly positive (or NaN)
    NonPositive { what: &'static str, value: f32 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { what, value } => {
                write!(f, "{what} must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// `Ok(value)` when `value > 0`; NaN fails too
pub(crate) fn positive(what: &'static str, value: f32) -> Result<f32, GeometryError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::NonPositive { what, value })
    }
}

/// Face of a rectangle struck in a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    /// Top/bottom hits reflect the vertical velocity component
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    /// Left/right hits reflect the horizontal velocity component
    #[inline]
    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }
}

/// An axis-aligned rectangle with sub-pixel position and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Build a rectangle, rejecting non-positive (or NaN) sizes
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Result<Self, GeometryError> {
        let w = positive("rectangle width", w)?;
        let h = positive("rectangle height", h)?;
        Ok(Self { x, y, w, h })
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Shift by a displacement
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Strict interior overlap (shared edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Classify a collision with `other`, see [`classify`]
    #[inline]
    pub fn collide(&self, other: &Rect) -> Option<Side> {
        classify(self, other)
    }
}

/// Which face of `a` was struck by `b`, or `None` if they are apart.
///
/// Uses the center delta against the half-extent sums (touching edges count
/// as contact). The dominant penetration axis is picked by comparing the
/// cross products `half_w * dy` and `half_h * dx`, so every overlapping pair
/// maps to exactly one face; exact diagonals fall through the strict
/// comparisons deterministically.
pub fn classify(a: &Rect, b: &Rect) -> Option<Side> {
    let delta = a.center() - b.center();
    let half_w = (a.w + b.w) / 2.0;
    let half_h = (a.h + b.h) / 2.0;

    if delta.x.abs() > half_w || delta.y.abs() > half_h {
        return None;
    }

    let cross_w = half_w * delta.y;
    let cross_h = half_h * delta.x;

    let side = if cross_w > cross_h {
        if cross_w > -cross_h {
            // a sits below b
            Side::Top
        } else {
            // a sits left of b
            Side::Right
        }
    } else if cross_w > -cross_h {
        // a sits right of b
        Side::Left
    } else {
        // a sits above b
        Side::Bottom
    };
    Some(side)
}
