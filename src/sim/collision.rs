//! Circle collision and steering helpers
//!
//! Every entity in the game is a circle, so all interaction boils down to
//! center distances compared against radii.

use glam::Vec2;

/// Anything with a center and a radius
pub trait Body {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// A free-standing circle, handy for ad-hoc queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub pos: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(pos: Vec2, radius: f32) -> Self {
        Self { pos, radius }
    }
}

impl Body for Circle {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// True iff the center distance is strictly less than the sum of radii
#[inline]
pub fn overlaps<A: Body + ?Sized, B: Body + ?Sized>(a: &A, b: &B) -> bool {
    a.pos().distance(b.pos()) < a.radius() + b.radius()
}

/// True iff the squared center distance is at most `r²`
#[inline]
pub fn within_radius<A: Body + ?Sized, B: Body + ?Sized>(a: &A, b: &B, r: f32) -> bool {
    a.pos().distance_squared(b.pos()) <= r * r
}

/// Heading from `from` to `to`; 0 when the points coincide
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    if d == Vec2::ZERO {
        return 0.0;
    }
    d.y.atan2(d.x)
}
