//! Idle/demo mode - AI plays the game
//!
//! Produces the same kind of movement a held key combination would: each
//! axis is -1, 0 or 1.

use glam::Vec2;

use super::collision::Body;
use super::state::GameState;

/// Enemies closer than this make the autopilot back off
pub const DANGER_RADIUS: f32 = 150.0;

/// Key-like movement for this frame
pub fn steer(state: &GameState) -> Vec2 {
    let me = state.player.pos;

    // Run from the closest threat first
    let threat = state
        .enemies
        .iter()
        .filter(|e| state.is_active(*e))
        .map(|e| (e.pos(), e.pos().distance_squared(me)))
        .filter(|(_, d2)| *d2 <= DANGER_RADIUS * DANGER_RADIUS)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((enemy, _)) = threat {
        return key_axes(me - enemy);
    }

    // Otherwise go get the nearest jewel
    let jewel = state
        .jewels
        .iter()
        .filter(|j| state.is_active(*j))
        .min_by(|a, b| {
            a.pos
                .distance_squared(me)
                .partial_cmp(&b.pos.distance_squared(me))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match jewel {
        Some(j) => key_axes(j.pos - me),
        None => Vec2::ZERO,
    }
}

/// Snap a direction to the 8 key combinations
fn key_axes(dir: Vec2) -> Vec2 {
    let snap = |v: f32| {
        if v.abs() < 1.0 {
            0.0
        } else {
            v.signum()
        }
    };
    let axes = Vec2::new(snap(dir.x), snap(dir.y));
    if axes == Vec2::ZERO && dir != Vec2::ZERO {
        // Sub-unit offsets still pick a side, along the dominant axis
        return if dir.x.abs() >= dir.y.abs() {
            Vec2::new(dir.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, dir.y.signum())
        };
    }
    axes
}
