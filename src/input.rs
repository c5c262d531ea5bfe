//! Keyboard state as seen by the simulation
//!
//! The platform layer feeds key-down/key-up events in; the simulation only
//! asks whether one of the four logical directions is held.

use std::collections::HashMap;

use glam::Vec2;

/// Logical movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Key identifiers that trigger this direction
    pub fn aliases(&self) -> [&'static str; 2] {
        match self {
            Direction::Up => ["ArrowUp", "w"],
            Direction::Down => ["ArrowDown", "s"],
            Direction::Left => ["ArrowLeft", "a"],
            Direction::Right => ["ArrowRight", "d"],
        }
    }

    /// Unit step in screen space (y grows downward)
    pub fn delta(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Pressed state per key identifier
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    keys: HashMap<String, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, pressed: bool) {
        self.keys.insert(key.to_string(), pressed);
    }

    pub fn press(&mut self, key: &str) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: &str) {
        self.set(key, false);
    }

    /// Unknown keys count as released
    pub fn is_pressed(&self, key: &str) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    pub fn held(&self, dir: Direction) -> bool {
        dir.aliases().iter().any(|k| self.is_pressed(k))
    }

    /// Sum of the unit steps of every held direction (not normalized)
    pub fn movement(&self) -> Vec2 {
        Direction::ALL
            .iter()
            .filter(|d| self.held(**d))
            .map(|d| d.delta())
            .sum()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
