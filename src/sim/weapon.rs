//! Auto-firing weapons
//!
//! A weapon is a cadence timer plus a fire pattern. Firing never fails; a
//! triggered weapon produces a volley of bullet headings and the caller turns
//! those into bullets at the player's position.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{BULLET_RADIUS, BULLET_SPEED};
use crate::settings::SpreadMode;

/// Weapon variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    /// One bullet in a random direction
    Basic,
    /// Five pellets offset by a fixed spread
    Shotgun,
}

/// Per-variant behavior table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    /// Milliseconds between volleys
    pub cadence_ms: f64,
    /// Pellet offsets run over `-half_spread..=half_spread`
    pub half_spread: i32,
    /// Angle between neighbouring pellets (radians)
    pub spread: f32,
    pub damage: i32,
    pub speed: f32,
    pub radius: f32,
}

impl WeaponKind {
    pub const fn spec(&self) -> WeaponSpec {
        match self {
            WeaponKind::Basic => WeaponSpec {
                cadence_ms: 1000.0,
                half_spread: 0,
                spread: 0.0,
                damage: 10,
                speed: BULLET_SPEED,
                radius: BULLET_RADIUS,
            },
            WeaponKind::Shotgun => WeaponSpec {
                cadence_ms: 2000.0,
                half_spread: 2,
                spread: 0.2,
                damage: 8,
                speed: BULLET_SPEED,
                radius: BULLET_RADIUS,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Basic => "Basic",
            WeaponKind::Shotgun => "Shotgun",
        }
    }
}

impl WeaponSpec {
    /// Bullets per volley
    pub const fn pellets(&self) -> usize {
        (self.half_spread * 2 + 1) as usize
    }
}

/// An owned weapon and its cadence timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Clock reading (ms) of the last volley, or of acquisition
    pub last_fire_ms: f64,
}

impl Weapon {
    /// A freshly acquired weapon waits one full cadence before its first volley
    pub fn new(kind: WeaponKind, now_ms: f64) -> Self {
        Self {
            kind,
            last_fire_ms: now_ms,
        }
    }

    pub fn spec(&self) -> WeaponSpec {
        self.kind.spec()
    }

    pub fn is_ready(&self, now_ms: f64) -> bool {
        now_ms - self.last_fire_ms >= self.spec().cadence_ms
    }

    /// Advance the timer; returns the volley headings when it fires
    pub fn update<R: Rng>(
        &mut self,
        now_ms: f64,
        rng: &mut R,
        mode: SpreadMode,
    ) -> Option<Vec<f32>> {
        if !self.is_ready(now_ms) {
            return None;
        }
        self.last_fire_ms = now_ms;
        Some(self.volley(rng, mode))
    }

    /// Headings for one volley
    pub fn volley<R: Rng>(&self, rng: &mut R, mode: SpreadMode) -> Vec<f32> {
        let spec = self.spec();
        let fan_base = rng.random::<f32>() * TAU;
        (-spec.half_spread..=spec.half_spread)
            .map(|i| {
                let base = match mode {
                    // First pellet reuses the fan roll
                    SpreadMode::Independent if i != -spec.half_spread => {
                        rng.random::<f32>() * TAU
                    }
                    _ => fan_base,
                };
                base + spec.spread * i as f32
            })
            .collect()
    }
}
