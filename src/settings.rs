//! Run configuration
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files are fine.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which world the run takes place in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WorldVariant {
    /// Fixed rectangle the size of the viewport, enemies spawn from the edges
    Arena,
    /// Unbounded world streamed in chunks around the player
    #[default]
    Infinite,
}

impl WorldVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorldVariant::Arena => "Arena",
            WorldVariant::Infinite => "Infinite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arena" | "bounded" => Some(WorldVariant::Arena),
            "infinite" | "endless" => Some(WorldVariant::Infinite),
            _ => None,
        }
    }
}

/// How chunk contents are randomized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChunkSeeding {
    /// Draw from the run RNG; revisiting a chunk produces new contents
    #[default]
    RunStream,
    /// Contents are a pure function of run seed and chunk coordinate
    ByCoordinate,
}

/// Shotgun pellet layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpreadMode {
    /// Every pellet rolls its own base angle, then adds `spread * i`
    #[default]
    Independent,
    /// One base angle per volley, pellets fanned by `spread * i`
    Fan,
}

/// Draw surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if the point lies inside the rectangle (edges included)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: WorldVariant,
    pub viewport: Viewport,
    /// Run seed; `None` rolls a fresh one on every reset
    pub seed: Option<u64>,
    pub chunk_seeding: ChunkSeeding,
    pub spread: SpreadMode,
    /// Display refresh rate the driver paces to
    pub target_fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: WorldVariant::Infinite,
            viewport: Viewport::default(),
            seed: None,
            chunk_seeding: ChunkSeeding::RunStream,
            spread: SpreadMode::Independent,
            target_fps: 60,
        }
    }
}

impl Settings {
    /// Bounded arena with the default viewport
    pub fn arena() -> Self {
        Self {
            variant: WorldVariant::Arena,
            ..Self::default()
        }
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Milliseconds between two display refreshes
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.target_fps.max(1))
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
