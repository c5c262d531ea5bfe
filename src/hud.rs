//! HUD fields published once per frame
//!
//! The core only produces values; drawing the text is up to whoever
//! implements [`HudSink`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::state::Player;

/// Snapshot of the values the HUD shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub health: i32,
    pub level: u32,
    pub score: u64,
    pub exp: u32,
    pub next_level_exp: u32,
}

impl Hud {
    pub fn new(player: &Player, score: u64) -> Self {
        Self {
            health: player.health,
            level: player.level,
            score,
            exp: player.exp,
            next_level_exp: player.next_level_exp,
        }
    }

    pub fn health_text(&self) -> String {
        format!("Health: {}", self.health)
    }

    pub fn level_text(&self) -> String {
        format!("Level: {}", self.level)
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn exp_text(&self) -> String {
        format!("EXP: {} / {}", self.exp, self.next_level_exp)
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.health_text(),
            self.level_text(),
            self.score_text(),
            self.exp_text()
        )
    }
}

/// Receiver for HUD updates (DOM text, terminal line, test recorder...)
pub trait HudSink {
    fn publish(&mut self, hud: &Hud);
}

/// Keeps every published snapshot
#[derive(Debug, Default)]
pub struct HudLog {
    pub frames: Vec<Hud>,
}

impl HudSink for HudLog {
    fn publish(&mut self, hud: &Hud) {
        self.frames.push(hud.clone());
    }
}

/// Drops every update
#[derive(Debug, Default)]
pub struct NullHud;

impl HudSink for NullHud {
    fn publish(&mut self, _hud: &Hud) {}
}
