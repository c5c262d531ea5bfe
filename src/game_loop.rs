//! Frame driver
//!
//! One simulation step then one draw per frame. When the player dies the
//! driver reports the run and resets the world to its starting state.

use std::cell::Cell;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::hud::HudSink;
use crate::input::KeyState;
use crate::renderer::{DrawList, draw_frame};
use crate::settings::{Settings, WorldVariant};
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// How a finished run went
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub variant: WorldVariant,
    pub score: u64,
    pub level: u32,
    pub frames: u64,
    pub duration_ms: f64,
}

impl RunSummary {
    pub fn from_state(state: &GameState, now_ms: f64) -> Self {
        Self {
            seed: state.seed,
            variant: state.variant(),
            score: state.score,
            level: state.player.level,
            frames: state.frame,
            duration_ms: (now_ms - state.started_ms).max(0.0),
        }
    }
}

/// Result of a single frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Running,
    /// The run ended this frame and the world has been reset
    GameOver(RunSummary),
}

/// Owns the world, the input snapshot, the clock and the draw surface
pub struct GameLoop<C: Clock> {
    state: GameState,
    input: TickInput,
    clock: C,
    canvas: DrawList,
    events: Vec<GameEvent>,
    runs: u32,
}

impl<C: Clock> GameLoop<C> {
    pub fn new(settings: Settings, clock: C) -> Self {
        let canvas = DrawList::new(settings.viewport);
        let state = GameState::new(settings, clock.now_ms());
        Self {
            state,
            input: TickInput::default(),
            clock,
            canvas,
            events: Vec::new(),
            runs: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct world access for harnesses and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn canvas(&self) -> &DrawList {
        &self.canvas
    }

    /// Keys held for upcoming frames
    pub fn keys_mut(&mut self) -> &mut KeyState {
        &mut self.input.keys
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.input.autopilot != enabled {
            log::info!("Autopilot: {}", enabled);
        }
        self.input.autopilot = enabled;
    }

    /// Events produced by the most recent frame
    pub fn last_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Completed runs so far
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Step, draw, publish the HUD; on death summarize and reset
    pub fn frame(&mut self, hud: &mut dyn HudSink) -> FrameOutcome {
        let now = self.clock.now_ms();
        self.events = tick(&mut self.state, &self.input, now);
        draw_frame(&self.state, &mut self.canvas);
        hud.publish(&self.state.hud);

        if !self.state.is_over() {
            return FrameOutcome::Running;
        }

        let summary = RunSummary::from_state(&self.state, now);
        self.runs += 1;
        log::info!(
            "Game over! score={} level={} frames={}",
            summary.score,
            summary.level,
            summary.frames
        );
        self.reset_game();
        FrameOutcome::GameOver(summary)
    }

    /// Start a fresh run; held keys are released
    pub fn reset_game(&mut self) {
        self.state.reset(self.clock.now_ms());
        self.input.keys.clear();
        self.events.clear();
    }

    /// Run `frames` frames, calling `between` after each one (pacing, clock advance)
    pub fn run(
        &mut self,
        frames: u64,
        hud: &mut dyn HudSink,
        mut between: impl FnMut(&Self),
    ) -> Vec<RunSummary> {
        let mut finished = Vec::new();
        for _ in 0..frames {
            if let FrameOutcome::GameOver(summary) = self.frame(hud) {
                finished.push(summary);
            }
            between(self);
        }
        finished
    }
}
