//! Horde Survivor - a top-down survival arcade game
//!
//! Core modules:
//! - `sim`: Simulation (entities, weapons, chunk streaming, per-frame tick)
//! - `renderer`: Draw surface abstraction and vertex tessellation
//! - `game_loop`: Frame driver, clocks and run lifecycle
//! - `settings`: Run configuration
//! - `input` / `hud`: The thin input and HUD surfaces the core talks to

pub mod game_loop;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game_loop::{Clock, FrameOutcome, GameLoop, ManualClock, RunSummary, SystemClock};
pub use hud::Hud;
pub use input::{Direction, KeyState};
pub use settings::{ChunkSeeding, Settings, SpreadMode, WorldVariant};

use glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_START_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Speed gained on every level-up
    pub const LEVEL_UP_SPEED_BONUS: f32 = 0.5;
    pub const FIRST_LEVEL_EXP: u32 = 100;
    /// Next threshold = floor(current * numerator / denominator)
    pub const LEVEL_EXP_GROWTH: (u32, u32) = (3, 2);
    /// Level at which the shotgun is awarded
    pub const SHOTGUN_UNLOCK_LEVEL: u32 = 3;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 7.0;
    /// Max distance from the player before a bullet is dropped (infinite world)
    pub const BULLET_MAX_DISTANCE: f32 = 1000.0;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const ENEMY_MIN_SPEED: f32 = 1.0;
    /// Random extra speed in [0, ENEMY_SPEED_JITTER)
    pub const ENEMY_SPEED_JITTER: f32 = 0.5;
    pub const ENEMY_HEALTH: i32 = 5;
    pub const ENEMY_ATTACK: i32 = 10;
    /// Score per bullet kill
    pub const KILL_REWARD: u64 = 10;

    /// Jewel defaults
    pub const JEWEL_RADIUS: f32 = 8.0;
    pub const JEWEL_EXP: u32 = 20;
    pub const JEWEL_ATTRACTION_RADIUS: f32 = 100.0;
    pub const JEWEL_ATTRACTION_SPEED: f32 = 2.0;

    /// Tree defaults
    pub const TREE_RADIUS: f32 = 20.0;

    /// Infinite world chunking
    pub const CHUNK_SIZE: f32 = 500.0;
    /// Chunks generated in each direction around the player's chunk
    pub const RENDER_DISTANCE: i32 = 1;
    pub const ENEMIES_PER_CHUNK: usize = 5;
    pub const JEWELS_PER_CHUNK: usize = 3;
    /// Terrain candidate grid step inside a chunk
    pub const TERRAIN_GRID_STEP: i64 = 50;
    /// A grid point holds a tree when (world_x + world_y) is a multiple of this
    pub const TERRAIN_MODULUS: i64 = 200;
    /// Enemies and jewels farther than this from the player are frozen
    pub const ACTIVE_RADIUS: f32 = CHUNK_SIZE * 1.5;

    /// Bounded arena edge spawning (milliseconds)
    pub const SPAWN_BASE_INTERVAL_MS: f64 = 1000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 75.0;
    pub const SPAWN_MIN_INTERVAL_MS: f64 = 300.0;

    /// Background grid cell size
    pub const GRID_SIZE: f32 = 50.0;
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Move `from` by `step` units along `angle`
#[inline]
pub fn step_along(from: Vec2, angle: f32, step: f32) -> Vec2 {
    from + direction(angle) * step
}
