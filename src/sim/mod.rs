//! Simulation module
//!
//! All gameplay logic lives here:
//! - Explicit clock readings only (no hidden wall-clock reads)
//! - Seeded RNG only
//! - Stable iteration order (insertion order, chunks keyed by coordinate)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod chunk;
pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapon;

pub use chunk::{Chunk, ChunkCoord, stream_chunks};
pub use collision::{Body, Circle, angle_to, overlaps, within_radius};
pub use spawner::EdgeSpawner;
pub use state::{Bullet, Enemy, EntityId, GameEvent, GameState, Jewel, Player, Tree};
pub use tick::{TickInput, tick};
pub use weapon::{Weapon, WeaponKind, WeaponSpec};
