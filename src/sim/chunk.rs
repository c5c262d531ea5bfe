//! Chunk streaming for the infinite world
//!
//! The world is cut into `CHUNK_SIZE` squares. Every frame the 3×3 block of
//! chunks around the player is kept loaded: missing chunks are generated,
//! chunks that fell out of the block are unloaded together with everything
//! they own.

use std::collections::{BTreeSet, HashSet};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EntityId, GameEvent, GameState, IdGen, Jewel, Tree};
use crate::consts::*;
use crate::settings::ChunkSeeding;

/// Integer chunk coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a world position
    pub fn from_world(pos: Vec2) -> Self {
        Self {
            x: (pos.x / CHUNK_SIZE).floor() as i32,
            y: (pos.y / CHUNK_SIZE).floor() as i32,
        }
    }

    /// World position of the chunk's top-left corner
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x as f32 * CHUNK_SIZE, self.y as f32 * CHUNK_SIZE)
    }

    /// All chunks within `distance` (Chebyshev) of this one
    pub fn neighborhood(&self, distance: i32) -> BTreeSet<ChunkCoord> {
        let mut set = BTreeSet::new();
        for dx in -distance..=distance {
            for dy in -distance..=distance {
                set.insert(ChunkCoord::new(self.x + dx, self.y + dy));
            }
        }
        set
    }

    /// Per-chunk RNG derived from the run seed
    pub fn rng(&self, seed: u64) -> Pcg32 {
        let mixed = seed
            ^ (self.x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (self.y as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        Pcg32::seed_from_u64(mixed)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A loaded chunk and the IDs of the entities it owns
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    pub enemies: Vec<EntityId>,
    pub jewels: Vec<EntityId>,
    pub trees: Vec<EntityId>,
}

/// Freshly rolled chunk contents
#[derive(Debug, Default)]
pub struct ChunkContents {
    pub enemies: Vec<Enemy>,
    pub jewels: Vec<Jewel>,
    pub trees: Vec<Tree>,
}

/// World positions of the trees in a chunk.
///
/// Pure function of the coordinate: grid points every `TERRAIN_GRID_STEP`
/// where `world_x + world_y` is a multiple of `TERRAIN_MODULUS`.
pub fn terrain_points(coord: ChunkCoord) -> Vec<Vec2> {
    let size = CHUNK_SIZE as i64;
    let base_x = coord.x as i64 * size;
    let base_y = coord.y as i64 * size;
    let mut points = Vec::new();
    for x in (0..size).step_by(TERRAIN_GRID_STEP as usize) {
        for y in (0..size).step_by(TERRAIN_GRID_STEP as usize) {
            let wx = base_x + x;
            let wy = base_y + y;
            if (wx + wy) % TERRAIN_MODULUS == 0 {
                points.push(Vec2::new(wx as f32, wy as f32));
            }
        }
    }
    points
}

/// Roll enemies and jewels at random positions inside the chunk
pub fn roll_contents<R: Rng>(coord: ChunkCoord, rng: &mut R, ids: &mut IdGen) -> ChunkContents {
    let origin = coord.origin();
    let random_point = |rng: &mut R| {
        origin + Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * CHUNK_SIZE
    };

    let enemies = (0..ENEMIES_PER_CHUNK)
        .map(|_| {
            let pos = random_point(rng);
            let speed = ENEMY_MIN_SPEED + rng.random::<f32>() * ENEMY_SPEED_JITTER;
            Enemy::new(ids.next_id(), pos, speed).in_chunk(coord)
        })
        .collect();

    let jewels = (0..JEWELS_PER_CHUNK)
        .map(|_| {
            let mut jewel = Jewel::new(ids.next_id(), random_point(rng));
            jewel.chunk = Some(coord);
            jewel
        })
        .collect();

    let trees = terrain_points(coord)
        .into_iter()
        .map(|pos| Tree::new(ids.next_id(), pos))
        .collect();

    ChunkContents {
        enemies,
        jewels,
        trees,
    }
}

/// Keep exactly the chunks around the player loaded
pub fn stream_chunks(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let center = ChunkCoord::from_world(state.player.pos);
    let wanted = center.neighborhood(RENDER_DISTANCE);

    for &coord in &wanted {
        if !state.chunks.contains_key(&coord) {
            generate_chunk(state, coord);
            events.push(GameEvent::ChunkLoaded { coord });
        }
    }

    let stale: Vec<ChunkCoord> = state
        .chunks
        .keys()
        .filter(|c| !wanted.contains(*c))
        .copied()
        .collect();
    for coord in stale {
        unload_chunk(state, coord);
        events.push(GameEvent::ChunkUnloaded { coord });
    }
}

/// Generate a chunk and merge its entities into the global collections
pub fn generate_chunk(state: &mut GameState, coord: ChunkCoord) {
    let contents = match state.settings.chunk_seeding {
        ChunkSeeding::RunStream => roll_contents(coord, &mut state.rng, &mut state.ids),
        ChunkSeeding::ByCoordinate => {
            let mut rng = coord.rng(state.seed);
            roll_contents(coord, &mut rng, &mut state.ids)
        }
    };

    let chunk = Chunk {
        enemies: contents.enemies.iter().map(|e| e.id).collect(),
        jewels: contents.jewels.iter().map(|j| j.id).collect(),
        trees: contents.trees.iter().map(|t| t.id).collect(),
    };
    log::debug!(
        "Chunk {} loaded: {} enemies, {} jewels, {} trees",
        coord,
        chunk.enemies.len(),
        chunk.jewels.len(),
        chunk.trees.len()
    );

    state.enemies.extend(contents.enemies);
    state.jewels.extend(contents.jewels);
    state.trees.extend(contents.trees);
    state.chunks.insert(coord, chunk);
}

/// Drop a chunk and every entity it owns. Unknown chunks are ignored.
pub fn unload_chunk(state: &mut GameState, coord: ChunkCoord) {
    let Some(chunk) = state.chunks.remove(&coord) else {
        return;
    };

    let enemies: HashSet<EntityId> = chunk.enemies.into_iter().collect();
    let jewels: HashSet<EntityId> = chunk.jewels.into_iter().collect();
    let trees: HashSet<EntityId> = chunk.trees.into_iter().collect();

    state.enemies.retain(|e| !enemies.contains(&e.id));
    state.jewels.retain(|j| !jewels.contains(&j.id));
    state.trees.retain(|t| !trees.contains(&t.id));

    log::debug!("Chunk {} unloaded", coord);
}

/// Forget an entity that left the world some other way. Misses are no-ops.
pub fn release_enemy(state: &mut GameState, coord: Option<ChunkCoord>, id: EntityId) {
    if let Some(chunk) = coord.and_then(|c| state.chunks.get_mut(&c)) {
        chunk.enemies.retain(|&e| e != id);
    }
}

/// Jewel counterpart of [`release_enemy`]
pub fn release_jewel(state: &mut GameState, coord: Option<ChunkCoord>, id: EntityId) {
    if let Some(chunk) = coord.and_then(|c| state.chunks.get_mut(&c)) {
        chunk.jewels.retain(|&j| j != id);
    }
}

/// Hand a jewel to a loaded chunk; returns the owner actually used
pub fn adopt_jewel(
    state: &mut GameState,
    coord: Option<ChunkCoord>,
    id: EntityId,
) -> Option<ChunkCoord> {
    let coord = coord?;
    let chunk = state.chunks.get_mut(&coord)?;
    chunk.jewels.push(id);
    Some(coord)
}
