//! Edge spawning for the bounded arena
//!
//! Enemies enter from a random point on a random edge of the arena. The gap
//! between spawns shrinks as the player levels up.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, IdGen};
use crate::consts::*;
use crate::settings::Viewport;

/// Wall-clock spawn timer
#[derive(Debug, Clone)]
pub struct EdgeSpawner {
    pub last_spawn_ms: f64,
}

impl EdgeSpawner {
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_spawn_ms: now_ms,
        }
    }

    /// Milliseconds between spawns at the given player level
    pub fn interval_ms(level: u32) -> f64 {
        let steps = f64::from(level.saturating_sub(1));
        (SPAWN_BASE_INTERVAL_MS - steps * SPAWN_INTERVAL_STEP_MS).max(SPAWN_MIN_INTERVAL_MS)
    }

    /// Spawn one enemy if the interval has elapsed
    pub fn update<R: Rng>(
        &mut self,
        now_ms: f64,
        level: u32,
        arena: &Viewport,
        rng: &mut R,
        ids: &mut IdGen,
    ) -> Option<Enemy> {
        if now_ms - self.last_spawn_ms < Self::interval_ms(level) {
            return None;
        }
        self.last_spawn_ms = now_ms;

        let pos = edge_point(arena, rng);
        let speed = ENEMY_MIN_SPEED + rng.random::<f32>() * ENEMY_SPEED_JITTER;
        Some(Enemy::new(ids.next_id(), pos, speed))
    }
}

/// Random point on the arena border
pub fn edge_point<R: Rng>(arena: &Viewport, rng: &mut R) -> Vec2 {
    let t = rng.random::<f32>();
    match rng.random_range(0..4) {
        0 => Vec2::new(t * arena.width, 0.0),
        1 => Vec2::new(arena.width, t * arena.height),
        2 => Vec2::new(t * arena.width, arena.height),
        _ => Vec2::new(0.0, t * arena.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_interval_scales_with_level() {
        assert_eq!(EdgeSpawner::interval_ms(1), 1000.0);
        assert_eq!(EdgeSpawner::interval_ms(2), 925.0);
        assert!(EdgeSpawner::interval_ms(5) < EdgeSpawner::interval_ms(4));
        assert_eq!(EdgeSpawner::interval_ms(50), SPAWN_MIN_INTERVAL_MS);
    }

    #[test]
    fn test_spawns_on_cadence() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut ids = IdGen::new();
        let arena = Viewport::default();
        let mut spawner = EdgeSpawner::new(0.0);
        assert!(spawner.update(999.0, 1, &arena, &mut rng, &mut ids).is_none());
        let enemy = spawner.update(1000.0, 1, &arena, &mut rng, &mut ids).unwrap();
        assert_eq!(enemy.id, 1);
        assert!(spawner.update(1500.0, 1, &arena, &mut rng, &mut ids).is_none());
        // Higher level, shorter wait
        assert!(spawner.update(1925.0, 2, &arena, &mut rng, &mut ids).is_some());
    }

    #[test]
    fn test_edge_points_on_border() {
        let mut rng = Pcg32::seed_from_u64(11);
        let arena = Viewport {
            width: 200.0,
            height: 100.0,
        };
        for _ in 0..200 {
            let p = edge_point(&arena, &mut rng);
            let on_border = p.x == 0.0 || p.x == 200.0 || p.y == 0.0 || p.y == 100.0;
            assert!(on_border, "{p:?} not on border");
            assert!(arena.contains(p));
        }
    }
}
