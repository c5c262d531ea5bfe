//! Game state and core simulation types
//!
//! `GameState` is the single owner of every entity collection. It is created
//! by a reset, mutated only by `tick`, and read by the renderer.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chunk::{Chunk, ChunkCoord};
use super::collision::{Body, angle_to};
use super::spawner::EdgeSpawner;
use super::weapon::{Weapon, WeaponKind, WeaponSpec};
use crate::consts::*;
use crate::hud::Hud;
use crate::settings::{Settings, Viewport, WorldVariant};
use crate::step_along;

/// Stable handle for enemies, jewels, bullets and trees
pub type EntityId = u32;

/// Monotonic entity ID source
#[derive(Debug, Clone)]
pub struct IdGen {
    next: EntityId,
}

impl IdGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Things that happened during one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A weapon fired `count` bullets
    Fired { weapon: WeaponKind, count: usize },
    /// A bullet damaged an enemy
    EnemyHit { enemy: EntityId, damage: i32 },
    /// Enemy died to bullets, dropped a jewel
    EnemyKilled { enemy: EntityId, jewel: EntityId },
    /// Enemy rammed the player and was destroyed
    PlayerHit { enemy: EntityId, damage: i32 },
    JewelCollected { jewel: EntityId, exp: u32 },
    LevelUp { level: u32 },
    WeaponGranted { weapon: WeaponKind },
    ChunkLoaded { coord: ChunkCoord },
    ChunkUnloaded { coord: ChunkCoord },
    EnemySpawned { enemy: EntityId },
}

/// The player-controlled survivor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub exp: u32,
    pub next_level_exp: u32,
    pub prev_level_exp: u32,
    pub weapons: Vec<Weapon>,
}

impl Player {
    /// Starting stats with a single basic weapon
    pub fn new(pos: Vec2, now_ms: f64) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            speed: PLAYER_START_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            level: 1,
            exp: 0,
            next_level_exp: FIRST_LEVEL_EXP,
            prev_level_exp: 0,
            weapons: vec![Weapon::new(WeaponKind::Basic, now_ms)],
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    /// Keep health within [0, max_health]
    pub fn clamp_health(&mut self) {
        self.health = self.health.clamp(0, self.max_health);
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind == kind)
    }

    /// Add experience and resolve at most one level-up.
    ///
    /// A single collection that crosses two thresholds still only gains one
    /// level; the surplus carries over to the next collection.
    pub fn gain_exp(&mut self, amount: u32, now_ms: f64, events: &mut Vec<GameEvent>) {
        self.exp += amount;
        if self.exp >= self.next_level_exp {
            self.level_up(now_ms, events);
        }
    }

    fn level_up(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        self.level += 1;
        self.prev_level_exp = self.next_level_exp;
        self.next_level_exp = next_threshold(self.next_level_exp);
        self.health = self.max_health;
        self.speed += LEVEL_UP_SPEED_BONUS;
        log::info!(
            "Level up! level={} next={} speed={}",
            self.level,
            self.next_level_exp,
            self.speed
        );
        events.push(GameEvent::LevelUp { level: self.level });

        if self.level == SHOTGUN_UNLOCK_LEVEL && !self.has_weapon(WeaponKind::Shotgun) {
            self.weapons.push(Weapon::new(WeaponKind::Shotgun, now_ms));
            log::info!("Shotgun unlocked");
            events.push(GameEvent::WeaponGranted {
                weapon: WeaponKind::Shotgun,
            });
        }
    }
}

/// Exp threshold after `current`, floor(current * 1.5) in exact integer math
pub fn next_threshold(current: u32) -> u32 {
    let (num, den) = LEVEL_EXP_GROWTH;
    let next = u64::from(current) * u64::from(num) / u64::from(den);
    u32::try_from(next).unwrap_or(u32::MAX)
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Heading (radians)
    pub angle: f32,
    pub damage: i32,
    /// Set once the bullet has hit an enemy
    pub consumed: bool,
}

impl Bullet {
    pub fn new(id: EntityId, pos: Vec2, angle: f32, spec: &WeaponSpec) -> Self {
        Self {
            id,
            pos,
            radius: spec.radius,
            speed: spec.speed,
            angle,
            damage: spec.damage,
            consumed: false,
        }
    }

    /// Move one step along the heading
    pub fn advance(&mut self) {
        self.pos = step_along(self.pos, self.angle, self.speed);
    }

    /// Damage the first overlapping enemy in iteration order.
    ///
    /// Returns the index of the enemy hit. A consumed bullet never hits again.
    pub fn strike(&mut self, enemies: &mut [Enemy]) -> Option<usize> {
        if self.consumed {
            return None;
        }
        let idx = enemies
            .iter()
            .position(|e| super::collision::overlaps(&*self, e))?;
        enemies[idx].take_damage(self.damage);
        self.consumed = true;
        Some(idx)
    }

    /// Arena: left the rectangle. Infinite: too far from the player.
    pub fn out_of_bounds(&self, variant: WorldVariant, viewport: &Viewport, player: Vec2) -> bool {
        match variant {
            WorldVariant::Arena => !viewport.contains(self.pos),
            WorldVariant::Infinite => {
                self.pos.distance_squared(player) > BULLET_MAX_DISTANCE * BULLET_MAX_DISTANCE
            }
        }
    }
}

impl Body for Bullet {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A hostile chaser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    /// Chunk that generated this enemy (infinite world only)
    pub chunk: Option<ChunkCoord>,
}

impl Enemy {
    pub fn new(id: EntityId, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            radius: ENEMY_RADIUS,
            speed,
            health: ENEMY_HEALTH,
            max_health: ENEMY_HEALTH,
            attack: ENEMY_ATTACK,
            chunk: None,
        }
    }

    pub fn in_chunk(mut self, coord: ChunkCoord) -> Self {
        self.chunk = Some(coord);
        self
    }

    /// One step straight at the target
    pub fn pursue(&mut self, target: Vec2) {
        let angle = angle_to(self.pos, target);
        self.pos = step_along(self.pos, angle, self.speed);
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Health bar fill in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

impl Body for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// An experience pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jewel {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub exp: u32,
    pub collected: bool,
    /// Owning chunk (infinite world only)
    pub chunk: Option<ChunkCoord>,
}

impl Jewel {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: JEWEL_RADIUS,
            exp: JEWEL_EXP,
            collected: false,
            chunk: None,
        }
    }

    /// Drift toward the player when inside the attraction radius
    pub fn attract(&mut self, player: Vec2) {
        if self.pos.distance_squared(player) <= JEWEL_ATTRACTION_RADIUS * JEWEL_ATTRACTION_RADIUS {
            let angle = angle_to(self.pos, player);
            self.pos = step_along(self.pos, angle, JEWEL_ATTRACTION_SPEED);
        }
    }
}

impl Body for Jewel {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Decorative terrain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
}

impl Tree {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: TREE_RADIUS,
        }
    }
}

impl Body for Tree {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub ids: IdGen,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub jewels: Vec<Jewel>,
    pub trees: Vec<Tree>,
    /// Loaded chunks (infinite world only)
    pub chunks: BTreeMap<ChunkCoord, Chunk>,
    /// Edge spawner (arena only)
    pub spawner: EdgeSpawner,
    pub score: u64,
    /// Frames simulated since the last reset
    pub frame: u64,
    /// Clock reading at reset
    pub started_ms: f64,
    /// Last published HUD values
    pub hud: Hud,
}

impl GameState {
    /// Fresh run at clock reading `now_ms`
    pub fn new(settings: Settings, now_ms: f64) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let start = match settings.variant {
            WorldVariant::Arena => settings.viewport.center(),
            WorldVariant::Infinite => Vec2::ZERO,
        };
        let player = Player::new(start, now_ms);
        let hud = Hud::new(&player, 0);

        log::info!(
            "New run: variant={} seed={}",
            settings.variant.as_str(),
            seed
        );

        Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ids: IdGen::new(),
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            jewels: Vec::new(),
            trees: Vec::new(),
            chunks: BTreeMap::new(),
            spawner: EdgeSpawner::new(now_ms),
            score: 0,
            frame: 0,
            started_ms: now_ms,
            hud,
        }
    }

    /// Reinitialize every collection and the player to starting values
    pub fn reset(&mut self, now_ms: f64) {
        *self = Self::new(self.settings.clone(), now_ms);
    }

    pub fn is_over(&self) -> bool {
        !self.player.is_alive()
    }

    pub fn variant(&self) -> WorldVariant {
        self.settings.variant
    }

    /// Whether an entity is close enough to the player to be simulated
    pub fn is_active<B: Body>(&self, body: &B) -> bool {
        match self.variant() {
            WorldVariant::Arena => true,
            WorldVariant::Infinite => {
                super::collision::within_radius(body, &self.player, ACTIVE_RADIUS)
            }
        }
    }

    pub fn refresh_hud(&mut self) {
        self.hud = Hud::new(&self.player, self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_next_threshold_is_exact() {
        assert_eq!(next_threshold(100), 150);
        assert_eq!(next_threshold(150), 225);
        assert_eq!(next_threshold(225), 337);
        // Above f32's exact integer range
        assert_eq!(next_threshold(16_777_217), 25_165_825);
        assert_eq!(next_threshold(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_id_gen_default_matches_new() {
        let mut ids = IdGen::default();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn test_single_level_per_collection() {
        let mut events = Vec::new();
        let mut player = Player::new(Vec2::ZERO, 0.0);
        player.exp = 90;
        player.health = 40;
        player.gain_exp(20, 0.0, &mut events);
        assert_eq!(player.level, 2);
        assert_eq!(player.exp, 110);
        assert_eq!(player.prev_level_exp, 100);
        assert_eq!(player.next_level_exp, 150);
        assert_eq!(player.health, player.max_health);
        assert_eq!(player.speed, PLAYER_START_SPEED + LEVEL_UP_SPEED_BONUS);
        assert_eq!(events, vec![GameEvent::LevelUp { level: 2 }]);
    }

    #[test]
    fn test_large_gain_still_one_level() {
        let mut events = Vec::new();
        let mut player = Player::new(Vec2::ZERO, 0.0);
        player.gain_exp(1000, 0.0, &mut events);
        assert_eq!(player.level, 2);
        assert_eq!(player.next_level_exp, 150);
        // Next collection resolves the backlog one level at a time
        player.gain_exp(0, 0.0, &mut events);
        assert_eq!(player.level, 3);
    }

    #[test]
    fn test_shotgun_granted_once_at_level_three() {
        let mut events = Vec::new();
        let mut player = Player::new(Vec2::ZERO, 0.0);
        for _ in 0..6 {
            let needed = player.next_level_exp - player.exp;
            player.gain_exp(needed, 1234.0, &mut events);
        }
        assert_eq!(player.level, 7);
        let shotguns = player
            .weapons
            .iter()
            .filter(|w| w.kind == WeaponKind::Shotgun)
            .count();
        assert_eq!(shotguns, 1);
        assert_eq!(player.weapons.len(), 2);
        let shotgun = &player.weapons[1];
        assert_eq!(shotgun.last_fire_ms, 1234.0);
    }

    #[test]
    fn test_clamp_health() {
        let mut player = Player::new(Vec2::ZERO, 0.0);
        player.take_damage(250);
        player.clamp_health();
        assert_eq!(player.health, 0);
        assert!(!player.is_alive());
        player.health = 500;
        player.clamp_health();
        assert_eq!(player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_bullet_advance() {
        let mut bullet = Bullet::new(1, Vec2::ZERO, 0.0, &WeaponKind::Basic.spec());
        bullet.advance();
        assert_eq!(bullet.pos, Vec2::new(7.0, 0.0));
    }

    #[test]
    fn test_bullet_hits_only_first_enemy() {
        let mut bullet = Bullet::new(1, Vec2::ZERO, 0.0, &WeaponKind::Basic.spec());
        let mut enemies = vec![
            Enemy::new(10, Vec2::new(5.0, 0.0), 1.0),
            Enemy::new(11, Vec2::new(-5.0, 0.0), 1.0),
        ];
        assert_eq!(bullet.strike(&mut enemies), Some(0));
        assert!(bullet.consumed);
        assert_eq!(enemies[0].health, ENEMY_HEALTH - 10);
        assert_eq!(enemies[1].health, ENEMY_HEALTH);
        // Already consumed
        assert_eq!(bullet.strike(&mut enemies), None);
        assert_eq!(enemies[1].health, ENEMY_HEALTH);
    }

    #[test]
    fn test_bullet_out_of_bounds_infinite() {
        let viewport = Viewport::default();
        let mut bullet = Bullet::new(1, Vec2::ZERO, 0.0, &WeaponKind::Basic.spec());
        let mut steps = 0;
        while !bullet.out_of_bounds(WorldVariant::Infinite, &viewport, Vec2::ZERO) {
            bullet.advance();
            steps += 1;
        }
        // 1000 / 7 = 142.86, first position past 1000 is step 143
        assert_eq!(steps, 143);
    }

    #[test]
    fn test_bullet_out_of_bounds_arena() {
        let viewport = Viewport {
            width: 100.0,
            height: 100.0,
        };
        let bullet = Bullet::new(1, Vec2::new(50.0, 50.0), 0.0, &WeaponKind::Basic.spec());
        assert!(!bullet.out_of_bounds(WorldVariant::Arena, &viewport, Vec2::ZERO));
        let gone = Bullet::new(2, Vec2::new(101.0, 50.0), 0.0, &WeaponKind::Basic.spec());
        assert!(gone.out_of_bounds(WorldVariant::Arena, &viewport, Vec2::ZERO));
    }

    #[test]
    fn test_enemy_pursues_player() {
        let mut enemy = Enemy::new(1, Vec2::new(10.0, 0.0), 1.5);
        enemy.pursue(Vec2::ZERO);
        assert!((enemy.pos.x - 8.5).abs() < 1e-5);
        assert!(enemy.pos.y.abs() < 1e-5);
    }

    #[test]
    fn test_enemy_on_top_of_player_does_not_nan() {
        let mut enemy = Enemy::new(1, Vec2::ZERO, 1.0);
        enemy.pursue(Vec2::ZERO);
        assert!(enemy.pos.is_finite());
    }

    #[test]
    fn test_jewel_attraction() {
        let mut near = Jewel::new(1, Vec2::new(50.0, 0.0));
        near.attract(Vec2::ZERO);
        assert!((near.pos.x - 48.0).abs() < 1e-5);

        let mut far = Jewel::new(2, Vec2::new(150.0, 0.0));
        far.attract(Vec2::ZERO);
        assert_eq!(far.pos, Vec2::new(150.0, 0.0));
    }

    #[test]
    fn test_health_fraction_clamped() {
        let mut enemy = Enemy::new(1, Vec2::ZERO, 1.0);
        enemy.take_damage(10);
        assert_eq!(enemy.health_fraction(), 0.0);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut state = GameState::new(Settings::default().with_seed(9), 0.0);
        state.score = 500;
        state.player.health = 3;
        state.enemies.push(Enemy::new(99, Vec2::ONE, 1.0));
        state.reset(2000.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.weapons.len(), 1);
        assert_eq!(state.player.weapons[0].last_fire_ms, 2000.0);
        assert_eq!(state.seed, 9);
    }

    #[test]
    fn test_arena_player_starts_centered() {
        let state = GameState::new(Settings::arena().with_seed(1), 0.0);
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
    }

    proptest! {
        #[test]
        fn level_up_is_monotonic(gains in proptest::collection::vec(0u32..200, 1..60)) {
            let mut events = Vec::new();
            let mut player = Player::new(Vec2::ZERO, 0.0);
            for gain in gains {
                let before = player.clone();
                player.take_damage(7);
                player.gain_exp(gain, 0.0, &mut events);
                if player.level > before.level {
                    prop_assert_eq!(player.level, before.level + 1);
                    prop_assert!(player.next_level_exp > before.next_level_exp);
                    prop_assert!(player.speed > before.speed);
                    prop_assert_eq!(player.health, player.max_health);
                }
            }
        }
    }
}
