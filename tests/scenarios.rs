//! End-to-end gameplay scenarios driven through the public API

use std::collections::BTreeSet;

use glam::Vec2;
use horde_survivor::consts::*;
use horde_survivor::sim::{
    Bullet, Chunk, ChunkCoord, Enemy, EntityId, GameEvent, GameState, Jewel, TickInput,
    WeaponKind, tick,
};
use horde_survivor::{GameLoop, ManualClock, Settings};

/// Infinite world at the origin with the surrounding chunks already loaded
/// and empty, so nothing random gets in the way
fn quiet_world() -> GameState {
    let mut state = GameState::new(Settings::default().with_seed(42), 0.0);
    for coord in ChunkCoord::new(0, 0).neighborhood(RENDER_DISTANCE) {
        state.chunks.insert(coord, Chunk::default());
    }
    state
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> EntityId) -> BTreeSet<EntityId> {
    items.iter().map(id).collect()
}

fn assert_chunk_invariant(state: &GameState) {
    let loaded: BTreeSet<ChunkCoord> = state.chunks.keys().copied().collect();
    let expected = ChunkCoord::from_world(state.player.pos).neighborhood(RENDER_DISTANCE);
    assert_eq!(loaded, expected);

    let owned_enemies: BTreeSet<EntityId> = state
        .chunks
        .values()
        .flat_map(|c| c.enemies.iter().copied())
        .collect();
    let owned_jewels: BTreeSet<EntityId> = state
        .chunks
        .values()
        .flat_map(|c| c.jewels.iter().copied())
        .collect();
    let owned_trees: BTreeSet<EntityId> = state
        .chunks
        .values()
        .flat_map(|c| c.trees.iter().copied())
        .collect();

    assert_eq!(owned_enemies, ids(&state.enemies, |e| e.id));
    assert_eq!(owned_jewels, ids(&state.jewels, |j| j.id));
    assert_eq!(owned_trees, ids(&state.trees, |t| t.id));
}

#[test]
fn enemy_contact_costs_health_and_removes_enemy() {
    let mut state = quiet_world();
    assert_eq!(state.player.pos, Vec2::ZERO);
    assert_eq!(state.player.radius, 15.0);
    let enemy = Enemy::new(1000, Vec2::new(10.0, 0.0), 1.0);
    assert_eq!(enemy.attack, 10);
    state.enemies.push(enemy);

    let events = tick(&mut state, &TickInput::default(), 16.0);

    assert_eq!(state.player.health, 90);
    assert!(state.enemies.iter().all(|e| e.id != 1000));
    assert!(events.contains(&GameEvent::PlayerHit {
        enemy: 1000,
        damage: 10
    }));
}

#[test]
fn single_jewel_gives_exactly_one_level() {
    let mut state = quiet_world();
    state.player.exp = 90;
    state.player.health = 35;
    assert_eq!(state.player.next_level_exp, 100);
    state.jewels.push(Jewel::new(2000, Vec2::new(5.0, 5.0)));

    let events = tick(&mut state, &TickInput::default(), 16.0);

    let player = &state.player;
    assert_eq!(player.level, 2);
    assert_eq!(player.exp, 110);
    assert_eq!(player.next_level_exp, 150);
    assert_eq!(player.health, player.max_health);
    let level_ups = events
        .iter()
        .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
        .count();
    assert_eq!(level_ups, 1);
}

#[test]
fn bullet_travels_then_is_pruned() {
    let spec = WeaponKind::Basic.spec();
    let mut bullet = Bullet::new(1, Vec2::ZERO, 0.0, &spec);
    bullet.advance();
    assert!((bullet.pos - Vec2::new(7.0, 0.0)).length() < 1e-5);

    let mut state = quiet_world();
    let settings = state.settings.clone();
    let mut far = Bullet::new(3000, Vec2::new(BULLET_MAX_DISTANCE - 3.0, 0.0), 0.0, &spec);
    assert!(!far.out_of_bounds(settings.variant, &settings.viewport, Vec2::ZERO));
    far.advance();
    assert!(far.out_of_bounds(settings.variant, &settings.viewport, Vec2::ZERO));

    state.bullets.push(Bullet::new(
        3000,
        Vec2::new(BULLET_MAX_DISTANCE - 3.0, 0.0),
        0.0,
        &spec,
    ));
    tick(&mut state, &TickInput::default(), 16.0);
    assert!(state.bullets.iter().all(|b| b.id != 3000));
}

#[test]
fn bullet_damages_only_one_enemy() {
    let spec = WeaponKind::Basic.spec();
    let mut bullet = Bullet::new(1, Vec2::ZERO, 0.0, &spec);
    let mut enemies = vec![
        Enemy::new(10, Vec2::new(10.0, 0.0), 1.0),
        Enemy::new(11, Vec2::new(12.0, 0.0), 1.0),
    ];
    assert_eq!(bullet.strike(&mut enemies), Some(0));
    assert_eq!(bullet.strike(&mut enemies), None);
    assert!(enemies[0].health < enemies[0].max_health);
    assert_eq!(enemies[1].health, enemies[1].max_health);
}

#[test]
fn chunks_follow_the_player() {
    let mut state = GameState::new(Settings::default().with_seed(7), 0.0);
    state.player.max_health = 1_000_000;
    state.player.health = 1_000_000;

    let mut input = TickInput::default();
    input.keys.press("ArrowRight");
    input.keys.press("ArrowDown");

    let mut now = 0.0;
    for _ in 0..400 {
        now += 1000.0 / 60.0;
        tick(&mut state, &input, now);
        assert_chunk_invariant(&state);
    }
    assert!(ChunkCoord::from_world(state.player.pos) != ChunkCoord::new(0, 0));
}

#[test]
fn headless_loop_survives_and_resets() {
    let mut game = GameLoop::new(Settings::arena().with_seed(99), ManualClock::new(0.0));
    game.set_autopilot(true);
    let interval = game.state().settings.frame_interval_ms();
    let finished = game.run(
        5_000,
        &mut horde_survivor::hud::NullHud,
        |g| g.clock().advance(interval),
    );
    for summary in &finished {
        assert_eq!(summary.seed, 99);
        assert!(summary.frames > 0);
    }
    assert_eq!(game.runs() as usize, finished.len());
    let state = game.state();
    assert!(state.player.health > 0);
    assert!(state.player.health <= state.player.max_health);
}
