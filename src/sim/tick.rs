//! Per-frame simulation step
//!
//! Fixed order: input → movement → world streaming / spawning → weapons →
//! bullets → enemies → player contact → jewels → health clamp → HUD.
//! Removals are marked during iteration and compacted afterwards.

use std::collections::HashSet;

use glam::Vec2;

use super::autopilot;
use super::chunk::{self, ChunkCoord};
use super::collision::overlaps;
use super::state::{Bullet, EntityId, GameEvent, GameState, Jewel};
use crate::consts::*;
use crate::input::KeyState;
use crate::settings::WorldVariant;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub keys: KeyState,
    /// Idle/demo mode - AI drives the player instead of the keys
    pub autopilot: bool,
}

/// Advance the game state by one frame at clock reading `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.is_over() {
        return events;
    }
    state.frame += 1;

    move_player(state, input);

    match state.variant() {
        WorldVariant::Infinite => chunk::stream_chunks(state, &mut events),
        WorldVariant::Arena => spawn_from_edges(state, now_ms, &mut events),
    }

    fire_weapons(state, now_ms, &mut events);
    update_bullets(state, &mut events);
    update_enemies(state, &mut events);
    update_jewels(state, now_ms, &mut events);

    state.player.clamp_health();
    state.refresh_hud();

    events
}

fn move_player(state: &mut GameState, input: &TickInput) {
    let axes = if input.autopilot {
        autopilot::steer(state)
    } else {
        input.keys.movement()
    };

    let player = &mut state.player;
    player.pos += axes * player.speed;

    if state.settings.variant == WorldVariant::Arena {
        let arena = &state.settings.viewport;
        let r = player.radius;
        player.pos = player.pos.clamp(
            Vec2::splat(r),
            Vec2::new((arena.width - r).max(r), (arena.height - r).max(r)),
        );
    }
}

fn spawn_from_edges(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    let spawned = state.spawner.update(
        now_ms,
        state.player.level,
        &state.settings.viewport,
        &mut state.rng,
        &mut state.ids,
    );
    if let Some(enemy) = spawned {
        log::debug!("Enemy {} spawned at {:?}", enemy.id, enemy.pos);
        events.push(GameEvent::EnemySpawned { enemy: enemy.id });
        state.enemies.push(enemy);
    }
}

fn fire_weapons(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    let origin = state.player.pos;
    let mode = state.settings.spread;
    for weapon in &mut state.player.weapons {
        let Some(volley) = weapon.update(now_ms, &mut state.rng, mode) else {
            continue;
        };
        let spec = weapon.spec();
        events.push(GameEvent::Fired {
            weapon: weapon.kind,
            count: volley.len(),
        });
        for angle in volley {
            state
                .bullets
                .push(Bullet::new(state.ids.next_id(), origin, angle, &spec));
        }
    }
}

fn update_bullets(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for bullet in &mut state.bullets {
        bullet.advance();
        if let Some(idx) = bullet.strike(&mut state.enemies) {
            events.push(GameEvent::EnemyHit {
                enemy: state.enemies[idx].id,
                damage: bullet.damage,
            });
        }
    }

    let variant = state.settings.variant;
    let viewport = state.settings.viewport;
    let player = state.player.pos;
    state
        .bullets
        .retain(|b| !b.consumed && !b.out_of_bounds(variant, &viewport, player));
}

fn update_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let target = state.player.pos;
    let mut removed: HashSet<EntityId> = HashSet::new();
    let mut released: Vec<(Option<ChunkCoord>, EntityId)> = Vec::new();
    let mut drops: Vec<(Option<ChunkCoord>, Vec2, EntityId)> = Vec::new();

    for i in 0..state.enemies.len() {
        if !state.is_active(&state.enemies[i]) {
            continue;
        }
        let enemy = &mut state.enemies[i];
        enemy.pursue(target);

        if enemy.is_dead() {
            state.score += KILL_REWARD;
            drops.push((enemy.chunk, enemy.pos, enemy.id));
            removed.insert(enemy.id);
            released.push((enemy.chunk, enemy.id));
        }

        // Contact is single-use: the enemy is gone regardless of its health.
        // A corpse still touching the player deals its hit in the same frame.
        if overlaps(&state.player, &state.enemies[i]) {
            let enemy = &state.enemies[i];
            state.player.take_damage(enemy.attack);
            log::debug!(
                "Player hit by enemy {} for {}, health {}",
                enemy.id,
                enemy.attack,
                state.player.health
            );
            events.push(GameEvent::PlayerHit {
                enemy: enemy.id,
                damage: enemy.attack,
            });
            if removed.insert(enemy.id) {
                released.push((enemy.chunk, enemy.id));
            }
        }
    }

    if removed.is_empty() {
        return;
    }
    state.enemies.retain(|e| !removed.contains(&e.id));
    for (coord, id) in released {
        chunk::release_enemy(state, coord, id);
    }

    for (coord, pos, enemy) in drops {
        let id = state.ids.next_id();
        let mut jewel = Jewel::new(id, pos);
        jewel.chunk = chunk::adopt_jewel(state, coord, id);
        state.jewels.push(jewel);
        events.push(GameEvent::EnemyKilled { enemy, jewel: id });
    }
}

fn update_jewels(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    let mut collected: Vec<(Option<ChunkCoord>, EntityId)> = Vec::new();

    for i in 0..state.jewels.len() {
        if !state.is_active(&state.jewels[i]) {
            continue;
        }
        state.jewels[i].attract(state.player.pos);

        if overlaps(&state.player, &state.jewels[i]) {
            let jewel = &mut state.jewels[i];
            jewel.collected = true;
            let (id, exp, coord) = (jewel.id, jewel.exp, jewel.chunk);
            events.push(GameEvent::JewelCollected { jewel: id, exp });
            state.player.gain_exp(exp, now_ms, events);
            collected.push((coord, id));
        }
    }

    state.jewels.retain(|j| !j.collected);
    for (coord, id) in collected {
        chunk::release_jewel(state, coord, id);
    }
}
