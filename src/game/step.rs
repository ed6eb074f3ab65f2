//! Simulation Step
//!
//! Advances the world by one frame and emits the frame's events.
//!
//! System order:
//!   1. Player intent (horizontal acceleration, grounded jump)
//!   2. Enemy steering (walkers turn at walls, sentries also at ledges)
//!   3. Gravity + integration + tile collision, per moving body
//!   4. Out-of-bounds handling (fell off the world / past the edges)
//!   5. Player-vs-enemy, player-vs-coin, player-vs-door interactions
//!   6. Cooldown ticks and deferred despawn flush
//!
//! The step never touches score, lives, or phase - those belong to the
//! session, which reacts to the returned events.

use macroquad::math::Vec2;

use super::collision::move_and_collide;
use super::components::{body, Facing, HURT_COOLDOWN_FRAMES};
use super::event::{
    CoinCollectedEvent, DoorReachedEvent, EnemyDefeatedEvent, Events, HitCause, PlayerHitEvent,
};
use super::world::World;
use crate::input::FrameInput;
use crate::world::{EnemyKind, Level, TILE_SIZE};

/// Move a value toward a target by at most `max_delta`.
fn approach(value: f32, target: f32, max_delta: f32) -> f32 {
    if value < target {
        (value + max_delta).min(target)
    } else {
        (value - max_delta).max(target)
    }
}

/// Run one frame of simulation. `dt` must already be clamped by the
/// caller; the step itself is total and never fails.
pub fn simulate(world: &mut World, level: &Level, input: &FrameInput, dt: f32, events: &mut Events) {
    apply_player_intent(world, level, input, dt);
    steer_enemies(world, level);
    integrate_bodies(world, level, dt);
    handle_out_of_bounds(world, level, events);
    resolve_interactions(world, level, events);

    if let Some(player) = world.player {
        if let Some(state) = world.players.get_mut(player) {
            state.hurt_cooldown = state.hurt_cooldown.saturating_sub(1);
        }
    }

    world.flush_despawns();
}

// =============================================================================
// Player intent
// =============================================================================

fn apply_player_intent(world: &mut World, level: &Level, input: &FrameInput, dt: f32) {
    let Some(player) = world.player else { return };
    let tuning = &level.tuning;

    let dir = input.move_dir();
    let grounded = world.movers.get(player).map(|m| m.on_ground).unwrap_or(false);

    if let Some(vel) = world.velocities.get_mut(player) {
        vel.0.x = approach(vel.0.x, dir * tuning.move_speed, tuning.move_accel * dt);

        // A jump impulse only ever comes from solid ground: the grounded
        // flag is read at the start of the frame, before integration.
        if input.jump_pressed && grounded {
            vel.0.y = -tuning.jump_impulse;
        }
    }

    if dir != 0.0 {
        if let Some(mover) = world.movers.get_mut(player) {
            mover.facing = if dir < 0.0 { Facing::Left } else { Facing::Right };
        }
    }
}

// =============================================================================
// Enemy steering
// =============================================================================

fn steer_enemies(world: &mut World, level: &Level) {
    let tuning = &level.tuning;
    let enemies: Vec<(u32, EnemyKind)> =
        world.enemies.iter().map(|(idx, e)| (idx, e.kind)).collect();

    for (idx, kind) in enemies {
        let entity = world.entity(idx);
        let Some(pos) = world.transforms.get(entity).map(|t| t.pos) else { continue };
        let Some(mover) = world.movers.get_mut(entity) else { continue };

        // Sentries refuse to walk off their platform: probe the tile
        // below and ahead of the leading edge.
        if kind == EnemyKind::Sentry && mover.on_ground {
            let ahead_x = pos.x + mover.facing.sign() * (body::ENEMY_HALF.x + 1.0);
            let below_y = pos.y + body::ENEMY_HALF.y + 1.0;
            let tx = Level::tile_at(ahead_x);
            let ty = Level::tile_at(below_y);
            if !level.solid(tx, ty) {
                mover.facing = mover.facing.flipped();
            }
        }

        let facing = mover.facing;
        if let Some(vel) = world.velocities.get_mut(entity) {
            vel.0.x = facing.sign() * tuning.enemy_walk_speed;
        }
    }
}

// =============================================================================
// Integration
// =============================================================================

fn integrate_bodies(world: &mut World, level: &Level, dt: f32) {
    let tuning = &level.tuning;
    let moving: Vec<u32> = world
        .velocities
        .iter()
        .map(|(idx, _)| idx)
        .filter(|&idx| world.colliders.contains(world.entity(idx)))
        .collect();

    for idx in moving {
        let entity = world.entity(idx);
        let Some(pos) = world.transforms.get(entity).map(|t| t.pos) else { continue };
        let Some(half) = world.colliders.get(entity).map(|c| c.half) else { continue };
        let Some(mut vel) = world.velocities.get(entity).map(|v| v.0) else { continue };

        vel.y = (vel.y + tuning.gravity * dt).min(tuning.max_fall_speed);

        let result = move_and_collide(level, half, pos, vel, dt);

        if let Some(transform) = world.transforms.get_mut(entity) {
            transform.pos = result.pos;
        }
        if let Some(velocity) = world.velocities.get_mut(entity) {
            velocity.0 = result.vel;
        }
        if let Some(mover) = world.movers.get_mut(entity) {
            mover.on_ground = result.on_ground;
            // Enemies patrol: a wall means turn around
            if result.hit_wall && world.enemies.contains(entity) {
                mover.facing = mover.facing.flipped();
            }
        }
    }
}

// =============================================================================
// Bounds
// =============================================================================

/// A body fully outside the level is gone: enemies despawn quietly, the
/// player is hurt exactly as if hit. This avoids requiring boundary
/// walls in every level.
fn out_of_bounds(level: &Level, pos: Vec2, half: Vec2) -> bool {
    pos.y - half.y > level.pixel_height()
        || pos.x + half.x < 0.0
        || pos.x - half.x > level.pixel_width()
}

fn handle_out_of_bounds(world: &mut World, level: &Level, events: &mut Events) {
    let enemies: Vec<u32> = world.enemies.iter().map(|(idx, _)| idx).collect();
    for idx in enemies {
        let entity = world.entity(idx);
        if let (Some(tf), Some(col)) = (world.transforms.get(entity), world.colliders.get(entity)) {
            if out_of_bounds(level, tf.pos, col.half) {
                world.despawn(entity);
            }
        }
    }

    let Some(player) = world.player else { return };
    if let (Some(tf), Some(col)) = (world.transforms.get(player), world.colliders.get(player)) {
        if out_of_bounds(level, tf.pos, col.half) {
            let grace = world.players.get(player).map(|p| p.hurt_cooldown).unwrap_or(0);
            if grace == 0 {
                events.player_hit.send(PlayerHitEvent { cause: HitCause::FellOut });
                if let Some(state) = world.players.get_mut(player) {
                    state.hurt_cooldown = HURT_COOLDOWN_FRAMES;
                }
            }
        }
    }
}

// =============================================================================
// Interactions
// =============================================================================

fn resolve_interactions(world: &mut World, level: &Level, events: &mut Events) {
    let Some(player) = world.player else { return };
    let Some(player_pos) = world.transforms.get(player).map(|t| t.pos) else { return };
    let Some(player_col) = world.colliders.get(player).copied() else { return };
    let player_rect = player_col.rect(player_pos);
    let player_vy = world.velocities.get(player).map(|v| v.0.y).unwrap_or(0.0);

    // Enemies: stomp or get hurt
    let enemies: Vec<u32> = world.enemies.iter().map(|(idx, _)| idx).collect();
    for idx in enemies {
        let entity = world.entity(idx);
        if !world.is_alive(entity) {
            continue;
        }
        let Some(enemy_pos) = world.transforms.get(entity).map(|t| t.pos) else { continue };
        let Some(enemy_col) = world.colliders.get(entity) else { continue };
        if !player_rect.overlaps(&enemy_col.rect(enemy_pos)) {
            continue;
        }

        // Stomp: the player is falling and their feet are above the
        // enemy's vertical midpoint. Anything else is contact damage.
        let stomp = player_vy > 0.0 && player_rect.bottom() < enemy_pos.y;
        if stomp {
            world.despawn(entity);
            events.enemy_defeated.send(EnemyDefeatedEvent {
                enemy: entity,
                bonus: level.tuning.stomp_bonus,
            });
            if let Some(vel) = world.velocities.get_mut(player) {
                vel.0.y = -level.tuning.stomp_bounce;
            }
        } else {
            let grace = world.players.get(player).map(|p| p.hurt_cooldown).unwrap_or(0);
            if grace == 0 {
                events.player_hit.send(PlayerHitEvent { cause: HitCause::EnemyContact });
                if let Some(state) = world.players.get_mut(player) {
                    state.hurt_cooldown = HURT_COOLDOWN_FRAMES;
                }
            }
        }
    }

    // Coins: collect on overlap. Despawn makes re-collection impossible.
    let coins: Vec<u32> = world.coins.iter().map(|(idx, _)| idx).collect();
    for idx in coins {
        let entity = world.entity(idx);
        let Some(coin_pos) = world.transforms.get(entity).map(|t| t.pos) else { continue };
        let Some(coin_col) = world.colliders.get(entity) else { continue };
        let Some(coin) = world.coins.get(entity).copied() else { continue };
        if player_rect.overlaps(&coin_col.rect(coin_pos)) {
            world.despawn(entity);
            events.coin_collected.send(CoinCollectedEvent { coin: entity, value: coin.value });
        }
    }

    // Door
    if player_rect.overlaps(&level.door) {
        events.door_reached.send(DoorReachedEvent);
    }
}

/// Where a freshly spawned or respawned player stands for a level.
pub fn player_spawn_pos(level: &Level) -> Vec2 {
    Vec2::new(
        level.player_start.x,
        level.player_start.y + TILE_SIZE * 0.5 - body::PLAYER_HALF.y,
    )
}
