//! Collision System
//!
//! AABB collision against the level's tile grid. A moving body is
//! integrated one axis at a time - horizontal first, then vertical - and
//! pushed out of any solid tile it entered. The fixed axis order decides
//! corner behavior: a body clipping a corner slides along the wall rather
//! than snapping on top of it.
//!
//! Velocities are small relative to the tile size (the session clamps
//! the frame delta and level validation caps speed-like tuning at
//! `limits::MAX_SPEED`), so a pass only ever enters the adjacent tile
//! row or column and tunneling cannot occur.

use macroquad::math::Vec2;

use crate::world::{Level, TILE_SIZE};

/// Gap left between a resolved body and the tile it hit, so the next
/// frame's overlap scan does not re-detect the same tile.
const SKIN: f32 = 0.01;

/// Result of integrating one body for one frame
#[derive(Debug, Clone, Copy)]
pub struct MoveResult {
    /// Corrected position after collision
    pub pos: Vec2,
    /// Velocity with blocked components zeroed
    pub vel: Vec2,
    /// Did a downward collision get resolved this frame?
    pub on_ground: bool,
    /// Did a horizontal collision get resolved this frame?
    pub hit_wall: bool,
    pub hit_ceiling: bool,
}

/// Inclusive tile index range covering a pixel span.
fn tile_span(lo: f32, hi: f32) -> std::ops::RangeInclusive<i32> {
    let a = (lo / TILE_SIZE).floor() as i32;
    let b = ((hi - SKIN) / TILE_SIZE).floor() as i32;
    a..=b
}

/// Move an AABB through the level, resolving overlap per axis.
///
/// Post-condition: the returned box does not penetrate any solid tile.
pub fn move_and_collide(level: &Level, half: Vec2, pos: Vec2, vel: Vec2, dt: f32) -> MoveResult {
    let mut pos = pos;
    let mut vel = vel;
    let mut on_ground = false;
    let mut hit_wall = false;
    let mut hit_ceiling = false;

    // Horizontal pass
    if vel.x != 0.0 {
        pos.x += vel.x * dt;
        for ty in tile_span(pos.y - half.y, pos.y + half.y) {
            for tx in tile_span(pos.x - half.x, pos.x + half.x) {
                if !level.solid(tx, ty) {
                    continue;
                }
                if vel.x > 0.0 {
                    pos.x = pos.x.min(tx as f32 * TILE_SIZE - half.x - SKIN);
                } else {
                    pos.x = pos.x.max((tx + 1) as f32 * TILE_SIZE + half.x + SKIN);
                }
                hit_wall = true;
            }
        }
        if hit_wall {
            vel.x = 0.0;
        }
    }

    // Vertical pass
    if vel.y != 0.0 {
        pos.y += vel.y * dt;
        for ty in tile_span(pos.y - half.y, pos.y + half.y) {
            for tx in tile_span(pos.x - half.x, pos.x + half.x) {
                if !level.solid(tx, ty) {
                    continue;
                }
                if vel.y > 0.0 {
                    pos.y = pos.y.min(ty as f32 * TILE_SIZE - half.y - SKIN);
                    on_ground = true;
                } else {
                    pos.y = pos.y.max((ty + 1) as f32 * TILE_SIZE + half.y + SKIN);
                    hit_ceiling = true;
                }
            }
        }
        if on_ground || hit_ceiling {
            vel.y = 0.0;
        }
    }

    MoveResult { pos, vel, on_ground, hit_wall, hit_ceiling }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{LevelSource, Tuning};
    use macroquad::math::vec2;

    fn level(rows: &[&str]) -> Level {
        Level::from_source(&LevelSource {
            name: "collision test".to_string(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
            tuning: Tuning::default(),
        })
        .unwrap()
    }

    const HALF: Vec2 = Vec2::new(15.0, 22.0);

    fn assert_no_penetration(level: &Level, pos: Vec2) {
        for ty in tile_span(pos.y - HALF.y, pos.y + HALF.y) {
            for tx in tile_span(pos.x - HALF.x, pos.x + HALF.x) {
                assert!(
                    !level.solid(tx, ty),
                    "body at {:?} penetrates tile ({}, {})",
                    pos, tx, ty
                );
            }
        }
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let level = level(&["p___d", "_____", "xxxxx"]);
        // Start above the floor at row 2 (top edge y = 100)
        let mut pos = vec2(60.0, 40.0);
        let mut vel = vec2(0.0, 300.0);

        let mut landed = false;
        for _ in 0..60 {
            let result = move_and_collide(&level, HALF, pos, vel, 1.0 / 60.0);
            pos = result.pos;
            vel = result.vel;
            assert_no_penetration(&level, pos);
            if result.on_ground {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert!((pos.y + HALF.y - 100.0).abs() < 1.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_fastest_permitted_fall_cannot_tunnel() {
        // The worst case validation allows: top speed on the slowest
        // simulated frame, aimed at a one-tile floor
        let level = level(&["p____d", "______", "______", "xxxxxx"]);
        let pos = vec2(60.0, 100.0);
        let vel = vec2(0.0, crate::world::limits::MAX_SPEED);

        let result = move_and_collide(&level, HALF, pos, vel, 1.0 / 30.0);
        assert!(result.on_ground);
        assert!(result.pos.y + HALF.y <= 150.0);
        assert_eq!(result.vel.y, 0.0);
        assert_no_penetration(&level, result.pos);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let level = level(&["_____", "p__xd", "xxxxx"]);
        // Standing on row 2, just left of the wall at column 3 (left edge x = 150)
        let pos = vec2(133.0, 78.0 - SKIN);
        let vel = vec2(600.0, 0.0);

        let result = move_and_collide(&level, HALF, pos, vel, 1.0 / 60.0);
        assert!(result.hit_wall);
        assert_eq!(result.vel.x, 0.0);
        assert!(result.pos.x + HALF.x <= 150.0);
        assert_no_penetration(&level, result.pos);
    }

    #[test]
    fn test_ceiling_stops_jump() {
        let level = level(&["xxxxx", "p___d", "xxxxx"]);
        // Standing on row 2, jumping into the ceiling at row 0
        let pos = vec2(60.0, 78.0 - SKIN);
        let vel = vec2(0.0, -720.0);

        let result = move_and_collide(&level, HALF, pos, vel, 1.0 / 60.0);
        assert!(result.hit_ceiling);
        assert_eq!(result.vel.y, 0.0);
        assert!(result.pos.y - HALF.y >= 50.0);
        assert_no_penetration(&level, result.pos);
    }

    #[test]
    fn test_corner_lands_instead_of_bonking() {
        // Falling diagonally onto the top-left corner of a block: the
        // horizontal pass sees no overlap at the old height, so the
        // vertical pass wins and the body lands on top.
        let level = level(&["p___d", "__x__", "xxxxx"]);
        let pos = vec2(85.0, 27.0);
        let vel = vec2(120.0, 120.0);

        let result = move_and_collide(&level, HALF, pos, vel, 1.0 / 60.0);
        assert!(result.on_ground);
        assert!(!result.hit_wall);
        assert!((result.pos.y + HALF.y - 50.0).abs() < 1.0);
        assert_no_penetration(&level, result.pos);
    }

    #[test]
    fn test_walking_off_the_grid_is_unobstructed() {
        let level = level(&["p___d", "xxxxx"]);
        // There are no implicit boundary walls
        let pos = vec2(10.0, 28.0 - SKIN);
        let vel = vec2(-300.0, 0.0);

        let result = move_and_collide(&level, HALF, pos, vel, 1.0 / 60.0);
        assert!(!result.hit_wall);
        assert!(result.pos.x < 10.0);
    }
}
