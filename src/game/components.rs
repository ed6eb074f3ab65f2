//! Game Components
//!
//! Plain data structs attached to entities. Behavior lives in the
//! simulation step; entity kinds are marker components so the collision
//! resolver can handle every pairing exhaustively.

use macroquad::math::{Rect, Vec2};

use crate::world::EnemyKind;

/// World-space position. For bodies this is the AABB center.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transform {
    pub pos: Vec2,
}

impl Transform {
    pub fn from_pos(pos: Vec2) -> Self {
        Self { pos }
    }
}

/// Velocity in pixels per second. Positive y is downward (screen space).
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity(pub Vec2);

/// Axis-aligned collision box, stored as half extents around the
/// entity's transform.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub half: Vec2,
}

impl Collider {
    pub fn new(half: Vec2) -> Self {
        Self { half }
    }

    /// The box in world space for a given center position.
    pub fn rect(&self, pos: Vec2) -> Rect {
        Rect::new(
            pos.x - self.half.x,
            pos.y - self.half.y,
            self.half.x * 2.0,
            self.half.y * 2.0,
        )
    }
}

/// Horizontal facing, for sprites and enemy patrol direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Per-body movement state maintained by collision resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveState {
    /// True exactly when the body rested on a block top as of the last
    /// resolution
    pub on_ground: bool,
    pub facing: Facing,
}

/// Marks the player entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player {
    /// Frames of post-hit grace during which contact damage is ignored
    pub hurt_cooldown: u8,
}

/// Post-hit grace period in frames.
pub const HURT_COOLDOWN_FRAMES: u8 = 30;

/// Marks enemy entities.
#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub kind: EnemyKind,
}

/// Marks collectible coins.
#[derive(Debug, Clone, Copy)]
pub struct Coin {
    pub value: u32,
}

/// Body sizes in half extents. Everything fits inside one 50px tile.
pub mod body {
    use macroquad::math::Vec2;

    pub const PLAYER_HALF: Vec2 = Vec2::new(15.0, 22.0);
    pub const ENEMY_HALF: Vec2 = Vec2::new(18.0, 18.0);
    pub const COIN_HALF: Vec2 = Vec2::new(10.0, 10.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    #[test]
    fn test_collider_rect() {
        let collider = Collider::new(vec2(15.0, 22.0));
        let rect = collider.rect(vec2(100.0, 200.0));
        assert_eq!(rect.left(), 85.0);
        assert_eq!(rect.right(), 115.0);
        assert_eq!(rect.top(), 178.0);
        assert_eq!(rect.bottom(), 222.0);
    }

    #[test]
    fn test_facing_flip() {
        assert_eq!(Facing::Left.flipped(), Facing::Right);
        assert_eq!(Facing::Right.sign(), 1.0);
        assert_eq!(Facing::Left.sign(), -1.0);
    }
}
