//! Game World
//!
//! Central container for all run-time entity state: allocation, typed
//! component storages, and deferred despawn. Collected coins and defeated
//! enemies are simply despawned entities, an overlay on top of the
//! immutable level grid.

use macroquad::math::{vec2, Vec2};

use super::component::ComponentStorage;
use super::components::*;
use super::entity::{Entity, EntityAllocator};
use crate::world::{EnemyKind, Level, TILE_SIZE};

pub struct World {
    entities: EntityAllocator,
    /// Entities queued for despawn at end of frame, so systems can keep
    /// iterating storages without invalidation
    despawn_queue: Vec<Entity>,

    /// The player entity, if spawned
    pub player: Option<Entity>,

    pub transforms: ComponentStorage<Transform>,
    pub velocities: ComponentStorage<Velocity>,
    pub colliders: ComponentStorage<Collider>,
    pub movers: ComponentStorage<MoveState>,

    // Kind markers
    pub players: ComponentStorage<Player>,
    pub enemies: ComponentStorage<Enemy>,
    pub coins: ComponentStorage<Coin>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            despawn_queue: Vec::new(),
            player: None,
            transforms: ComponentStorage::new(),
            velocities: ComponentStorage::new(),
            colliders: ComponentStorage::new(),
            movers: ComponentStorage::new(),
            players: ComponentStorage::new(),
            enemies: ComponentStorage::new(),
            coins: ComponentStorage::new(),
        }
    }

    /// Build the run-time world for a freshly loaded level.
    pub fn from_level(level: &Level) -> Self {
        let mut world = World::new();
        world.spawn_player(spawn_point(level.player_start, body::PLAYER_HALF));
        for spawn in &level.enemy_spawns {
            world.spawn_enemy(spawn_point(spawn.pos, body::ENEMY_HALF), spawn.kind);
        }
        for &pos in &level.coin_spawns {
            world.spawn_coin(pos, level.tuning.coin_value);
        }
        world
    }

    // =========================================================================
    // Entity management
    // =========================================================================

    /// Spawn a bare entity with a transform.
    pub fn spawn_at(&mut self, pos: Vec2) -> Entity {
        let entity = self.entities.allocate();
        self.transforms.insert(entity, Transform::from_pos(pos));
        entity
    }

    /// Queue an entity for despawn at end of frame.
    pub fn despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) {
            self.despawn_queue.push(entity);
        }
    }

    /// Immediately despawn an entity and all its components.
    pub fn despawn_immediate(&mut self, entity: Entity) {
        if !self.entities.free(entity) {
            return;
        }
        let idx = entity.index();
        self.transforms.clear_slot(idx);
        self.velocities.clear_slot(idx);
        self.colliders.clear_slot(idx);
        self.movers.clear_slot(idx);
        self.players.clear_slot(idx);
        self.enemies.clear_slot(idx);
        self.coins.clear_slot(idx);
        if self.player == Some(entity) {
            self.player = None;
        }
    }

    /// Process queued despawns. Call at end of frame.
    pub fn flush_despawns(&mut self) {
        let queue = std::mem::take(&mut self.despawn_queue);
        for entity in queue {
            self.despawn_immediate(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// Rebuild an entity handle from a component-storage slot. Valid for
    /// slots observed during component iteration this frame (despawns are
    /// deferred, so such slots are alive).
    pub fn entity(&self, index: u32) -> Entity {
        Entity::new(index, self.entities.generation_of(index))
    }

    // =========================================================================
    // Spawners
    // =========================================================================

    pub fn spawn_player(&mut self, pos: Vec2) -> Entity {
        let entity = self.spawn_at(pos);
        self.velocities.insert(entity, Velocity::default());
        self.colliders.insert(entity, Collider::new(body::PLAYER_HALF));
        self.movers.insert(entity, MoveState::default());
        self.players.insert(entity, Player::default());
        self.player = Some(entity);
        entity
    }

    pub fn spawn_enemy(&mut self, pos: Vec2, kind: EnemyKind) -> Entity {
        let entity = self.spawn_at(pos);
        self.velocities.insert(entity, Velocity::default());
        self.colliders.insert(entity, Collider::new(body::ENEMY_HALF));
        self.movers.insert(entity, MoveState { on_ground: false, facing: Facing::Left });
        self.enemies.insert(entity, Enemy { kind });
        entity
    }

    pub fn spawn_coin(&mut self, pos: Vec2, value: u32) -> Entity {
        let entity = self.spawn_at(pos);
        self.colliders.insert(entity, Collider::new(body::COIN_HALF));
        self.coins.insert(entity, Coin { value });
        entity
    }
}

/// Rest a body's feet on the bottom edge of its spawn tile.
fn spawn_point(tile_center: Vec2, half: Vec2) -> Vec2 {
    vec2(tile_center.x, tile_center.y + TILE_SIZE * 0.5 - half.y)
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Level, LevelSource, Tuning};

    fn test_level() -> Level {
        Level::from_source(&LevelSource {
            name: "test".to_string(),
            rows: vec!["p_e_s_oo_d".to_string(), "xxxxxxxxxx".to_string()],
            tuning: Tuning::default(),
        })
        .unwrap()
    }

    #[test]
    fn test_populate_from_level() {
        let world = World::from_level(&test_level());

        assert!(world.player.is_some());
        assert_eq!(world.enemies.count(), 2);
        assert_eq!(world.coins.count(), 2);
        // player + 2 enemies + 2 coins
        assert_eq!(world.entity_count(), 5);
    }

    #[test]
    fn test_spawned_bodies_rest_on_tile_bottom() {
        let world = World::from_level(&test_level());
        let player = world.player.unwrap();
        let pos = world.transforms.get(player).unwrap().pos;
        // Feet at the bottom edge of the spawn tile (y = 50)
        assert_eq!(pos.y + body::PLAYER_HALF.y, 50.0);
    }

    #[test]
    fn test_deferred_despawn() {
        let mut world = World::from_level(&test_level());
        let coin_slot = world.coins.iter().next().unwrap().0;
        let coin = world.entity(coin_slot);

        world.despawn(coin);
        // Still visible until the end-of-frame flush
        assert!(world.is_alive(coin));
        world.flush_despawns();
        assert!(!world.is_alive(coin));
        assert_eq!(world.coins.count(), 1);
    }

    #[test]
    fn test_despawning_player_clears_handle() {
        let mut world = World::from_level(&test_level());
        let player = world.player.unwrap();
        world.despawn_immediate(player);
        assert_eq!(world.player, None);
    }
}
