//! Event System
//!
//! The simulation step does not mutate score, lives, or phase directly.
//! It emits discrete events which the session consumes after the step
//! returns. That keeps the step a pure world transformer and lets tests
//! assert exactly what happened in a frame.

use super::entity::Entity;

/// A queue for events of a single type. Filled during the step, read by
/// the session, cleared at end of frame.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all game events.
pub struct Events {
    /// The player picked up a coin
    pub coin_collected: EventQueue<CoinCollectedEvent>,
    /// An enemy was stomped
    pub enemy_defeated: EventQueue<EnemyDefeatedEvent>,
    /// The player was hurt (enemy contact or fell out of the level)
    pub player_hit: EventQueue<PlayerHitEvent>,
    /// The player overlapped the exit door
    pub door_reached: EventQueue<DoorReachedEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            coin_collected: EventQueue::new(),
            enemy_defeated: EventQueue::new(),
            player_hit: EventQueue::new(),
            door_reached: EventQueue::new(),
        }
    }

    /// Clear every queue. Call at end of frame.
    pub fn clear_all(&mut self) {
        self.coin_collected.clear();
        self.enemy_defeated.clear();
        self.player_hit.clear();
        self.door_reached.clear();
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Event Types
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CoinCollectedEvent {
    /// The coin entity (despawned at end of frame)
    pub coin: Entity,
    /// Score value carried so the session never re-reads a dead entity
    pub value: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct EnemyDefeatedEvent {
    /// The enemy entity (despawned at end of frame)
    pub enemy: Entity,
    pub bonus: u32,
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCause {
    /// Side or underside contact with an enemy
    EnemyContact,
    /// Left the level bounds (fell off or slid past the trailing edge)
    FellOut,
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerHitEvent {
    pub cause: HitCause,
}

#[derive(Debug, Clone, Copy)]
pub struct DoorReachedEvent;
