//! Entity System with Generational Indices
//!
//! Entities are lightweight handles to game objects. Each slot carries a
//! generation counter that increments when the slot is freed, so a stale
//! handle to a despawned entity never matches whatever reuses the slot.
//! That matters here: the step holds on to enemy handles collected before
//! interactions are resolved.

/// A unique identifier for a game entity.
///
/// Two entities with the same index but different generations are
/// different entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Index into component storage.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Allocates and tracks entity lifetimes.
pub struct EntityAllocator {
    /// Current generation for each slot ever allocated
    generations: Vec<u32>,
    /// Freed slots available for reuse
    free_indices: Vec<u32>,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_indices: Vec::new(),
            alive_count: 0,
        }
    }

    /// Allocate a new entity, reusing a freed slot when one exists.
    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity::new(index, 0)
        }
    }

    /// Free an entity. Returns false if it was already dead.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        // Invalidate outstanding handles to this slot
        self.generations[entity.index as usize] += 1;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index as usize)
            .map(|&gen| gen == entity.generation)
            .unwrap_or(false)
    }

    /// Current generation of a slot. Used to rebuild a handle from a
    /// component-storage index; only valid for slots whose components
    /// are still present (components are cleared on despawn).
    pub fn generation_of(&self, index: u32) -> u32 {
        self.generations.get(index as usize).copied().unwrap_or(0)
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = EntityAllocator::new();

        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);

        assert!(alloc.free(e1));
        assert!(!alloc.free(e1));
        assert_eq!(alloc.alive_count(), 1);
        assert!(!alloc.is_alive(e1));
        assert!(alloc.is_alive(e2));
    }

    #[test]
    fn test_generation_prevents_stale_handles() {
        let mut alloc = EntityAllocator::new();

        let e1 = alloc.allocate();
        alloc.free(e1);

        let e2 = alloc.allocate();
        assert_eq!(e2.index(), e1.index());
        assert_ne!(e2.generation(), e1.generation());
        assert!(!alloc.is_alive(e1));
        assert!(alloc.is_alive(e2));
    }
}
