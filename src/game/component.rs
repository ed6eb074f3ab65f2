//! Component Storage
//!
//! A component is plain data attached to an entity. Storage is a sparse
//! array indexed by `entity.index()` with `None` holes for entities that
//! lack the component. At this game's scale (tens of entities per level)
//! sparse arrays beat anything cleverer.

use super::entity::Entity;

/// Sparse storage for a single component type.
pub struct ComponentStorage<T> {
    data: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert a component, replacing any existing one.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some(component);
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.data.get_mut(entity.index() as usize).and_then(|slot| slot.take())
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.data.get(entity.index() as usize).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.data.get_mut(entity.index() as usize).and_then(|slot| slot.as_mut())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Iterate over all (index, component) pairs. Indices come back as
    /// raw u32 slots; rebuild entities via `World::entity`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|c| (idx as u32, c)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_mut().map(|c| (idx as u32, c)))
    }

    /// Drop the component in a raw slot. Called on despawn.
    pub fn clear_slot(&mut self, index: u32) {
        if let Some(slot) = self.data.get_mut(index as usize) {
            *slot = None;
        }
    }

    /// Number of entities holding this component.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        let entity = Entity::new(5, 0);

        storage.insert(entity, 42);
        assert_eq!(storage.get(entity), Some(&42));
        assert!(storage.contains(entity));

        assert_eq!(storage.remove(entity), Some(42));
        assert!(!storage.contains(entity));
    }

    #[test]
    fn test_sparse_holes() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        storage.insert(Entity::new(0, 0), "zero");
        storage.insert(Entity::new(7, 0), "seven");

        assert_eq!(storage.count(), 2);
        assert!(!storage.contains(Entity::new(3, 0)));

        let slots: Vec<u32> = storage.iter().map(|(idx, _)| idx).collect();
        assert_eq!(slots, vec![0, 7]);
    }
}
