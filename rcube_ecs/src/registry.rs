use std::collections::HashMap;

use crate::components::Family;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::mask::ComponentMask;

/// Result of flipping one bit in an entity's mask.
///
/// The world uses `before`/`after` to decide which system filters the entity
/// entered or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskChange {
    pub entity: Entity,
    pub family: Family,
    pub before: ComponentMask,
    pub after: ComponentMask,
}

impl MaskChange {
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }

    /// The entity matched `filter` after the change but not before.
    pub fn entered(&self, filter: ComponentMask) -> bool {
        !self.before.contains_all(filter) && self.after.contains_all(filter)
    }

    /// The entity matched `filter` before the change but not after.
    pub fn left(&self, filter: ComponentMask) -> bool {
        self.before.contains_all(filter) && !self.after.contains_all(filter)
    }
}

/// Issues entity ids and tracks which component families each live entity
/// has.
///
/// This is the authoritative answer to "does `e` have a `T`" during filtering.
/// Ids increase monotonically and are never recycled.
pub struct EntityRegistry {
    masks: HashMap<Entity, ComponentMask>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            masks: HashMap::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Returns a fresh entity with an empty mask.
    pub fn create(&mut self) -> Entity {
        let entity = Entity::new(self.next_id);
        self.next_id += 1;
        self.masks.insert(entity, ComponentMask::EMPTY);
        entity
    }

    /// Forgets `entity`, returning the mask it had.
    ///
    /// Destroying an unknown or already destroyed entity returns `None` and
    /// changes nothing.
    pub fn destroy(&mut self, entity: Entity) -> Option<ComponentMask> {
        self.masks.remove(&entity)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.masks.contains_key(&entity)
    }

    /// Current mask of `entity`, or `None` if it is not alive.
    pub fn mask(&self, entity: Entity) -> Option<ComponentMask> {
        self.masks.get(&entity).copied()
    }

    pub fn set_component_bit(&mut self, entity: Entity, family: Family) -> Result<MaskChange, EcsError> {
        self.update_mask(entity, family, |mask| mask.insert(family))
    }

    pub fn clear_component_bit(&mut self, entity: Entity, family: Family) -> Result<MaskChange, EcsError> {
        self.update_mask(entity, family, |mask| mask.remove(family))
    }

    fn update_mask(
        &mut self,
        entity: Entity,
        family: Family,
        f: impl FnOnce(&mut ComponentMask),
    ) -> Result<MaskChange, EcsError> {
        let mask = self
            .masks
            .get_mut(&entity)
            .ok_or(EcsError::UnknownEntity(entity))?;
        let before = *mask;
        f(mask);
        Ok(MaskChange {
            entity,
            family,
            before,
            after: *mask,
        })
    }

    /// True when `entity` is alive and has every family in `filter`.
    pub fn matches(&self, entity: Entity, filter: ComponentMask) -> bool {
        self.masks
            .get(&entity)
            .map(|mask| mask.contains_all(filter))
            .unwrap_or(false)
    }

    /// Returns the number of live entities.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self.masks.keys().copied().collect();
        entities.sort();
        entities
    }

    /// Forgets every entity. Ids keep counting up from where they were.
    pub fn clear(&mut self) {
        self.masks.clear();
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Component;

    #[derive(Component)]
    struct Position;

    #[derive(Component)]
    struct Velocity;

    #[test]
    fn test_create_is_unique() {
        let mut registry = EntityRegistry::new();
        let a = registry.create();
        let b = registry.create();

        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(registry.mask(a), Some(ComponentMask::EMPTY));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut registry = EntityRegistry::new();
        let e = registry.create();
        registry.set_component_bit(e, Position::family()).unwrap();

        assert_eq!(registry.destroy(e), Some(ComponentMask::of::<Position>()));
        assert_eq!(registry.destroy(e), None);
        assert!(!registry.is_alive(e));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_not_recycled() {
        let mut registry = EntityRegistry::new();
        let a = registry.create();
        registry.destroy(a);
        registry.clear();
        let b = registry.create();
        assert_ne!(a, b);
    }

    #[test]
    fn test_matches_tracks_mask() {
        let mut registry = EntityRegistry::new();
        let e = registry.create();
        let filter = ComponentMask::of::<Position>().with::<Velocity>();

        assert!(!registry.matches(e, filter));

        let change = registry.set_component_bit(e, Position::family()).unwrap();
        assert!(!change.entered(filter));
        assert!(!registry.matches(e, filter));

        let change = registry.set_component_bit(e, Velocity::family()).unwrap();
        assert!(change.entered(filter));
        assert!(registry.matches(e, filter));

        let change = registry.clear_component_bit(e, Position::family()).unwrap();
        assert!(change.left(filter));
        assert!(!registry.matches(e, filter));
        assert!(registry.matches(e, ComponentMask::of::<Velocity>()));
    }

    #[test]
    fn test_repeated_bit_is_noop() {
        let mut registry = EntityRegistry::new();
        let e = registry.create();
        registry.set_component_bit(e, Position::family()).unwrap();
        let change = registry.set_component_bit(e, Position::family()).unwrap();
        assert!(change.is_noop());
    }

    #[test]
    fn test_unknown_entity() {
        let mut registry = EntityRegistry::new();
        let e = registry.create();
        registry.destroy(e);

        assert_eq!(
            registry.set_component_bit(e, Position::family()),
            Err(EcsError::UnknownEntity(e))
        );
        assert!(!registry.matches(e, ComponentMask::EMPTY));
    }
}
