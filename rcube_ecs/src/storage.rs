use std::any::Any;
use std::collections::HashMap;
use std::ops::Deref;

use crate::components::{Component, Family};
use crate::entity::Entity;
use crate::error::EcsError;

/// ComponentStore owns every value of one component type.
///
/// Values live in a dense `Vec` with no holes; `entity_map` records which slot
/// belongs to which entity and `entities` records the reverse. Removal swaps
/// the last slot into the freed one, so slot positions are not stable across
/// removals. Only the entity to value association is.
///
/// References handed out by `get`/`get_mut`/`iter` must not be held across an
/// `add` or `remove`; the borrow checker enforces this for safe code.
pub struct ComponentStore<T: Component> {
    data: Vec<T>,
    entities: Vec<Entity>,
    entity_map: HashMap<Entity, usize>,
}

impl<T: Component> ComponentStore<T> {
    /// Creates a new empty ComponentStore.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            entity_map: HashMap::with_capacity(capacity),
        }
    }

    /// Appends `value` for `entity`.
    ///
    /// Fails with [`EcsError::DuplicateComponent`] if the entity already has a
    /// value in this store; the stored value is left untouched.
    pub fn add(&mut self, entity: Entity, value: T) -> Result<T::Mut<'_>, EcsError> {
        if self.entity_map.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::NAME,
            });
        }

        let index = self.data.len();
        self.data.push(value);
        self.entities.push(entity);
        self.entity_map.insert(entity, index);
        Ok(T::wrap_mut(&mut self.data[index]))
    }

    /// Removes and returns the value for `entity`, or `None` if it has none.
    ///
    /// [`Component::before_remove`] runs first, while the value is still in
    /// the store.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        if !self.entity_map.contains_key(&entity) {
            return None;
        }

        T::before_remove(entity, self);

        let index = self.entity_map.remove(&entity)?;
        let value = self.data.swap_remove(index);
        self.entities.swap_remove(index);

        // The former last element now occupies `index`
        if let Some(&moved) = self.entities.get(index) {
            self.entity_map.insert(moved, index);
        }

        Some(value)
    }

    /// Returns the value for `entity`.
    ///
    /// Fails with [`EcsError::ComponentNotFound`] when the entity has no value
    /// here; use [`lookup`](Self::lookup) when absence is expected.
    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        self.lookup(entity).ok_or(EcsError::ComponentNotFound {
            entity,
            component: T::NAME,
        })
    }

    pub fn get_mut(&mut self, entity: Entity) -> Result<T::Mut<'_>, EcsError> {
        self.lookup_mut(entity).ok_or(EcsError::ComponentNotFound {
            entity,
            component: T::NAME,
        })
    }

    pub fn lookup(&self, entity: Entity) -> Option<&T> {
        self.entity_map.get(&entity).map(|&index| &self.data[index])
    }

    pub fn lookup_mut(&mut self, entity: Entity) -> Option<T::Mut<'_>> {
        match self.entity_map.get(&entity) {
            Some(&index) => Some(T::wrap_mut(&mut self.data[index])),
            None => None,
        }
    }

    /// Returns true if the entity has this component.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_map.contains_key(&entity)
    }

    /// Current slot of `entity` in the dense array. Only valid until the next
    /// `add` or `remove`.
    pub fn slot(&self, entity: Entity) -> Option<usize> {
        self.entity_map.get(&entity).copied()
    }

    /// Returns an iterator over all (Entity, &Component) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.data.iter())
    }

    /// Returns a mutable iterator over all (Entity, [`Component::Mut`]) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, T::Mut<'_>)> {
        self.entities
            .iter()
            .copied()
            .zip(self.data.iter_mut().map(|value| T::wrap_mut(value)))
    }

    /// Entities with a value in this store, in slot order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The dense value array.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Returns the number of components stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if no components are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Empties the store without running removal hooks.
    pub fn clear(&mut self) {
        self.data.clear();
        self.entities.clear();
        self.entity_map.clear();
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable view of a store owned by a [`ComponentStores`] table.
///
/// Existing values can be read and changed, but values cannot be added or
/// removed: those change entity masks, so they go through the
/// [`World`](crate::World). Read access derefs to the store.
///
/// ```compile_fail
/// use rcube_ecs::{Component, ComponentStores, Entity};
///
/// #[derive(Component)]
/// struct Health(i32);
///
/// fn grow(stores: &mut ComponentStores, entity: Entity) {
///     if let Some(mut view) = stores.get_mut::<Health>() {
///         view.add(entity, Health(1)).unwrap();
///     }
/// }
/// ```
pub struct StoreMut<'a, T: Component> {
    store: &'a mut ComponentStore<T>,
}

impl<'a, T: Component> StoreMut<'a, T> {
    pub fn get_mut(&mut self, entity: Entity) -> Result<T::Mut<'_>, EcsError> {
        self.store.get_mut(entity)
    }

    pub fn lookup_mut(&mut self, entity: Entity) -> Option<T::Mut<'_>> {
        self.store.lookup_mut(entity)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, T::Mut<'_>)> {
        self.store.iter_mut()
    }
}

impl<T: Component> Deref for StoreMut<'_, T> {
    type Target = ComponentStore<T>;

    fn deref(&self) -> &ComponentStore<T> {
        self.store
    }
}

/// Type-erased component store.
///
/// Lets [`ComponentStores`] keep stores of different component types in one
/// table. Typed access goes through [`as_any`](Self::as_any) and a downcast.
pub trait AnyComponentStore: Any {
    /// Removes the entity's value, running the component's removal hook.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Checks if the entity has a component in this store.
    fn contains_entity(&self, entity: Entity) -> bool;

    /// Returns the number of components stored.
    fn len(&self) -> usize;

    /// Returns true if no components are stored.
    fn is_empty(&self) -> bool;

    /// Clears all components.
    fn clear(&mut self);

    /// Returns an iterator over entity IDs that have components in this store.
    fn entity_ids(&self) -> Box<dyn Iterator<Item = Entity> + '_>;

    fn component_name(&self) -> &'static str;

    /// Converts to Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Converts to mutable Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyComponentStore for ComponentStore<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn clear(&mut self) {
        self.clear()
    }

    fn entity_ids(&self) -> Box<dyn Iterator<Item = Entity> + '_> {
        Box::new(self.entities.iter().copied())
    }

    fn component_name(&self) -> &'static str {
        T::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Table of every component store in a [`World`](crate::World), indexed by
/// [`Family`].
///
/// Structural changes (adding or removing values) are crate-private and made
/// by the world, so entity masks and system memberships stay in sync.
/// Systems receive this table to read and mutate existing values.
pub struct ComponentStores {
    stores: Vec<Option<Box<dyn AnyComponentStore>>>,
    store_capacity: usize,
}

impl ComponentStores {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self::with_store_capacity(0)
    }

    /// Stores created by this table reserve room for `store_capacity` values.
    pub fn with_store_capacity(store_capacity: usize) -> Self {
        Self {
            stores: Vec::new(),
            store_capacity,
        }
    }

    /// Gets the store for `T`, if one has been created.
    pub fn get<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.stores
            .get(T::family().index())
            .and_then(|slot| slot.as_ref())
            .and_then(|store| store.as_any().downcast_ref::<ComponentStore<T>>())
    }

    /// Gets a mutable view of the store for `T`, if one has been created.
    pub fn get_mut<T: Component>(&mut self) -> Option<StoreMut<'_, T>> {
        self.store_mut::<T>().map(|store| StoreMut { store })
    }

    pub(crate) fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        self.stores
            .get_mut(T::family().index())
            .and_then(|slot| slot.as_mut())
            .and_then(|store| store.as_any_mut().downcast_mut::<ComponentStore<T>>())
    }

    /// Gets or creates the store for `T`.
    pub(crate) fn get_or_create<T: Component>(&mut self) -> &mut ComponentStore<T> {
        let index = T::family().index();
        if self.stores.len() <= index {
            self.stores.resize_with(index + 1, || None);
        }
        let capacity = self.store_capacity;
        self.stores[index]
            .get_or_insert_with(|| Box::new(ComponentStore::<T>::with_capacity(capacity)))
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .expect("Type mismatch in component storage")
    }

    /// Adds a component to an entity.
    pub(crate) fn add<T: Component>(&mut self, entity: Entity, value: T) -> Result<T::Mut<'_>, EcsError> {
        self.get_or_create::<T>().add(entity, value)
    }

    /// Removes a component from an entity.
    pub(crate) fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.store_mut::<T>().and_then(|store| store.remove(entity))
    }

    /// Removes the entity's value from the store of `family`, whatever its type.
    pub(crate) fn remove_family(&mut self, family: Family, entity: Entity) -> bool {
        match self.stores.get_mut(family.index()) {
            Some(Some(store)) => store.remove_entity(entity),
            _ => false,
        }
    }

    /// Gets a reference to a component for an entity.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        match self.get::<T>() {
            Some(store) => store.get(entity),
            None => Err(EcsError::ComponentNotFound {
                entity,
                component: T::NAME,
            }),
        }
    }

    /// Gets a mutable reference to a component for an entity.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<T::Mut<'_>, EcsError> {
        match self.store_mut::<T>() {
            Some(store) => store.get_mut(entity),
            None => Err(EcsError::ComponentNotFound {
                entity,
                component: T::NAME,
            }),
        }
    }

    /// Checks if an entity has a specific component.
    pub fn contains<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>()
            .map(|store| store.contains(entity))
            .unwrap_or(false)
    }

    /// Clears all component stores.
    pub(crate) fn clear(&mut self) {
        for store in self.stores.iter_mut().flatten() {
            store.clear();
        }
    }

    /// Returns the number of stores created so far.
    pub fn store_count(&self) -> usize {
        self.stores.iter().flatten().count()
    }

    /// Iterates the type-erased stores that exist.
    pub fn iter(&self) -> impl Iterator<Item = &dyn AnyComponentStore> {
        self.stores.iter().flatten().map(|store| &**store)
    }
}

impl Default for ComponentStores {
    fn default() -> Self {
        Self::new()
    }
}
