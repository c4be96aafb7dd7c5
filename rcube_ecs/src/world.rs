use crate::components::Component;
use crate::config::WorldConfig;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::handle::EntityHandle;
use crate::mask::ComponentMask;
use crate::registry::{EntityRegistry, MaskChange};
use crate::storage::{ComponentStore, ComponentStores};
use crate::system::{FrameInfo, System};

/// World is the central manager for the ECS framework.
///
/// It owns the entity registry, one component store per component type and
/// the systems. Every component add or remove flips a bit in the entity's
/// mask, and the world forwards that change to exactly the system filters
/// containing the flipped family.
///
/// # Examples
///
/// ```
/// use rcube_ecs::{Component, World};
///
/// #[derive(Component, Default)]
/// struct Velocity {
///     value: [f32; 3],
/// }
///
/// let mut world = World::new();
/// let entity = world.create_entity();
/// world.add_component(entity, Velocity::default()).unwrap();
/// assert!(world.has_component::<Velocity>(entity));
/// world.update(0.016).unwrap();
/// ```
pub struct World {
    registry: EntityRegistry,
    stores: ComponentStores,
    /// Registered systems, in registration order
    systems: Vec<Box<dyn System>>,
    /// For each family index, the (system, filter) pairs whose filter contains it
    subscribers: Vec<Vec<(usize, usize)>>,
    frame: u64,
}

impl World {
    /// Creates a new empty World.
    pub fn new() -> Self {
        Self {
            registry: EntityRegistry::new(),
            stores: ComponentStores::new(),
            systems: Vec::new(),
            subscribers: Vec::new(),
            frame: 0,
        }
    }

    pub fn with_config(config: &WorldConfig) -> Self {
        Self {
            registry: EntityRegistry::with_capacity(config.entity_capacity),
            stores: ComponentStores::with_store_capacity(config.store_capacity),
            systems: Vec::new(),
            subscribers: Vec::new(),
            frame: 0,
        }
    }

    /// Creates a new entity and returns its ID.
    pub fn create_entity(&mut self) -> Entity {
        self.registry.create()
    }

    /// Creates a new entity and returns a handle for attaching components.
    pub fn spawn(&mut self) -> EntityHandle<'_> {
        let entity = self.create_entity();
        EntityHandle::new(self, entity)
    }

    /// Returns a handle to a live entity.
    pub fn entity(&mut self, entity: Entity) -> Result<EntityHandle<'_>, EcsError> {
        if !self.registry.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        Ok(EntityHandle::new(self, entity))
    }

    /// Destroys an entity and removes all its components.
    ///
    /// Every system drops the entity from its lists before the components are
    /// removed. Returns `true` if the entity existed, `false` otherwise.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let mask = match self.registry.mask(entity) {
            Some(mask) => mask,
            None => return false,
        };

        for family in mask.families() {
            if let Ok(change) = self.registry.clear_component_bit(entity, family) {
                self.notify(change);
            }
            self.stores.remove_family(family, entity);
        }
        self.registry.destroy(entity);

        log::debug!("destroyed {} ({} components)", entity, mask.len());
        true
    }

    /// Checks if an entity exists in the world.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.registry.is_alive(entity)
    }

    /// Adds a component to an entity.
    ///
    /// Fails with [`EcsError::UnknownEntity`] for dead entities and with
    /// [`EcsError::DuplicateComponent`] if the entity already has a `T`.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        if !self.registry.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }

        self.stores.add(entity, component)?;
        let change = self.registry.set_component_bit(entity, T::family())?;
        self.notify(change);
        Ok(())
    }

    /// Removes a component from an entity, returning it.
    ///
    /// A no-op returning `None` when the entity is dead or has no `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.has_component::<T>(entity) {
            return None;
        }

        if let Ok(change) = self.registry.clear_component_bit(entity, T::family()) {
            self.notify(change);
        }
        self.stores.remove::<T>(entity)
    }

    /// Gets a reference to a component for a specific entity.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        if !self.registry.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.stores.get_component::<T>(entity)
    }

    /// Gets mutable access to a component for a specific entity, as the
    /// component's [`Component::Mut`] (a plain `&mut T` for derived types).
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<T::Mut<'_>, EcsError> {
        if !self.registry.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.stores.get_component_mut::<T>(entity)
    }

    /// Checks the entity's mask for `T`.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.registry
            .mask(entity)
            .map(|mask| mask.contains(T::family()))
            .unwrap_or(false)
    }

    /// Read-only access to the store of `T`, if any `T` was ever added.
    pub fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.stores.get::<T>()
    }

    pub fn stores(&self) -> &ComponentStores {
        &self.stores
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// True when `entity` is alive and has every family in `filter`.
    pub fn matches(&self, entity: Entity, filter: ComponentMask) -> bool {
        self.registry.matches(entity, filter)
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> Vec<Entity> {
        self.registry.entities()
    }

    /// Registers a system with the world.
    ///
    /// The system's lists are seeded with every live entity that already
    /// matches, in creation order, before `initialize` runs. Fails with
    /// [`EcsError::EmptyFilter`] if any declared filter has no bits.
    pub fn add_system(&mut self, mut system: Box<dyn System>) -> Result<(), EcsError> {
        let filters = system.subscriptions().filters().to_vec();
        if filters.iter().any(ComponentMask::is_empty) {
            return Err(EcsError::EmptyFilter {
                system: system.name().to_string(),
            });
        }

        let index = self.systems.len();
        let entities = self.registry.entities();
        for (filter_index, filter) in filters.iter().enumerate() {
            for &entity in &entities {
                if self.registry.matches(entity, *filter) && system.subscriptions_mut().insert(filter_index, entity) {
                    system.on_entity_added(filter_index, entity);
                }
            }

            for family in filter.families() {
                if self.subscribers.len() <= family.index() {
                    self.subscribers.resize_with(family.index() + 1, Vec::new);
                }
                self.subscribers[family.index()].push((index, filter_index));
            }
        }

        system.initialize(&mut self.stores);
        log::info!(
            "registered system {} ({} filters, {} matching entities)",
            system.name(),
            filters.len(),
            (0..filters.len())
                .map(|i| system.subscriptions().len(i))
                .sum::<usize>()
        );
        self.systems.push(system);
        Ok(())
    }

    /// Pushes a mask change to the filters that contain the changed family.
    fn notify(&mut self, change: MaskChange) {
        if change.is_noop() {
            return;
        }

        let subscribers = match self.subscribers.get(change.family.index()) {
            Some(subscribers) => subscribers,
            None => return,
        };

        for &(system_index, filter_index) in subscribers {
            let system = &mut self.systems[system_index];
            let filter = system.subscriptions().filters()[filter_index];

            if change.entered(filter) {
                if system.subscriptions_mut().insert(filter_index, change.entity) {
                    system.on_entity_added(filter_index, change.entity);
                }
            } else if change.left(filter) && system.subscriptions_mut().remove(filter_index, change.entity) {
                system.on_entity_removed(filter_index, change.entity);
            }
        }
    }

    /// Runs one frame: updates every enabled system in registration order.
    ///
    /// Stops at the first system that fails and returns its error.
    pub fn update(&mut self, delta_time: f32) -> Result<(), EcsError> {
        self.run_frame(delta_time, false)
    }

    /// Like [`update`](Self::update), but asks systems to recompute cached
    /// state even where nothing is marked stale.
    pub fn update_forced(&mut self, delta_time: f32) -> Result<(), EcsError> {
        self.run_frame(delta_time, true)
    }

    fn run_frame(&mut self, delta_time: f32, force: bool) -> Result<(), EcsError> {
        let frame = FrameInfo {
            delta_time,
            frame: self.frame,
            force,
        };
        self.frame += 1;

        for system in &mut self.systems {
            if !system.is_enabled() {
                continue;
            }

            if let Err(err) = system.update(&mut self.stores, &frame) {
                log::error!("system {} failed in frame {}: {}", system.name(), frame.frame, err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Returns the number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the number of systems registered with the world.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Number of frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Registered system at `index`, in registration order.
    pub fn system(&self, index: usize) -> Option<&dyn System> {
        self.systems.get(index).map(|system| system.as_ref())
    }

    /// Clears all entities from the world. Systems stay registered with empty
    /// lists.
    pub fn clear_entities(&mut self) {
        for system in &mut self.systems {
            system.subscriptions_mut().clear();
        }
        self.stores.clear();
        self.registry.clear();
    }

    /// Removes all systems from the world.
    pub fn clear_systems(&mut self) {
        for system in &mut self.systems {
            system.cleanup(&mut self.stores);
        }
        self.systems.clear();
        self.subscribers.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        // Clean up systems when the world is destroyed
        for system in &mut self.systems {
            system.cleanup(&mut self.stores);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::system::Subscriptions;
    use crate::storage::ComponentStores;

    #[derive(Component, Default, Debug, PartialEq)]
    struct Position {
        value: i32,
    }

    #[derive(Component, Default)]
    struct Velocity {
        value: i32,
    }

    type Log = Rc<RefCell<Vec<String>>>;

    struct MoveSystem {
        subscriptions: Subscriptions,
        label: &'static str,
        log: Log,
    }

    impl MoveSystem {
        fn new(label: &'static str, log: Log) -> Self {
            Self {
                subscriptions: Subscriptions::new()
                    .with_filter(ComponentMask::of::<Position>().with::<Velocity>()),
                label,
                log,
            }
        }
    }

    impl System for MoveSystem {
        fn subscriptions(&self) -> &Subscriptions {
            &self.subscriptions
        }

        fn subscriptions_mut(&mut self) -> &mut Subscriptions {
            &mut self.subscriptions
        }

        fn update(&mut self, stores: &mut ComponentStores, _frame: &FrameInfo) -> Result<(), EcsError> {
            self.log.borrow_mut().push(format!("update {}", self.label));
            for entity in self.subscriptions.entities(0) {
                let velocity = stores.get_component::<Velocity>(entity)?.value;
                stores.get_component_mut::<Position>(entity)?.value += velocity;
            }
            Ok(())
        }

        fn cleanup(&mut self, _stores: &mut ComponentStores) {
            self.log.borrow_mut().push(format!("cleanup {}", self.label));
        }

        fn on_entity_added(&mut self, _filter: usize, entity: Entity) {
            self.log.borrow_mut().push(format!("added {}", entity));
        }

        fn on_entity_removed(&mut self, _filter: usize, entity: Entity) {
            self.log.borrow_mut().push(format!("removed {}", entity));
        }

        fn name(&self) -> &str {
            "MoveSystem"
        }
    }

    struct EmptySystem {
        subscriptions: Subscriptions,
    }

    impl System for EmptySystem {
        fn subscriptions(&self) -> &Subscriptions {
            &self.subscriptions
        }

        fn subscriptions_mut(&mut self) -> &mut Subscriptions {
            &mut self.subscriptions
        }

        fn update(&mut self, _stores: &mut ComponentStores, _frame: &FrameInfo) -> Result<(), EcsError> {
            Ok(())
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn members(world: &World) -> Vec<Entity> {
        world.system(0).unwrap().subscriptions().entities(0).collect()
    }

    #[test]
    fn test_world_creation() {
        let world = World::new();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.system_count(), 0);
    }

    #[test]
    fn test_create_entity() {
        let mut world = World::new();
        let id1 = world.create_entity();
        let id2 = world.create_entity();

        assert_eq!(world.entity_count(), 2);
        assert_ne!(id1, id2);
        assert!(world.is_alive(id1));
        assert!(world.is_alive(id2));
    }

    #[test]
    fn test_destroy_entity() {
        let mut world = World::new();
        let id = world.create_entity();
        world.add_component(id, Position::default()).unwrap();

        assert!(world.destroy_entity(id));
        assert_eq!(world.entity_count(), 0);
        assert!(!world.is_alive(id));
        assert!(world.store::<Position>().unwrap().is_empty());

        // Second destroy is a no-op
        assert!(!world.destroy_entity(id));
    }

    #[test]
    fn test_add_component() {
        let mut world = World::new();
        let id = world.create_entity();

        world.add_component(id, Position { value: 3 }).unwrap();
        assert_eq!(world.get_component::<Position>(id).unwrap().value, 3);
        assert!(world.has_component::<Position>(id));
        assert!(world.matches(id, ComponentMask::of::<Position>()));
    }

    #[test]
    fn test_add_duplicate_component() {
        let mut world = World::new();
        let id = world.create_entity();

        world.add_component(id, Position { value: 1 }).unwrap();
        let err = world.add_component(id, Position { value: 2 }).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateComponent { .. }));
        assert_eq!(world.get_component::<Position>(id).unwrap().value, 1);
    }

    #[test]
    fn test_dead_entity_access() {
        let mut world = World::new();
        let id = world.create_entity();
        world.destroy_entity(id);

        assert_eq!(
            world.add_component(id, Position::default()),
            Err(EcsError::UnknownEntity(id))
        );
        assert_eq!(
            world.get_component::<Position>(id).unwrap_err(),
            EcsError::UnknownEntity(id)
        );
        assert!(world.remove_component::<Position>(id).is_none());
        assert!(world.entity(id).is_err());
    }

    #[test]
    fn test_remove_component() {
        let mut world = World::new();
        let id = world.create_entity();

        world.add_component(id, Position { value: 9 }).unwrap();
        assert_eq!(world.remove_component::<Position>(id), Some(Position { value: 9 }));
        assert!(world.get_component::<Position>(id).is_err());
        assert!(!world.has_component::<Position>(id));
        assert!(world.remove_component::<Position>(id).is_none());
    }

    #[test]
    fn test_get_component_mut() {
        let mut world = World::new();
        let id = world.create_entity();

        world.add_component(id, Position::default()).unwrap();
        world.get_component_mut::<Position>(id).unwrap().value = 5;

        let position = world.get_component::<Position>(id).unwrap();
        assert_eq!(position.value, 5);
    }

    #[test]
    fn test_system_membership_follows_masks() {
        init_logger();
        let log = Log::default();
        let mut world = World::new();
        world.add_system(Box::new(MoveSystem::new("a", log.clone()))).unwrap();

        let e1 = world.create_entity();
        let e2 = world.create_entity();
        world.add_component(e2, Position::default()).unwrap();
        world.add_component(e2, Velocity::default()).unwrap();
        world.add_component(e1, Velocity::default()).unwrap();
        world.add_component(e1, Position::default()).unwrap();

        // First-match order, not id order
        assert_eq!(members(&world), vec![e2, e1]);

        world.remove_component::<Velocity>(e2);
        assert_eq!(members(&world), vec![e1]);

        world.destroy_entity(e1);
        assert!(members(&world).is_empty());

        assert_eq!(
            *log.borrow(),
            vec![
                format!("added {}", e2),
                format!("added {}", e1),
                format!("removed {}", e2),
                format!("removed {}", e1),
            ]
        );
    }

    #[test]
    fn test_add_system_seeds_existing_entities() {
        let mut world = World::new();
        let e1 = world.create_entity();
        let e2 = world.create_entity();
        let e3 = world.create_entity();
        for &e in &[e3, e1] {
            world.add_component(e, Position::default()).unwrap();
            world.add_component(e, Velocity::default()).unwrap();
        }
        world.add_component(e2, Position::default()).unwrap();

        world.add_system(Box::new(MoveSystem::new("a", Log::default()))).unwrap();
        assert_eq!(members(&world), vec![e1, e3]);
    }

    #[test]
    fn test_empty_filter_is_rejected() {
        let mut world = World::new();
        let system = EmptySystem {
            subscriptions: Subscriptions::new().with_filter(ComponentMask::EMPTY),
        };

        let err = world.add_system(Box::new(system)).unwrap_err();
        assert!(matches!(err, EcsError::EmptyFilter { .. }));
        assert_eq!(world.system_count(), 0);
    }

    #[test]
    fn test_system_update() {
        let log = Log::default();
        let mut world = World::new();

        let id1 = world.create_entity();
        world.add_component(id1, Position { value: 1 }).unwrap();
        world.add_component(id1, Velocity { value: 2 }).unwrap();

        // No velocity, so not moved
        let id2 = world.create_entity();
        world.add_component(id2, Position { value: 1 }).unwrap();

        world.add_system(Box::new(MoveSystem::new("a", log))).unwrap();
        world.update(0.016).unwrap();
        world.update(0.016).unwrap();

        assert_eq!(world.get_component::<Position>(id1).unwrap().value, 5);
        assert_eq!(world.get_component::<Position>(id2).unwrap().value, 1);
        assert_eq!(world.frame_count(), 2);
    }

    #[test]
    fn test_systems_run_in_registration_order() {
        init_logger();
        let log = Log::default();
        let mut world = World::new();
        world.add_system(Box::new(MoveSystem::new("second", log.clone()))).unwrap();
        world.add_system(Box::new(MoveSystem::new("first", log.clone()))).unwrap();

        world.update(0.016).unwrap();
        assert_eq!(*log.borrow(), vec!["update second", "update first"]);
    }

    #[test]
    fn test_clear_systems_runs_cleanup() {
        let log = Log::default();
        let mut world = World::new();
        world.add_system(Box::new(MoveSystem::new("a", log.clone()))).unwrap();

        world.clear_systems();
        assert_eq!(world.system_count(), 0);
        assert_eq!(*log.borrow(), vec!["cleanup a"]);

        // No subscribers left to notify
        let e = world.create_entity();
        world.add_component(e, Position::default()).unwrap();
        world.add_component(e, Velocity::default()).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_drop_runs_cleanup() {
        let log = Log::default();
        {
            let mut world = World::new();
            world.add_system(Box::new(MoveSystem::new("a", log.clone()))).unwrap();
        }
        assert_eq!(*log.borrow(), vec!["cleanup a"]);
    }

    #[test]
    fn test_clear_entities() {
        let mut world = World::new();
        world.add_system(Box::new(MoveSystem::new("a", Log::default()))).unwrap();
        for _ in 0..3 {
            let e = world.create_entity();
            world.add_component(e, Position::default()).unwrap();
            world.add_component(e, Velocity::default()).unwrap();
        }

        assert_eq!(world.entity_count(), 3);
        world.clear_entities();
        assert_eq!(world.entity_count(), 0);
        assert!(members(&world).is_empty());
        assert_eq!(world.system_count(), 1);
    }

    #[test]
    fn test_entity_iteration() {
        let mut world = World::new();
        let id1 = world.create_entity();
        let id2 = world.create_entity();
        let id3 = world.create_entity();
        world.destroy_entity(id2);

        assert_eq!(world.entities(), vec![id1, id3]);
    }

    #[test]
    fn test_with_config() {
        let config = WorldConfig {
            entity_capacity: 8,
            store_capacity: 8,
        };
        let mut world = World::with_config(&config);
        let e = world.create_entity();
        world.add_component(e, Position::default()).unwrap();
        assert_eq!(world.entity_count(), 1);
    }
}
