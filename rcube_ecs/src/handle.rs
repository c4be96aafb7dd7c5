use crate::components::Component;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::world::World;

/// Borrowed view of one entity in a [`World`].
///
/// Obtained from [`World::spawn`] or [`World::entity`]. All operations go
/// through the world, so masks and system lists stay in sync.
///
/// ```
/// use rcube_ecs::{Component, World};
///
/// #[derive(Component)]
/// struct Health(u32);
///
/// let mut world = World::new();
/// let entity = world.spawn().with(Health(3)).unwrap().id();
/// assert_eq!(world.get_component::<Health>(entity).unwrap().0, 3);
/// ```
pub struct EntityHandle<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl<'w> EntityHandle<'w> {
    pub(crate) fn new(world: &'w mut World, entity: Entity) -> Self {
        Self { world, entity }
    }

    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Adds a component; see [`World::add_component`].
    pub fn insert<T: Component>(&mut self, component: T) -> Result<&mut Self, EcsError> {
        self.world.add_component(self.entity, component)?;
        Ok(self)
    }

    /// Builder style [`insert`](Self::insert).
    pub fn with<T: Component>(mut self, component: T) -> Result<Self, EcsError> {
        self.insert(component)?;
        Ok(self)
    }

    pub fn get<T: Component>(&self) -> Result<&T, EcsError> {
        self.world.get_component::<T>(self.entity)
    }

    pub fn get_mut<T: Component>(&mut self) -> Result<T::Mut<'_>, EcsError> {
        self.world.get_component_mut::<T>(self.entity)
    }

    pub fn has<T: Component>(&self) -> bool {
        self.world.has_component::<T>(self.entity)
    }

    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.world.remove_component::<T>(self.entity)
    }

    /// Destroys the entity, consuming the handle.
    pub fn destroy(self) -> bool {
        self.world.destroy_entity(self.entity)
    }

    /// The world this handle borrows.
    pub fn world(&mut self) -> &mut World {
        &mut *self.world
    }
}
