use std::collections::HashMap;

use crate::entity::Entity;
use crate::error::EcsError;
use crate::mask::ComponentMask;
use crate::storage::ComponentStores;

/// Per-frame input handed to every system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInfo {
    /// Time elapsed since the last frame in seconds
    pub delta_time: f32,
    /// Number of frames completed before this one
    pub frame: u64,
    /// Recompute cached state even when nothing is marked stale
    pub force: bool,
}

/// Entities in first-match order.
///
/// Removal leaves a hole in `slots`; once holes outnumber members the list
/// is compacted, so insert and remove are both O(1) amortized.
#[derive(Debug, Default)]
struct EntityList {
    slots: Vec<Option<Entity>>,
    index: HashMap<Entity, usize>,
}

impl EntityList {
    fn insert(&mut self, entity: Entity) -> bool {
        if self.index.contains_key(&entity) {
            return false;
        }
        self.index.insert(entity, self.slots.len());
        self.slots.push(Some(entity));
        true
    }

    fn remove(&mut self, entity: Entity) -> bool {
        let slot = match self.index.remove(&entity) {
            Some(slot) => slot,
            None => return false,
        };
        self.slots[slot] = None;

        if self.slots.len() > 2 * self.index.len() {
            self.compact();
        }
        true
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (slot, entity) in self.slots.iter().flatten().enumerate() {
            self.index.insert(*entity, slot);
        }
    }

    fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().flatten().copied()
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}

/// The filters a system declares, and the entities currently matching each.
///
/// Membership is maintained by the [`World`](crate::World); each list keeps
/// the order in which entities first matched so iteration is reproducible
/// from frame to frame.
#[derive(Debug, Default)]
pub struct Subscriptions {
    filters: Vec<ComponentMask>,
    members: Vec<EntityList>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style: adds a filter. Filters are addressed by the order in
    /// which they were added.
    pub fn with_filter(mut self, filter: ComponentMask) -> Self {
        self.filters.push(filter);
        self.members.push(EntityList::default());
        self
    }

    pub fn filters(&self) -> &[ComponentMask] {
        &self.filters
    }

    /// Entities matching filter `index`, in first-match order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a declared filter.
    pub fn entities(&self, index: usize) -> impl Iterator<Item = Entity> + '_ {
        self.members[index].iter()
    }

    /// Number of entities matching filter `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a declared filter.
    pub fn len(&self, index: usize) -> usize {
        self.members[index].len()
    }

    pub fn contains(&self, index: usize, entity: Entity) -> bool {
        self.members
            .get(index)
            .map(|list| list.index.contains_key(&entity))
            .unwrap_or(false)
    }

    pub(crate) fn insert(&mut self, index: usize, entity: Entity) -> bool {
        self.members[index].insert(entity)
    }

    pub(crate) fn remove(&mut self, index: usize, entity: Entity) -> bool {
        self.members[index].remove(entity)
    }

    pub(crate) fn clear(&mut self) {
        for list in &mut self.members {
            list.clear();
        }
    }
}

/// System trait for the ECS framework.
///
/// Systems contain the logic that operates on entities with specific components.
/// A system declares its filters through [`Subscriptions`]; the world keeps
/// the matching entity lists current and calls `update` once per frame, in
/// registration order.
///
/// # Examples
///
/// ```
/// use rcube_ecs::{Component, ComponentMask, ComponentStores, EcsError, FrameInfo, Subscriptions, System};
///
/// #[derive(Component)]
/// struct Velocity(f32);
///
/// struct PhysicsSystem {
///     subscriptions: Subscriptions,
/// }
///
/// impl System for PhysicsSystem {
///     fn subscriptions(&self) -> &Subscriptions {
///         &self.subscriptions
///     }
///
///     fn subscriptions_mut(&mut self) -> &mut Subscriptions {
///         &mut self.subscriptions
///     }
///
///     fn update(&mut self, stores: &mut ComponentStores, frame: &FrameInfo) -> Result<(), EcsError> {
///         for entity in self.subscriptions.entities(0) {
///             stores.get_component_mut::<Velocity>(entity)?.0 *= 1.0 - frame.delta_time;
///         }
///         Ok(())
///     }
/// }
///
/// let system = PhysicsSystem {
///     subscriptions: Subscriptions::new().with_filter(ComponentMask::of::<Velocity>()),
/// };
/// assert!(system.is_enabled());
/// ```
pub trait System {
    fn subscriptions(&self) -> &Subscriptions;

    fn subscriptions_mut(&mut self) -> &mut Subscriptions;

    /// Optional initialization logic.
    ///
    /// Called once when the system is registered with the world, after its
    /// entity lists have been seeded with the entities that already match.
    fn initialize(&mut self, _stores: &mut ComponentStores) {}

    /// Update logic for this system.
    ///
    /// Called once per frame with access to all component stores.
    fn update(&mut self, stores: &mut ComponentStores, frame: &FrameInfo) -> Result<(), EcsError>;

    /// Optional cleanup logic.
    ///
    /// Called when the system is removed or the world is destroyed.
    fn cleanup(&mut self, _stores: &mut ComponentStores) {}

    /// Called after `entity` starts matching filter `filter`.
    fn on_entity_added(&mut self, _filter: usize, _entity: Entity) {}

    /// Called after `entity` stops matching filter `filter`.
    fn on_entity_removed(&mut self, _filter: usize, _entity: Entity) {}

    /// Returns whether this system should be updated.
    ///
    /// Can be used to enable/disable systems at runtime.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Returns the name of this system for debugging purposes.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
