use rcube_ecs::{Component, ComponentMask, ComponentStores, EcsError, Entity, FrameInfo, Subscriptions, System};
use rcube_math::Mat4;

use crate::components::Transform;
use crate::hierarchy::TransformLookup;

/// Keeps every [`Transform`]'s `local` and `world` matrices current.
///
/// Each frame it recomputes only dirty subtrees: a dirty transform is rebuilt
/// and forces all of its descendants to rebuild too, since their parent's
/// world matrix moved. Subtrees without a dirty node are never visited.
/// [`World::update_forced`](rcube_ecs::World::update_forced) rebuilds
/// everything from the roots down.
pub struct TransformSystem {
    subscriptions: Subscriptions,
    last_recomputed: usize,
}

impl TransformSystem {
    pub fn new() -> Self {
        Self {
            subscriptions: Subscriptions::new().with_filter(ComponentMask::of::<Transform>()),
            last_recomputed: 0,
        }
    }

    /// Number of transforms rebuilt by the most recent update.
    pub fn last_recomputed(&self) -> usize {
        self.last_recomputed
    }
}

impl Default for TransformSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TransformSystem {
    fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    fn update(&mut self, stores: &mut ComponentStores, frame: &FrameInfo) -> Result<(), EcsError> {
        let mut transforms = match stores.get_mut::<Transform>() {
            Some(transforms) => transforms,
            None => {
                self.last_recomputed = 0;
                return Ok(());
            }
        };

        self.last_recomputed = propagate(&mut transforms, self.subscriptions.entities(0), frame.force)?;
        log::trace!(
            "frame {}: recomputed {} of {} transforms",
            frame.frame,
            self.last_recomputed,
            self.subscriptions.len(0)
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "TransformSystem"
    }
}

/// Brings the cached matrices of `entities` up to date and returns how many
/// transforms were rebuilt.
///
/// With `force`, every root in `entities` is rebuilt together with its whole
/// subtree. Otherwise traversal starts at each dirty transform whose
/// ancestors are all clean, reusing the parent's cached world matrix.
///
/// Every parent link is checked on every call, forced or not. Fails with
/// [`EcsError::DanglingHierarchyReference`] when a link names an entity
/// without a transform or the other end does not link back, and with
/// [`EcsError::ComponentNotFound`] if an entity in `entities` has none.
pub fn propagate<L, I>(transforms: &mut L, entities: I, force: bool) -> Result<usize, EcsError>
where
    L: TransformLookup + ?Sized,
    I: IntoIterator<Item = Entity>,
{
    let mut recomputed = 0;

    for entity in entities {
        let transform = transforms.transform(entity).ok_or(EcsError::ComponentNotFound {
            entity,
            component: Transform::NAME,
        })?;
        let (parent, dirty) = (transform.parent(), transform.is_dirty());

        let start = match parent {
            None => force || dirty,
            Some(parent) => {
                check_parent_link(&*transforms, entity, parent)?;
                !force && dirty && ancestors_clean(&*transforms, entity)?
            }
        };

        if start {
            recomputed += update_subtree(transforms, entity, force)?;
        }
    }

    Ok(recomputed)
}

/// `parent` must exist and list `child` among its children.
fn check_parent_link<L: TransformLookup + ?Sized>(transforms: &L, child: Entity, parent: Entity) -> Result<(), EcsError> {
    match transforms.transform(parent) {
        Some(t) if t.children().contains(&child) => Ok(()),
        _ => Err(dangling(child, parent)),
    }
}

/// Walks up from `entity`; true when no ancestor is dirty.
fn ancestors_clean<L: TransformLookup + ?Sized>(transforms: &L, entity: Entity) -> Result<bool, EcsError> {
    let mut current = entity;
    while let Some(parent) = transforms.transform(current).and_then(Transform::parent) {
        let parent_transform = transforms.transform(parent).ok_or_else(|| dangling(current, parent))?;
        if parent_transform.is_dirty() {
            return Ok(false);
        }
        current = parent;
    }
    Ok(true)
}

fn update_subtree<L: TransformLookup + ?Sized>(
    transforms: &mut L,
    start: Entity,
    force: bool,
) -> Result<usize, EcsError> {
    let parent_world = match transforms.transform(start).and_then(Transform::parent) {
        Some(parent) => Some(
            *transforms
                .transform(parent)
                .ok_or_else(|| dangling(start, parent))?
                .world(),
        ),
        None => None,
    };

    let mut recomputed = 0;
    // (entity, referring parent, parent world, forced)
    let mut stack: Vec<(Entity, Entity, Option<Mat4>, bool)> = vec![(start, start, parent_world, force)];

    while let Some((entity, referrer, parent_world, forced)) = stack.pop() {
        let transform = transforms
            .transform_mut(entity)
            .ok_or_else(|| dangling(referrer, entity))?;
        if entity != referrer && transform.parent() != Some(referrer) {
            return Err(dangling(referrer, entity));
        }

        if !(forced || transform.is_dirty()) {
            continue;
        }

        transform.recompute(parent_world.as_ref());
        recomputed += 1;

        let world = *transform.world();
        for &child in transform.children().iter().rev() {
            stack.push((child, entity, Some(world), true));
        }
    }

    Ok(recomputed)
}

fn dangling(entity: Entity, missing: Entity) -> EcsError {
    log::error!("{} refers to {} which has no transform linking back", entity, missing);
    EcsError::DanglingHierarchyReference { entity, missing }
}
