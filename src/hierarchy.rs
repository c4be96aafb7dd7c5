//! Parent/child links between [`Transform`]s.
//!
//! Links are entity ids stored on both ends: the child's `parent` and the
//! parent's ordered `children`. The functions here are the only place that
//! writes them, and each one updates both ends together. Attaching refuses
//! any edge that would close a loop, so traversal never needs a cycle guard.
//!
//! The functions are generic over [`TransformLookup`] so they work on a bare
//! `ComponentStore<Transform>` (inside removal hooks), on a system's
//! [`StoreMut`] view and on a whole [`World`]. [`HierarchyExt`] wraps them for the world with liveness
//! checks and recursive destruction.

use rcube_ecs::{Component, ComponentStore, EcsError, Entity, StoreMut, World};

use crate::components::Transform;

/// Access to transforms by entity.
pub trait TransformLookup {
    fn transform(&self, entity: Entity) -> Option<&Transform>;

    fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform>;
}

impl TransformLookup for ComponentStore<Transform> {
    fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.lookup(entity)
    }

    fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.lookup_mut(entity).map(|t| t.0)
    }
}

impl TransformLookup for StoreMut<'_, Transform> {
    fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.lookup(entity)
    }

    fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.lookup_mut(entity).map(|t| t.0)
    }
}

impl TransformLookup for World {
    fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.get_component::<Transform>(entity).ok()
    }

    fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.get_component_mut::<Transform>(entity).ok().map(|t| t.0)
    }
}

fn missing(entity: Entity) -> EcsError {
    EcsError::ComponentNotFound {
        entity,
        component: Transform::NAME,
    }
}

/// Makes `child` a child of `parent`, detaching it from any previous parent.
///
/// Fails with [`EcsError::HierarchyCycle`] if `parent` is `child` or one of
/// its descendants, and with [`EcsError::ComponentNotFound`] if either has no
/// transform. Nothing changes on failure.
pub fn set_parent<L: TransformLookup + ?Sized>(
    transforms: &mut L,
    child: Entity,
    parent: Entity,
) -> Result<(), EcsError> {
    transforms.transform(child).ok_or_else(|| missing(child))?;
    transforms.transform(parent).ok_or_else(|| missing(parent))?;

    if is_ancestor_or_self(&*transforms, child, parent) {
        log::error!("refusing to attach {} under {}: cycle", child, parent);
        return Err(EcsError::HierarchyCycle { child, parent });
    }

    detach(transforms, child)?;

    if let Some(t) = transforms.transform_mut(parent) {
        t.push_child(child);
    }
    if let Some(t) = transforms.transform_mut(child) {
        t.set_parent_link(Some(parent));
    }
    Ok(())
}

/// Makes `child` a root. Its subtree moves with it. A no-op for roots.
pub fn detach<L: TransformLookup + ?Sized>(transforms: &mut L, child: Entity) -> Result<(), EcsError> {
    let old_parent = match transforms.transform(child) {
        Some(t) => t.parent(),
        None => return Err(missing(child)),
    };

    if let Some(old_parent) = old_parent {
        if let Some(t) = transforms.transform_mut(old_parent) {
            t.remove_child(child);
        }
        if let Some(t) = transforms.transform_mut(child) {
            t.set_parent_link(None);
        }
    }
    Ok(())
}

/// Removes every edge touching `entity`: it leaves its parent's child list
/// and each of its children becomes a dirty root.
pub fn unlink<L: TransformLookup + ?Sized>(transforms: &mut L, entity: Entity) {
    let (parent, children) = match transforms.transform_mut(entity) {
        Some(t) => {
            let parent = t.parent();
            t.set_parent_link(None);
            (parent, t.take_children())
        }
        None => return,
    };

    if let Some(parent) = parent {
        if let Some(t) = transforms.transform_mut(parent) {
            t.remove_child(entity);
        }
    }

    for &child in &children {
        if let Some(t) = transforms.transform_mut(child) {
            t.set_parent_link(None);
        }
    }

    if parent.is_some() || !children.is_empty() {
        log::debug!(
            "unlinked {} from hierarchy, promoted {} children to roots",
            entity,
            children.len()
        );
    }
}

pub fn parent<L: TransformLookup + ?Sized>(transforms: &L, entity: Entity) -> Option<Entity> {
    transforms.transform(entity).and_then(Transform::parent)
}

pub fn children<L: TransformLookup + ?Sized>(transforms: &L, entity: Entity) -> Vec<Entity> {
    transforms
        .transform(entity)
        .map(|t| t.children().to_vec())
        .unwrap_or_default()
}

/// All entities below `entity`, depth first, each parent before its children.
pub fn descendants<L: TransformLookup + ?Sized>(transforms: &L, entity: Entity) -> Vec<Entity> {
    let mut result = Vec::new();
    let mut stack: Vec<Entity> = children(transforms, entity).into_iter().rev().collect();

    while let Some(current) = stack.pop() {
        result.push(current);
        if let Some(t) = transforms.transform(current) {
            stack.extend(t.children().iter().rev().copied());
        }
    }
    result
}

/// Topmost ancestor of `entity`, or `entity` itself when it is a root.
/// `None` if it has no transform.
pub fn root_of<L: TransformLookup + ?Sized>(transforms: &L, entity: Entity) -> Option<Entity> {
    let mut current = entity;
    loop {
        match transforms.transform(current)?.parent() {
            Some(parent) => current = parent,
            None => return Some(current),
        }
    }
}

/// True if walking up from `node` reaches `ancestor` (or `node == ancestor`).
fn is_ancestor_or_self<L: TransformLookup + ?Sized>(transforms: &L, ancestor: Entity, node: Entity) -> bool {
    let mut current = Some(node);
    while let Some(entity) = current {
        if entity == ancestor {
            return true;
        }
        current = parent(transforms, entity);
    }
    false
}

/// Hierarchy operations on a [`World`].
pub trait HierarchyExt {
    /// See [`set_parent`]; also fails with [`EcsError::UnknownEntity`] for
    /// dead entities.
    fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<(), EcsError>;

    fn detach(&mut self, child: Entity) -> Result<(), EcsError>;

    fn parent_of(&self, entity: Entity) -> Option<Entity>;

    fn children_of(&self, entity: Entity) -> Vec<Entity>;

    /// Destroys `entity` and every descendant, returning how many entities
    /// were destroyed.
    fn destroy_recursive(&mut self, entity: Entity) -> usize;
}

impl HierarchyExt for World {
    fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<(), EcsError> {
        for entity in [child, parent] {
            if !self.is_alive(entity) {
                return Err(EcsError::UnknownEntity(entity));
            }
        }
        crate::hierarchy::set_parent(self, child, parent)
    }

    fn detach(&mut self, child: Entity) -> Result<(), EcsError> {
        if !self.is_alive(child) {
            return Err(EcsError::UnknownEntity(child));
        }
        crate::hierarchy::detach(self, child)
    }

    fn parent_of(&self, entity: Entity) -> Option<Entity> {
        parent(self, entity)
    }

    fn children_of(&self, entity: Entity) -> Vec<Entity> {
        children(self, entity)
    }

    fn destroy_recursive(&mut self, entity: Entity) -> usize {
        if !self.is_alive(entity) {
            return 0;
        }

        let subtree = descendants(self, entity);
        let mut destroyed = 0;
        // Leaves first, so each removal hook has the least relinking to do
        for &e in subtree.iter().rev().chain(std::iter::once(&entity)) {
            if self.destroy_entity(e) {
                destroyed += 1;
            }
        }
        destroyed
    }
}
