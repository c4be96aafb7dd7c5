use std::ops::Deref;

use rcube_ecs::{Component, ComponentStore, Entity};
use rcube_math::{Mat4, Quat, Vec3};

use crate::hierarchy;

/// Spatial placement of an entity, optionally relative to a parent entity.
///
/// Position, orientation and scale are the inputs; `local` and `world` are
/// cached results written by [`TransformSystem`](crate::TransformSystem).
/// Every setter marks the transform dirty so the next update recomputes it.
///
/// Parent and children are plain entity ids and never own anything. They
/// are changed only through [`hierarchy`](crate::hierarchy), which keeps
/// both directions in agreement and refuses cycles. A stored transform is
/// reached mutably through [`TransformMut`], and a clone starts out unlinked.
#[derive(Debug)]
pub struct Transform {
    position: Vec3,
    orientation: Quat,
    scale: Vec3,
    local: Mat4,
    world: Mat4,
    parent: Option<Entity>,
    children: Vec<Entity>,
    dirty: bool,
}

impl Clone for Transform {
    /// Copies the spatial state only. The copy has no parent or children
    /// and is dirty.
    fn clone(&self) -> Self {
        Self {
            position: self.position,
            orientation: self.orientation,
            scale: self.scale,
            local: self.local,
            world: self.world,
            parent: None,
            children: Vec::new(),
            dirty: true,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
            parent: None,
            children: Vec::new(),
            dirty: true,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.set_orientation(orientation);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    /// The orientation is stored normalized.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalized();
        self.dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.set_position(self.position + offset);
    }

    /// Applies `rotation` after the current orientation.
    pub fn rotate(&mut self, rotation: Quat) {
        self.set_orientation(rotation * self.orientation);
    }

    /// Cached local matrix as of the last propagation.
    pub fn local(&self) -> &Mat4 {
        &self.local
    }

    /// Cached world matrix as of the last propagation.
    pub fn world(&self) -> &Mat4 {
        &self.world
    }

    pub fn world_position(&self) -> Vec3 {
        self.world.translation()
    }

    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// `T * R * S`: scale, then orientation, then translation.
    pub fn compose_local(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }

    /// Rebuilds the cached matrices and clears the dirty flag.
    pub(crate) fn recompute(&mut self, parent_world: Option<&Mat4>) {
        self.local = self.compose_local();
        self.world = match parent_world {
            Some(parent_world) => *parent_world * self.local,
            None => self.local,
        };
        self.dirty = false;
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<Entity>) {
        self.parent = parent;
        self.dirty = true;
    }

    pub(crate) fn push_child(&mut self, child: Entity) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: Entity) {
        self.children.retain(|c| *c != child);
    }

    pub(crate) fn take_children(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.children)
    }
}

/// Mutable access to a stored [`Transform`].
///
/// Reads deref to the transform; writes are limited to the spatial setters.
/// The value cannot be replaced wholesale, so its parent and child links
/// only change through [`hierarchy`](crate::hierarchy).
///
/// ```compile_fail
/// use rcube::ecs::World;
/// use rcube::Transform;
///
/// let mut world = World::new();
/// let e = world.create_entity();
/// world.add_component(e, Transform::new()).unwrap();
/// *world.get_component_mut::<Transform>(e).unwrap() = Transform::new();
/// ```
#[derive(Debug)]
pub struct TransformMut<'a>(pub(crate) &'a mut Transform);

impl TransformMut<'_> {
    pub fn set_position(&mut self, position: Vec3) {
        self.0.set_position(position);
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.0.set_orientation(orientation);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.0.set_scale(scale);
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.0.translate(offset);
    }

    pub fn rotate(&mut self, rotation: Quat) {
        self.0.rotate(rotation);
    }

    pub fn mark_dirty(&mut self) {
        self.0.mark_dirty();
    }
}

impl Deref for TransformMut<'_> {
    type Target = Transform;

    fn deref(&self) -> &Transform {
        self.0
    }
}

impl Component for Transform {
    const NAME: &'static str = "Transform";

    type Mut<'a> = TransformMut<'a>;

    fn wrap_mut(value: &mut Self) -> TransformMut<'_> {
        TransformMut(value)
    }

    /// Unlinks the transform from its parent and promotes its children to
    /// roots, so no other transform refers to `entity` afterwards.
    fn before_remove(entity: Entity, store: &mut ComponentStore<Self>) {
        hierarchy::unlink(store, entity);
    }
}
