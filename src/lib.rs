//! Scene components and hierarchical transform propagation for rcube.
//!
//! Builds on [`rcube_ecs`]: a [`Transform`] carries position, orientation and
//! scale plus non-owning parent/child links, and the [`TransformSystem`]
//! turns those into cached local and world matrices each frame, touching
//! only the subtrees that changed.
//!
//! ```
//! use rcube::{HierarchyExt, Transform, TransformSystem};
//! use rcube::ecs::World;
//! use rcube::math::Vec3;
//!
//! let mut world = World::new();
//! world.add_system(Box::new(TransformSystem::new())).unwrap();
//!
//! let parent = world.spawn().with(Transform::from_position(Vec3::new(5.0, 0.0, 0.0))).unwrap().id();
//! let child = world.spawn().with(Transform::from_position(Vec3::X)).unwrap().id();
//! world.set_parent(child, parent).unwrap();
//!
//! world.update(0.016).unwrap();
//! let position = world.get_component::<Transform>(child).unwrap().world_position();
//! assert_eq!(position, Vec3::new(6.0, 0.0, 0.0));
//! ```

pub mod components;
pub mod hierarchy;
pub mod systems;

pub use rcube_ecs as ecs;
pub use rcube_math as math;

pub use components::*;
pub use hierarchy::{HierarchyExt, TransformLookup};
pub use systems::TransformSystem;
