//! Entity-component storage, filtering and system scheduling for rcube.
//!
//! Entities are plain ids. Each component type gets a process-wide
//! [`Family`] tag and its own dense [`ComponentStore`]. The [`World`] keeps
//! an [`EntityRegistry`] of component masks and pushes membership changes to
//! every [`System`] whose filters are affected.

pub mod components;
pub mod config;
pub mod entity;
pub mod error;
pub mod handle;
pub mod mask;
pub mod registry;
pub mod storage;
pub mod system;
pub mod world;

// Re-export commonly used types for convenience
pub use components::{family_of, Component, Family, MAX_FAMILIES};
pub use config::{ConfigError, WorldConfig};
pub use entity::Entity;
pub use error::EcsError;
pub use handle::EntityHandle;
pub use mask::ComponentMask;
pub use registry::{EntityRegistry, MaskChange};
pub use storage::{AnyComponentStore, ComponentStore, ComponentStores, StoreMut};
pub use system::{FrameInfo, Subscriptions, System};
pub use world::World;
