use thiserror::Error;

use crate::Entity;

/// Errors signalled by the ECS core.
///
/// The core never retries or repairs; it reports the condition and leaves the
/// decision to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A component accessor was used on an entity lacking that component.
    #[error("{entity} has no {component} component")]
    ComponentNotFound {
        entity: Entity,
        component: &'static str,
    },

    /// `add` was called twice for the same entity and component type.
    #[error("{entity} already has a {component} component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    /// The entity was destroyed or never created by this world.
    #[error("{0} is not alive")]
    UnknownEntity(Entity),

    /// A hierarchy edge points at an entity that has no transform, or whose
    /// transform does not link back.
    #[error("{entity} references {missing}, which has no transform linking back")]
    DanglingHierarchyReference { entity: Entity, missing: Entity },

    /// Attaching `child` under `parent` would close a loop.
    #[error("attaching {child} under {parent} would create a cycle")]
    HierarchyCycle { child: Entity, parent: Entity },

    /// A system declared a filter that selects nothing in particular.
    #[error("system {system} declares an empty filter")]
    EmptyFilter { system: String },
}
