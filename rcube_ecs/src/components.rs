use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;

use crate::{ComponentStore, Entity};

// Re-export the derive macro for convenience
pub use rcube_derive::Component;

/// Width of [`ComponentMask`](crate::ComponentMask), and therefore the number
/// of distinct component types a process can register.
pub const MAX_FAMILIES: usize = 64;

lazy_static! {
    static ref FAMILIES: Mutex<HashMap<TypeId, Family>> = Mutex::new(HashMap::new());
}

thread_local! {
    // Families already seen by this thread, so lookups skip the global lock
    static KNOWN: RefCell<HashMap<TypeId, Family>> = RefCell::new(HashMap::new());
}

/// Core Component trait for the ECS framework.
///
/// Components are pure data containers that can be attached to entities.
/// Systems operate on entities that have specific combinations of components.
///
/// # Examples
///
/// ```
/// use rcube_ecs::Component;
///
/// #[derive(Component)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// assert_eq!(Health::NAME, "Health");
/// ```
pub trait Component: Sized + 'static {
    /// Human readable type name used in errors and logs.
    const NAME: &'static str;

    /// Mutable access handed out by stores and worlds. Derived components
    /// use `&'a mut Self`; a component with invariants that plain assignment
    /// would break can hand out a narrower guard instead.
    type Mut<'a>
    where
        Self: 'a;

    /// Wraps a mutable reference to a stored value into [`Self::Mut`].
    fn wrap_mut(value: &mut Self) -> Self::Mut<'_>;

    /// Called by the owning store right before `entity`'s value is removed,
    /// while the value is still readable through `store`.
    ///
    /// Components that hold associations to other entities of the same type
    /// use this to unlink themselves so no reference outlives the value.
    fn before_remove(_entity: Entity, _store: &mut ComponentStore<Self>) {}

    /// The process-wide tag of this component type.
    fn family() -> Family {
        Family::of::<Self>()
    }
}

/// Small integer identifying a component type for the lifetime of the process.
///
/// Families are assigned on first use, in first-use order, and double as bit
/// positions in a [`ComponentMask`](crate::ComponentMask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Family(u8);

impl Family {
    /// Returns the family of `T`, registering it if this is the first request.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_FAMILIES`] component types are registered.
    pub fn of<T: Component>() -> Family {
        let type_id = TypeId::of::<T>();
        if let Some(family) = KNOWN.with(|known| known.borrow().get(&type_id).copied()) {
            return family;
        }

        let family = Self::register::<T>(type_id);
        KNOWN.with(|known| known.borrow_mut().insert(type_id, family));
        family
    }

    fn register<T: Component>(type_id: TypeId) -> Family {
        let mut families = FAMILIES.lock().unwrap_or_else(PoisonError::into_inner);
        let next = families.len();
        *families.entry(type_id).or_insert_with(|| {
            assert!(
                next < MAX_FAMILIES,
                "component family limit ({}) exceeded while registering {}",
                MAX_FAMILIES,
                T::NAME
            );
            log::debug!("registered component family {} for {}", next, T::NAME);
            Family(next as u8)
        })
    }

    pub(crate) fn from_index(index: usize) -> Family {
        debug_assert!(index < MAX_FAMILIES);
        Family(index as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Shorthand for [`Family::of`].
pub fn family_of<T: Component>() -> Family {
    Family::of::<T>()
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Family({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Component)]
    struct Position;

    #[derive(Component)]
    struct Velocity;

    #[derive(Component)]
    struct Wrapper<T: 'static>(T);

    #[test]
    fn test_family_is_stable() {
        assert_eq!(Family::of::<Position>(), Family::of::<Position>());
        assert_eq!(Position::family(), Family::of::<Position>());
        assert_eq!(family_of::<Position>(), Family::of::<Position>());
    }

    #[test]
    fn test_families_are_distinct() {
        assert_ne!(Family::of::<Position>(), Family::of::<Velocity>());
        assert_ne!(Family::of::<Wrapper<u32>>(), Family::of::<Wrapper<f32>>());
        assert!(Family::of::<Velocity>().index() < MAX_FAMILIES);
    }

    #[test]
    fn test_family_is_shared_across_threads() {
        let there = std::thread::spawn(Family::of::<Velocity>).join().unwrap();
        assert_eq!(Family::of::<Velocity>(), there);
        assert_eq!(Velocity::family(), there);
    }

    #[test]
    fn test_derived_name() {
        assert_eq!(Position::NAME, "Position");
        assert_eq!(<Wrapper<u8>>::NAME, "Wrapper");
    }
}
