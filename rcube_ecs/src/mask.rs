use std::ops::{BitAnd, BitOr};

use crate::components::{Component, Family, MAX_FAMILIES};

/// Fixed-width set of component families.
///
/// Used both as an entity's presence mask and as a system's filter. An entity
/// matches a filter when every bit of the filter is also set in the entity's
/// mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentMask(u64);

impl ComponentMask {
    pub const EMPTY: ComponentMask = ComponentMask(0);

    /// Mask containing only `T`.
    pub fn of<T: Component>() -> Self {
        Self::EMPTY.with::<T>()
    }

    /// Builder style: returns a copy with `T` added.
    pub fn with<T: Component>(self) -> Self {
        self.with_family(Family::of::<T>())
    }

    pub fn with_family(mut self, family: Family) -> Self {
        self.insert(family);
        self
    }

    pub fn without(mut self, family: Family) -> Self {
        self.remove(family);
        self
    }

    pub fn insert(&mut self, family: Family) {
        self.0 |= 1u64 << family.index();
    }

    pub fn remove(&mut self, family: Family) {
        self.0 &= !(1u64 << family.index());
    }

    pub fn contains(&self, family: Family) -> bool {
        self.0 & (1u64 << family.index()) != 0
    }

    /// True when every family in `filter` is present in `self`.
    pub fn contains_all(&self, filter: ComponentMask) -> bool {
        self.0 & filter.0 == filter.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the families in the mask in ascending order.
    pub fn families(self) -> impl Iterator<Item = Family> {
        (0..MAX_FAMILIES)
            .filter(move |bit| self.0 & (1u64 << bit) != 0)
            .map(Family::from_index)
    }
}

impl BitOr for ComponentMask {
    type Output = ComponentMask;

    fn bitor(self, rhs: ComponentMask) -> ComponentMask {
        ComponentMask(self.0 | rhs.0)
    }
}

impl BitAnd for ComponentMask {
    type Output = ComponentMask;

    fn bitand(self, rhs: ComponentMask) -> ComponentMask {
        ComponentMask(self.0 & rhs.0)
    }
}
