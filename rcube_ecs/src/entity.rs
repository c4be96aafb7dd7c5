/// Entity is a unique identifier for a scene object.
///
/// Entities carry no data; everything lives in component stores keyed by the
/// entity. Ids are handed out in increasing order by the
/// [`EntityRegistry`](crate::EntityRegistry) and are never reused, so a stale
/// id can never alias a newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_equality() {
        let id1 = Entity::new(1);
        let id2 = Entity::new(1);
        let id3 = Entity::new(2);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id3.id(), 2);
    }

    #[test]
    fn test_entity_ordering() {
        let id1 = Entity::new(1);
        let id2 = Entity::new(2);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_entity_display() {
        assert_eq!(format!("{}", Entity::new(123)), "Entity(123)");
    }
}
