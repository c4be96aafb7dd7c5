use rcube_ecs::Component;

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub name: String,
}

impl Name {
    /// Creates a new Name with the specified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::Name;

    #[test]
    fn test_name_component() {
        let name = Name::new("Test");
        assert_eq!(name.name, "Test");
        assert_eq!(name.to_string(), "Test");
    }
}
