use std::path::PathBuf;

/// Location string that selects in-memory storage.
pub const IN_MEMORY: &str = ":memory:";

/// Configuration for where to store data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// File-backed storage at the given database path.
    File(PathBuf),
    /// In-memory storage (no filesystem). Useful for tests.
    InMemory,
}

impl StorageConfig {
    /// Interpret a user-supplied location; `:memory:` selects `InMemory`.
    pub fn parse(location: &str) -> Self {
        if location == IN_MEMORY {
            Self::InMemory
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self, Self::InMemory)
    }
}

impl From<PathBuf> for StorageConfig {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_marker() {
        assert_eq!(StorageConfig::parse(":memory:"), StorageConfig::InMemory);
        assert_eq!(
            StorageConfig::parse("/tmp/rendezvous.redb"),
            StorageConfig::File(PathBuf::from("/tmp/rendezvous.redb"))
        );
    }
}
