//! RendezvousSettings - user-facing configuration of session accounting

use crate::storage_config::StorageConfig;
use crate::types::PubKey;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendezvousSettings {
    /// Record rendezvous sessions at all. Nothing in the library reads this;
    /// the embedding node checks it before creating a `RendezvousHook`.
    pub enabled: bool,
    /// Public key of the crawler allowed to pull records.
    #[serde(with = "hex_pubkey")]
    pub crawler: Option<PubKey>,
    /// Database location; `:memory:` keeps it in memory. `None` uses the data dir.
    pub database: Option<PathBuf>,
}

impl Default for RendezvousSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            crawler: None,
            database: None,
        }
    }
}

impl RendezvousSettings {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_crawler(mut self, crawler: PubKey) -> Self {
        self.crawler = Some(crawler);
        self
    }

    pub fn with_database(mut self, database: impl Into<PathBuf>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Storage location, falling back to `default_path` when none is configured.
    pub fn storage(&self, default_path: impl Into<PathBuf>) -> StorageConfig {
        match &self.database {
            Some(path) => match path.to_str() {
                Some(s) => StorageConfig::parse(s),
                None => StorageConfig::File(path.clone()),
            },
            None => StorageConfig::File(default_path.into()),
        }
    }
}

mod hex_pubkey {
    use crate::types::PubKey;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &Option<PubKey>, serializer: S) -> Result<S::Ok, S::Error> {
        match key {
            Some(key) => serializer.serialize_some(&key.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PubKey>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| PubKey::from_hex(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
