//! Data directory management
//!
//! Layout under the node's state directory:
//! - `sqlite/rendezvous.redb`: rendezvous session records

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DataDir {
    base: PathBuf,
}

impl DataDir {
    /// Create a DataDir with a custom base path.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Get the base directory path.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory holding the node's databases.
    pub fn db_dir(&self) -> PathBuf {
        self.base.join("sqlite")
    }

    /// Path to the rendezvous database.
    pub fn rendezvous_db(&self) -> PathBuf {
        self.db_dir().join("rendezvous.redb")
    }

    /// Ensure the database directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.db_dir())
    }
}
