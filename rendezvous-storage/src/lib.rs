//! Rendezvous Storage
//!
//! redb-backed implementation of the `RecordStore` contract plus the data
//! directory layout it lives in.

pub mod data_dir;
pub mod rendezvous_db;

pub use data_dir::DataDir;
pub use rendezvous_db::{RendezvousDb, RendezvousDbError};
// Re-export for convenience (canonical home is rendezvous_model::StorageConfig)
pub use rendezvous_model::StorageConfig;
