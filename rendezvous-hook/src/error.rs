//! Error types for rendezvous-hook

use rendezvous_model::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    /// Records could not be persisted; they remain queued.
    #[error("Persisting rendezvous records failed: {0}")]
    Store(#[from] StoreError),
}
