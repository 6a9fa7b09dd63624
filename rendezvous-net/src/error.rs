//! Error types for rendezvous-net

use rendezvous_model::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Empty message")]
    Empty,

    #[error("Unknown message id: {0}")]
    UnknownMessage(u8),

    #[error("Codec error: {0}")]
    Codec(#[from] borsh::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
