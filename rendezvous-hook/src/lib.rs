//! Rendezvous Hook
//!
//! Observes peer lifecycle events from the overlay and turns each
//! connect/disconnect pair into a persisted session record:
//! - **RendezvousHook**: open-session map, validation, enqueue, shutdown flush
//! - **WriteQueue**: FIFO of records awaiting persistence
//! - **DrainWorker**: deferred, coalescing drain of the queue into the store

mod drain;
mod error;
mod hook;
mod session;
mod write_queue;

pub use error::HookError;
pub use hook::RendezvousHook;
pub use session::OpenSessions;
pub use write_queue::WriteQueue;
