//! Rendezvous Model
//!
//! Pure data types and traits for rendezvous session accounting, decoupled
//! from the storage engine and the overlay network:
//! - **PubKey / Hash**: strong byte types for peer identity
//! - **Clock**: time abstraction for testability
//! - **Peer / SessionRecord**: observed peers and closed sessions
//! - **RecordStore**: durable append/query contract
//! - **PeerObserver / OverlayNetwork**: overlay collaborator seams

pub mod types;
pub mod clock;
pub mod peer;
pub mod record;
pub mod record_store;
pub mod overlay;
pub mod settings;
pub mod storage_config;

// Re-exports
pub use types::{Hash, PubKey};
pub use clock::{Clock, SystemClock, MockClock};
pub use peer::Peer;
pub use record::{SessionRecord, UNKNOWN_PING};
pub use record_store::{RecordStore, StoreError};
pub use overlay::{OverlayNetwork, PeerObserver};
pub use settings::RendezvousSettings;
pub use storage_config::StorageConfig;
