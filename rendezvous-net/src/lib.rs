//! Rendezvous Networking
//!
//! Crawler pull protocol:
//! - **payload**: `PullRecordPayload` / `RecordPayload` and their framing
//! - **crawler**: `CrawlerResponder`, which hands a random stored record to
//!   the one crawler the node trusts

pub mod crawler;
pub mod error;
pub mod payload;

pub use crawler::CrawlerResponder;
pub use error::ProtocolError;
pub use payload::{PullRecordPayload, RecordPayload, RendezvousMessage};
