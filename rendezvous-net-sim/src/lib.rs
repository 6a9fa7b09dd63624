//! In-memory overlay simulation for rendezvous accounting
//!
//! Provides `SimNetwork`, an `OverlayNetwork` that keeps a set of verified
//! peers and dispatches lifecycle events to registered observers. Enables
//! end-to-end hook testing without real networking.

mod sim_network;

pub use sim_network::{random_peer, SimNetwork};
