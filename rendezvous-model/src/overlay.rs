//! Overlay network collaborator seams
//!
//! The overlay delivers peer lifecycle callbacks to observers and can be asked
//! which peers are currently connected.

use crate::peer::Peer;

/// Receives peer lifecycle events from the overlay's dispatch loop.
///
/// Implementations run on the overlay's event path: they must return
/// quickly and never block on I/O.
pub trait PeerObserver: Send + Sync {
    fn on_peer_added(&self, peer: &Peer);

    fn on_peer_removed(&self, peer: &Peer);
}

/// Read access to the overlay's set of connected peers.
pub trait OverlayNetwork {
    /// Peers that are currently connected and verified.
    fn verified_peers(&self) -> Vec<Peer>;
}
