//! SimNetwork - in-memory overlay with peer observers

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rendezvous_model::{OverlayNetwork, Peer, PeerObserver, PubKey};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, RwLock};

/// Overlay stand-in: tracks verified peers and notifies observers.
///
/// Observers are invoked synchronously on the calling thread, like the
/// overlay's own dispatch loop.
#[derive(Clone, Default)]
pub struct SimNetwork {
    peers: Arc<RwLock<HashMap<PubKey, Peer>>>,
    observers: Arc<RwLock<Vec<Arc<dyn PeerObserver>>>>,
}

impl SimNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_peer_observer(&self, observer: Arc<dyn PeerObserver>) {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(observer);
        }
    }

    fn observers(&self) -> Vec<Arc<dyn PeerObserver>> {
        self.observers.read().map(|o| o.clone()).unwrap_or_default()
    }

    /// Register `peer` as connected and verified, then notify observers.
    pub fn add_verified_peer(&self, peer: Peer) {
        if let Ok(mut peers) = self.peers.write() {
            peers.insert(peer.identity(), peer.clone());
        }
        tracing::trace!(peer = %peer.identity(), "SimNetwork peer added");
        for observer in self.observers() {
            observer.on_peer_added(&peer);
        }
    }

    /// Drop `peer` from the verified set and notify observers.
    /// Returns false if the peer was not connected.
    pub fn remove_peer(&self, identity: &PubKey) -> bool {
        let removed = self.peers.write().ok().and_then(|mut peers| peers.remove(identity));
        let Some(peer) = removed else {
            return false;
        };
        tracing::trace!(peer = %identity, "SimNetwork peer removed");
        for observer in self.observers() {
            observer.on_peer_removed(&peer);
        }
        true
    }

    pub fn peer_count(&self) -> usize {
        self.peers.read().map(|p| p.len()).unwrap_or(0)
    }
}

impl OverlayNetwork for SimNetwork {
    fn verified_peers(&self) -> Vec<Peer> {
        self.peers.read().map(|p| p.values().cloned().collect()).unwrap_or_default()
    }
}

/// A peer with a freshly generated Ed25519 identity, created at `creation_time`.
pub fn random_peer(creation_time: f64) -> Peer {
    let key = SigningKey::generate(&mut OsRng);
    let octets = key.verifying_key().to_bytes();
    let address = SocketAddr::new(
        Ipv4Addr::new(10, octets[0], octets[1], octets[2]).into(),
        1024 + u16::from(octets[3]),
    );
    Peer::new(PubKey::from(&key.verifying_key()), address, creation_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(&'static str, PubKey)>>,
    }

    impl PeerObserver for Recorder {
        fn on_peer_added(&self, peer: &Peer) {
            self.events.lock().unwrap().push(("added", peer.identity()));
        }

        fn on_peer_removed(&self, peer: &Peer) {
            self.events.lock().unwrap().push(("removed", peer.identity()));
        }
    }

    #[test]
    fn test_dispatches_events_to_observers() {
        let network = SimNetwork::new();
        let recorder = Arc::new(Recorder::default());
        network.add_peer_observer(recorder.clone());

        let peer = random_peer(100.0);
        network.add_verified_peer(peer.clone());
        assert_eq!(network.verified_peers(), vec![peer.clone()]);

        assert!(network.remove_peer(&peer.identity()));
        assert!(!network.remove_peer(&peer.identity()));
        assert_eq!(network.peer_count(), 0);

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, vec![("added", peer.identity()), ("removed", peer.identity())]);
    }

    #[test]
    fn test_random_peers_have_distinct_identities() {
        assert_ne!(random_peer(0.0).identity(), random_peer(0.0).identity());
    }
}
