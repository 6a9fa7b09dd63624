//! Remote peers as reported by the overlay network.

use crate::types::PubKey;
use std::net::SocketAddr;

/// A peer the local node is (or was) connected to.
///
/// `creation_time` is the wall-clock second at which the overlay first
/// instantiated this peer; the rendezvous session starts there.
#[derive(Clone, Debug, PartialEq)]
pub struct Peer {
    pub public_key: PubKey,
    pub address: SocketAddr,
    pub creation_time: f64,
    /// Median round-trip time in seconds, if measured.
    pub ping: Option<f64>,
}

impl Peer {
    pub fn new(public_key: PubKey, address: SocketAddr, creation_time: f64) -> Self {
        Self {
            public_key,
            address,
            creation_time,
            ping: None,
        }
    }

    pub fn with_ping(mut self, ping: f64) -> Self {
        self.ping = Some(ping);
        self
    }

    /// Stable identity used to key open sessions and stored records.
    pub fn identity(&self) -> PubKey {
        self.public_key
    }
}
