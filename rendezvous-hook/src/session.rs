//! Open-session tracking
//!
//! Maps each connected peer to the wall-clock second its session started.
//! Volatile: nothing here is persisted until the session closes.

use rendezvous_model::PubKey;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct OpenSessions {
    starts: HashMap<PubKey, f64>,
}

impl OpenSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a session. Returns the start time it replaced, if any.
    pub fn open(&mut self, peer: PubKey, start: f64) -> Option<f64> {
        self.starts.insert(peer, start)
    }

    /// End a session, returning its start time.
    pub fn close(&mut self, peer: &PubKey) -> Option<f64> {
        self.starts.remove(peer)
    }

    pub fn start_of(&self, peer: &PubKey) -> Option<f64> {
        self.starts.get(peer).copied()
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let mut sessions = OpenSessions::new();
        assert_eq!(sessions.open(PubKey([1; 32]), 10.0), None);
        assert_eq!(sessions.start_of(&PubKey([1; 32])), Some(10.0));
        assert_eq!(sessions.open(PubKey([1; 32]), 12.0), Some(10.0));
        assert_eq!(sessions.close(&PubKey([1; 32])), Some(12.0));
        assert_eq!(sessions.close(&PubKey([1; 32])), None);
        assert!(sessions.is_empty());
    }
}
