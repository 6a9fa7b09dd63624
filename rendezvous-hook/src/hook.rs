//! RendezvousHook - turns peer lifecycle events into stored sessions
//!
//! Lifecycle callbacks only touch in-memory state: a peer-added event opens a
//! session, a peer-removed event closes it into a `SessionRecord` on the write
//! queue and pokes the drain worker. Store I/O happens in the worker, in
//! explicit `consume_write_queue` calls, and in `shutdown`.
//!
//! Two locks:
//! - `state` guards the open-session map and the queue together; it is never
//!   held across store I/O.
//! - `flush` serialises drains so a record is never persisted by two drains.
//!
//! Records leave the queue only after the store committed them.

use crate::drain::{DrainCmd, DrainWorker};
use crate::error::HookError;
use crate::session::OpenSessions;
use crate::write_queue::WriteQueue;
use rendezvous_model::{
    Clock, OverlayNetwork, Peer, PeerObserver, PubKey, RecordStore, SessionRecord, SystemClock,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

#[derive(Debug, Default)]
struct HookState {
    sessions: OpenSessions,
    queue: WriteQueue,
    /// Sessions a running `shutdown` is persisting, out of `sessions`.
    closing: HashMap<PubKey, f64>,
    /// Records of closing sessions whose peer left during the shutdown write.
    parked: Vec<SessionRecord>,
    shut_down: bool,
}

impl HookState {
    /// Undo a failed shutdown. Returns true if records were queued.
    fn abort_closing(&mut self) -> bool {
        for (identity, start) in self.closing.drain() {
            if self.sessions.start_of(&identity).is_none() {
                self.sessions.open(identity, start);
            }
        }
        let requeued = !self.parked.is_empty();
        for record in self.parked.drain(..) {
            self.queue.enqueue(record);
        }
        requeued
    }
}

/// State shared between the hook and its drain worker.
pub(crate) struct HookCore {
    state: Mutex<HookState>,
    flush: Mutex<()>,
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl HookCore {
    // Every mutation leaves the state consistent, so a poisoned lock is still usable.
    fn lock_state(&self) -> MutexGuard<'_, HookState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_flush(&self) -> MutexGuard<'_, ()> {
        self.flush.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist everything queued, then release it from the queue.
    pub(crate) fn consume_write_queue(&self) -> Result<usize, HookError> {
        let _flush = self.lock_flush();

        let pending = self.lock_state().queue.pending();
        if pending.is_empty() {
            return Ok(0);
        }

        self.store.put_batch(&pending)?;
        self.lock_state().queue.release(pending.len());

        debug!(count = pending.len(), "Drained rendezvous write queue");
        Ok(pending.len())
    }
}

/// Records the interval during which each remote peer was connected.
pub struct RendezvousHook {
    core: Arc<HookCore>,
    drain_tx: Option<mpsc::UnboundedSender<DrainCmd>>,
}

impl RendezvousHook {
    /// Create a hook persisting into `store` and reading time from `clock`.
    ///
    /// Inside a tokio runtime a drain worker is spawned on it; outside one the
    /// queue is only drained by `consume_write_queue` and `shutdown`.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        let core = Arc::new(HookCore {
            state: Mutex::new(HookState::default()),
            flush: Mutex::new(()),
            store,
            clock,
        });

        let drain_tx = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(DrainWorker::spawn(core.clone(), &handle)),
            Err(_) => {
                debug!("No tokio runtime; rendezvous queue drains only on demand");
                None
            }
        };

        Self { core, drain_tx }
    }

    /// Create a hook that reads the real wall clock.
    pub fn with_system_clock(store: Arc<dyn RecordStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    /// Current wall-clock seconds according to the injected clock.
    pub fn current_time(&self) -> f64 {
        self.core.clock.now_secs()
    }

    /// Persist every queued record. A no-op on an empty queue.
    ///
    /// On failure the records stay queued and the error is returned.
    pub fn consume_write_queue(&self) -> Result<usize, HookError> {
        self.core.consume_write_queue()
    }

    /// Number of records waiting to be persisted.
    pub fn write_queue_len(&self) -> usize {
        self.core.lock_state().queue.len()
    }

    /// Number of sessions opened and not yet closed.
    pub fn open_session_count(&self) -> usize {
        self.core.lock_state().sessions.len()
    }

    /// Start time of the open session for `peer`, if one exists.
    pub fn session_start(&self, peer: &PubKey) -> Option<f64> {
        self.core.lock_state().sessions.start_of(peer)
    }

    /// Whether a shutdown has completed.
    pub fn is_shut_down(&self) -> bool {
        self.core.lock_state().shut_down
    }

    /// Synchronously close all sessions of still-connected peers and persist
    /// them together with anything still queued.
    ///
    /// The closed sessions leave the open-session map before the store write,
    /// so a removal racing the write cannot queue them a second time. On
    /// failure they are put back and the call can be retried. After a
    /// successful shutdown the drain worker is stopped, further events are
    /// ignored and later calls return 0.
    pub fn shutdown(&self, network: &dyn OverlayNetwork) -> Result<usize, HookError> {
        let _flush = self.core.lock_flush();
        let stop = self.current_time();
        let peers = network.verified_peers();

        let (batch, queued) = {
            let mut state = self.core.lock_state();
            if state.shut_down {
                return Ok(0);
            }

            let mut synthesized = Vec::new();
            for peer in &peers {
                let identity = peer.identity();
                // Duplicates find the session already gone
                let Some(start) = state.sessions.close(&identity) else {
                    continue;
                };
                state.closing.insert(identity, start);
                match SessionRecord::for_peer(peer, start, stop) {
                    Some(record) => synthesized.push(record),
                    None => debug!(peer = %identity, start, stop, "Discarding session that ends before it starts"),
                }
            }

            let mut batch = state.queue.pending();
            let queued = batch.len();
            batch.extend(synthesized);
            (batch, queued)
        };

        if !batch.is_empty() {
            if let Err(e) = self.core.store.put_batch(&batch) {
                if self.core.lock_state().abort_closing() {
                    self.schedule_drain();
                }
                return Err(e.into());
            }
        }

        {
            let mut state = self.core.lock_state();
            state.queue.release(queued);
            state.closing.clear();
            state.parked.clear();
            state.shut_down = true;
        }

        if let Some(tx) = &self.drain_tx {
            let _ = tx.send(DrainCmd::Shutdown);
        }

        info!(
            queued = queued,
            closed = batch.len() - queued,
            "Rendezvous records flushed on shutdown"
        );
        Ok(batch.len())
    }

    fn schedule_drain(&self) {
        if let Some(tx) = &self.drain_tx {
            if tx.send(DrainCmd::Drain).is_err() {
                trace!("Drain worker gone; record stays queued");
            }
        }
    }
}

impl PeerObserver for RendezvousHook {
    /// Open (or restart) the session of `peer` at its creation time.
    fn on_peer_added(&self, peer: &Peer) {
        let identity = peer.identity();
        let mut state = self.core.lock_state();
        if state.shut_down {
            trace!(peer = %identity, "Ignoring peer added after shutdown");
            return;
        }
        if let Some(previous) = state.sessions.open(identity, peer.creation_time) {
            debug!(peer = %identity, previous, start = peer.creation_time, "Restarted open session");
        } else {
            trace!(peer = %identity, start = peer.creation_time, "Opened session");
        }
    }

    /// Close the session of `peer` and queue its record for persistence.
    fn on_peer_removed(&self, peer: &Peer) {
        let identity = peer.identity();
        let enqueued = {
            let mut state = self.core.lock_state();
            if state.shut_down {
                trace!(peer = %identity, "Ignoring peer removed after shutdown");
                return;
            }
            let stop = self.core.clock.now_secs();
            if let Some(start) = state.sessions.close(&identity) {
                match SessionRecord::for_peer(peer, start, stop) {
                    Some(record) => {
                        state.queue.enqueue(record);
                        true
                    }
                    None => {
                        debug!(peer = %identity, start, stop, "Discarding session that ends before it starts");
                        false
                    }
                }
            } else if let Some(start) = state.closing.remove(&identity) {
                // Shutdown is writing this session; keep ours only if that write fails
                trace!(peer = %identity, "Peer removed while shutdown persists its session");
                if let Some(record) = SessionRecord::for_peer(peer, start, stop) {
                    state.parked.push(record);
                }
                false
            } else {
                trace!(peer = %identity, "Peer removed without an open session");
                false
            }
        };

        if enqueued {
            self.schedule_drain();
        }
    }
}
