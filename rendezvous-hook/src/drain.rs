//! Deferred drain worker
//!
//! A task on the hook's tokio runtime that persists the write queue whenever
//! a peer-removed event signals new work. The store commit itself runs under
//! `spawn_blocking`. Signals that pile up while a drain is in flight collapse
//! into one drain, so a burst of removals costs a single store round-trip.

use crate::hook::HookCore;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Commands for the drain worker
pub(crate) enum DrainCmd {
    /// New records were queued
    Drain,
    /// Stop after the current drain
    Shutdown,
}

pub(crate) struct DrainWorker {
    core: Arc<HookCore>,
    rx: mpsc::UnboundedReceiver<DrainCmd>,
}

impl DrainWorker {
    /// Spawn the worker on `handle` and return its command sender.
    pub(crate) fn spawn(core: Arc<HookCore>, handle: &Handle) -> mpsc::UnboundedSender<DrainCmd> {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Self { core, rx };
        handle.spawn(worker.run());
        tx
    }

    /// Run the worker loop until shutdown or until every sender is dropped.
    async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                DrainCmd::Drain => {
                    let stop = self.coalesce();
                    Self::drain(self.core.clone()).await;
                    if stop {
                        break;
                    }
                }
                DrainCmd::Shutdown => break,
            }
        }
        debug!("Rendezvous drain worker stopped");
    }

    /// Persist the queue on the blocking pool; redb commits are synchronous.
    async fn drain(core: Arc<HookCore>) {
        match tokio::task::spawn_blocking(move || core.consume_write_queue()).await {
            Ok(Ok(_)) => {}
            // A failed drain leaves the records queued for the next one
            Ok(Err(e)) => warn!(error = %e, "Deferred rendezvous drain failed"),
            Err(e) => warn!(error = %e, "Deferred rendezvous drain task failed"),
        }
    }

    /// Swallow already-pending signals. Returns true if a shutdown was among them.
    fn coalesce(&mut self) -> bool {
        while let Ok(cmd) = self.rx.try_recv() {
            if let DrainCmd::Shutdown = cmd {
                return true;
            }
        }
        false
    }
}
