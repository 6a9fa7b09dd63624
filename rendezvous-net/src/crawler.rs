//! CrawlerResponder - answers record pulls from the designated crawler

use crate::error::ProtocolError;
use crate::payload::{PullRecordPayload, RecordPayload, RendezvousMessage};
use rendezvous_model::{PubKey, RecordStore, RendezvousSettings};
use std::sync::Arc;
use tracing::{debug, trace};

pub struct CrawlerResponder {
    local: PubKey,
    crawler: Option<PubKey>,
    store: Arc<dyn RecordStore>,
}

impl CrawlerResponder {
    /// `local` is this node's key; only `crawler` may pull.
    pub fn new(local: PubKey, crawler: Option<PubKey>, store: Arc<dyn RecordStore>) -> Self {
        Self { local, crawler, store }
    }

    pub fn from_settings(local: PubKey, settings: &RendezvousSettings, store: Arc<dyn RecordStore>) -> Self {
        Self::new(local, settings.crawler, store)
    }

    /// Answer a pull from `sender`.
    ///
    /// `Ok(None)` when the sender is not the crawler, the request was addressed
    /// to another node, or there is nothing to share.
    pub fn handle_pull(
        &self,
        sender: &PubKey,
        request: &PullRecordPayload,
    ) -> Result<Option<RecordPayload>, ProtocolError> {
        if self.crawler.as_ref() != Some(sender) {
            trace!(peer = %sender, "Ignoring record pull from unknown crawler");
            return Ok(None);
        }
        if request.mid != self.local.mid() {
            debug!(peer = %sender, "Ignoring record pull addressed to another node");
            return Ok(None);
        }
        Ok(self.store.random()?.map(|record| RecordPayload::from(&record)))
    }

    /// Decode `bytes` from `sender` and produce the encoded reply, if any.
    pub fn handle_message(&self, sender: &PubKey, bytes: &[u8]) -> Result<Option<Vec<u8>>, ProtocolError> {
        match RendezvousMessage::decode(bytes)? {
            RendezvousMessage::PullRecord(request) => match self.handle_pull(sender, &request)? {
                Some(record) => Ok(Some(RendezvousMessage::Record(record).encode()?)),
                None => Ok(None),
            },
            RendezvousMessage::Record(_) => {
                trace!(peer = %sender, "Ignoring unsolicited record");
                Ok(None)
            }
        }
    }
}
