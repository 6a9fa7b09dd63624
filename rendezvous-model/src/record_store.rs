//! RecordStore - durable append/query contract for session records
//!
//! Implemented by `RendezvousDb` in rendezvous-storage; the hook only talks
//! to this trait so tests can substitute a failing or instrumented store.

use crate::record::SessionRecord;
use crate::types::PubKey;
use thiserror::Error;

/// Backend-neutral store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("store is closed")]
    Closed,
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Durable, identity-keyed append log of session records.
pub trait RecordStore: Send + Sync {
    /// Durably append one record. Returns once committed.
    fn put(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// Durably append several records as one unit.
    ///
    /// Either every record is committed or none is. The default commits one
    /// at a time; backends with transactions should override it.
    fn put_batch(&self, records: &[SessionRecord]) -> Result<(), StoreError> {
        for record in records {
            self.put(record)?;
        }
        Ok(())
    }

    /// Every record ever stored for `identity`, in insertion order.
    /// An unknown identity yields an empty vector.
    fn get(&self, identity: &PubKey) -> Result<Vec<SessionRecord>, StoreError>;

    /// One uniformly chosen record, `None` when the store is empty.
    fn random(&self) -> Result<Option<SessionRecord>, StoreError>;

    /// Total number of stored records.
    fn len(&self) -> Result<u64, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Release resources. Later calls fail with `StoreError::Closed`.
    fn close(&self) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn put(&self, record: &SessionRecord) -> Result<(), StoreError> {
        (**self).put(record)
    }

    fn put_batch(&self, records: &[SessionRecord]) -> Result<(), StoreError> {
        (**self).put_batch(records)
    }

    fn get(&self, identity: &PubKey) -> Result<Vec<SessionRecord>, StoreError> {
        (**self).get(identity)
    }

    fn random(&self) -> Result<Option<SessionRecord>, StoreError> {
        (**self).random()
    }

    fn len(&self) -> Result<u64, StoreError> {
        (**self).len()
    }

    fn close(&self) -> Result<(), StoreError> {
        (**self).close()
    }
}
