//! RendezvousDb - durable store of rendezvous session records
//!
//! Tables:
//! - records: monotonic u64 seq → borsh SessionRecord bytes
//! - by_peer: public key (32 bytes) ++ seq (big-endian) → seq
//!
//! The seq is assigned inside the write transaction, so insertion order is
//! total and survives a reopen. `get` walks the `by_peer` prefix, which yields
//! a peer's records in the order they were stored.

use rand::Rng;
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use rendezvous_model::{PubKey, RecordStore, SessionRecord, StorageConfig, StoreError};
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

const RECORDS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("records");
const BY_PEER_TABLE: TableDefinition<&[u8], u64> = TableDefinition::new("by_peer");

#[derive(Debug, Error)]
pub enum RendezvousDbError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row is not a valid record. Mapped explicitly: borsh's error
    /// type is `std::io::Error`, which `Io` already converts from.
    #[error("Record decode error: {0}")]
    Decode(borsh::io::Error),

    #[error("Dangling index entry for seq {0}")]
    DanglingIndex(u64),

    #[error("Database is closed")]
    Closed,

    #[error("Lock poisoned")]
    LockPoisoned,
}

impl From<RendezvousDbError> for StoreError {
    fn from(err: RendezvousDbError) -> Self {
        match err {
            RendezvousDbError::Closed => StoreError::Closed,
            RendezvousDbError::Decode(e) => StoreError::Corrupt(e.to_string()),
            RendezvousDbError::DanglingIndex(seq) => {
                StoreError::Corrupt(format!("index points at missing record {}", seq))
            }
            other => StoreError::backend(other),
        }
    }
}

/// Session record store backed by redb.
pub struct RendezvousDb {
    db: RwLock<Option<Database>>,
}

impl RendezvousDb {
    /// Open or create the store described by `config`.
    ///
    /// File-backed stores get their parent directory created on demand.
    pub fn open(config: &StorageConfig) -> Result<Self, RendezvousDbError> {
        let db = match config {
            StorageConfig::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                debug!(path = %path.display(), "Opening rendezvous database");
                Database::builder().create(path)?
            }
            StorageConfig::InMemory => {
                debug!("Opening in-memory rendezvous database");
                Database::builder().create_with_backend(InMemoryBackend::new())?
            }
        };

        // Ensure tables exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RECORDS_TABLE)?;
            let _ = write_txn.open_table(BY_PEER_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: RwLock::new(Some(db)) })
    }

    /// Shorthand for `open(&StorageConfig::InMemory)`.
    pub fn open_in_memory() -> Result<Self, RendezvousDbError> {
        Self::open(&StorageConfig::InMemory)
    }

    fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> Result<T, RendezvousDbError>,
    ) -> Result<T, RendezvousDbError> {
        let guard = self.db.read().map_err(|_| RendezvousDbError::LockPoisoned)?;
        let db = guard.as_ref().ok_or(RendezvousDbError::Closed)?;
        f(db)
    }

    /// Index key: public key followed by the big-endian seq.
    fn index_key(public_key: &PubKey, seq: u64) -> [u8; 40] {
        let mut key = [0u8; 40];
        key[..32].copy_from_slice(public_key.as_ref());
        key[32..].copy_from_slice(&seq.to_be_bytes());
        key
    }

    fn decode(bytes: &[u8]) -> Result<SessionRecord, RendezvousDbError> {
        SessionRecord::from_borsh(bytes).map_err(RendezvousDbError::Decode)
    }

    /// Append `records` in a single write transaction.
    pub fn append(&self, records: &[SessionRecord]) -> Result<(), RendezvousDbError> {
        if records.is_empty() {
            return Ok(());
        }
        let encoded = records
            .iter()
            .map(|r| r.to_borsh().map(|bytes| (r.public_key(), bytes)))
            .collect::<Result<Vec<_>, _>>()?;

        self.with_db(|db| {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(RECORDS_TABLE)?;
                let mut index = write_txn.open_table(BY_PEER_TABLE)?;
                let mut seq = table.last()?.map(|(k, _)| k.value()).unwrap_or(0);
                for (public_key, bytes) in &encoded {
                    seq += 1;
                    table.insert(seq, bytes.as_slice())?;
                    index.insert(Self::index_key(public_key, seq).as_slice(), seq)?;
                }
            }
            write_txn.commit()?;
            Ok(())
        })
    }

    /// Every record for `public_key`, in insertion order.
    pub fn records_for(&self, public_key: &PubKey) -> Result<Vec<SessionRecord>, RendezvousDbError> {
        self.with_db(|db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(RECORDS_TABLE)?;
            let index = read_txn.open_table(BY_PEER_TABLE)?;

            let lo = Self::index_key(public_key, 0);
            let hi = Self::index_key(public_key, u64::MAX);

            let mut records = Vec::new();
            for entry in index.range(lo.as_slice()..=hi.as_slice())? {
                let (_, seq) = entry?;
                let seq = seq.value();
                let value = table
                    .get(seq)?
                    .ok_or(RendezvousDbError::DanglingIndex(seq))?;
                records.push(Self::decode(value.value())?);
            }
            Ok(records)
        })
    }

    /// A uniformly chosen stored record.
    pub fn random_record(&self) -> Result<Option<SessionRecord>, RendezvousDbError> {
        self.with_db(|db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(RECORDS_TABLE)?;
            let Some(max_seq) = table.last()?.map(|(k, _)| k.value()) else {
                return Ok(None);
            };
            let pick = rand::thread_rng().gen_range(1..=max_seq);
            let found = table.range(pick..)?.next().transpose()?;
            match found {
                Some((_, value)) => Ok(Some(Self::decode(value.value())?)),
                None => Ok(None),
            }
        })
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64, RendezvousDbError> {
        self.with_db(|db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(RECORDS_TABLE)?;
            Ok(table.len()?)
        })
    }

    /// Drop the database handle. Idempotent.
    pub fn shutdown(&self) -> Result<(), RendezvousDbError> {
        let mut guard = self.db.write().map_err(|_| RendezvousDbError::LockPoisoned)?;
        if guard.take().is_some() {
            debug!("Closed rendezvous database");
        }
        Ok(())
    }
}

impl RecordStore for RendezvousDb {
    fn put(&self, record: &SessionRecord) -> Result<(), StoreError> {
        Ok(self.append(std::slice::from_ref(record))?)
    }

    fn put_batch(&self, records: &[SessionRecord]) -> Result<(), StoreError> {
        Ok(self.append(records)?)
    }

    fn get(&self, identity: &PubKey) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self.records_for(identity)?)
    }

    fn random(&self) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.random_record()?)
    }

    fn len(&self) -> Result<u64, StoreError> {
        Ok(self.count()?)
    }

    fn close(&self) -> Result<(), StoreError> {
        Ok(self.shutdown()?)
    }
}
