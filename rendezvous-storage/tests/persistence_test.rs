use rendezvous_model::{PubKey, RecordStore, SessionRecord, StorageConfig};
use rendezvous_storage::{DataDir, RendezvousDb};
use std::net::SocketAddr;

fn record(key: u8, start: f64, stop: f64) -> SessionRecord {
    let addr: SocketAddr = "[2001:db8::1]:6421".parse().unwrap();
    SessionRecord::new(PubKey([key; 32]), addr, -1.0, start, stop).unwrap()
}

#[test]
fn test_records_survive_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = DataDir::new(tmp.path());
    let config = StorageConfig::File(data_dir.rendezvous_db());

    {
        let db = RendezvousDb::open(&config).unwrap();
        db.put(&record(1, 1.0, 2.0)).unwrap();
        db.put(&record(2, 2.0, 3.0)).unwrap();
        db.close().unwrap();
    }

    // Parent "sqlite" dir was created by open
    assert!(data_dir.rendezvous_db().exists());

    let db = RendezvousDb::open(&config).unwrap();
    db.put(&record(1, 5.0, 6.0)).unwrap();

    let retrieved = db.get(&PubKey([1; 32])).unwrap();
    let intervals: Vec<_> = retrieved.iter().map(|r| (r.start(), r.stop())).collect();
    assert_eq!(intervals, vec![(1.0, 2.0), (5.0, 6.0)]);
    assert_eq!(db.len().unwrap(), 3);
    assert_eq!(retrieved[0].address(), Some("[2001:db8::1]:6421".parse().unwrap()));
}

#[test]
fn test_in_memory_stores_are_independent() {
    let a = RendezvousDb::open(&StorageConfig::parse(":memory:")).unwrap();
    let b = RendezvousDb::open(&StorageConfig::InMemory).unwrap();
    a.put(&record(7, 1.0, 1.5)).unwrap();
    assert_eq!(a.len().unwrap(), 1);
    assert!(b.is_empty().unwrap());
}

#[test]
fn test_store_usable_through_trait_object() {
    let store: std::sync::Arc<dyn RecordStore> = std::sync::Arc::new(RendezvousDb::open_in_memory().unwrap());
    store.put_batch(&[record(3, 0.0, 10.0), record(3, 10.0, 20.0)]).unwrap();
    assert_eq!(store.get(&PubKey([3; 32])).unwrap().len(), 2);
}
