//! WriteQueue - FIFO of session records awaiting persistence

use rendezvous_model::SessionRecord;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct WriteQueue {
    records: VecDeque<SessionRecord>,
}

impl WriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, record: SessionRecord) {
        self.records.push_back(record);
    }

    /// Take everything queued, leaving the queue empty.
    pub fn drain_all(&mut self) -> Vec<SessionRecord> {
        self.records.drain(..).collect()
    }

    /// Copy of everything queued, oldest first. The queue is left untouched
    /// so records stay owned here until the store has committed them.
    pub fn pending(&self) -> Vec<SessionRecord> {
        self.records.iter().cloned().collect()
    }

    /// Drop the oldest `count` records once they are durable.
    pub fn release(&mut self, count: usize) {
        let count = count.min(self.records.len());
        self.records.drain(..count);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendezvous_model::PubKey;

    fn record(start: f64) -> SessionRecord {
        SessionRecord::new(PubKey([1; 32]), "127.0.0.1:1".parse().unwrap(), -1.0, start, start + 1.0).unwrap()
    }

    #[test]
    fn test_fifo_drain() {
        let mut queue = WriteQueue::new();
        queue.enqueue(record(1.0));
        queue.enqueue(record(2.0));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain_all();
        assert_eq!(drained.iter().map(|r| r.start()).collect::<Vec<_>>(), vec![1.0, 2.0]);
        assert!(queue.is_empty());
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_pending_then_release_keeps_later_records() {
        let mut queue = WriteQueue::new();
        queue.enqueue(record(1.0));
        let snapshot = queue.pending();
        assert_eq!(queue.len(), 1);

        // Arrives while the snapshot is being persisted
        queue.enqueue(record(2.0));
        queue.release(snapshot.len());

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pending()[0].start(), 2.0);
    }

    #[test]
    fn test_release_more_than_queued() {
        let mut queue = WriteQueue::new();
        queue.enqueue(record(1.0));
        queue.release(5);
        assert!(queue.is_empty());
    }
}
