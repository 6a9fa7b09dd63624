//! Clock abstraction for testable time
//!
//! Provides a trait for getting the current wall-clock time, with implementations
//! for real system time and mock time for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for getting the current wall clock time in seconds
pub trait Clock: Send + Sync {
    /// Get the current time in (fractional) seconds since Unix epoch
    fn now_secs(&self) -> f64;
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        // A clock set before the epoch reads as 0.0
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// Mock clock for testing - returns whatever time it was last set to.
///
/// Settable through a shared reference so a test can move time while the
/// clock is owned by the component under test.
#[derive(Debug)]
pub struct MockClock {
    bits: AtomicU64,
}

impl MockClock {
    pub fn new(secs: f64) -> Self {
        Self { bits: AtomicU64::new(secs.to_bits()) }
    }

    /// Jump to an absolute time.
    pub fn set(&self, secs: f64) {
        self.bits.store(secs.to_bits(), Ordering::SeqCst);
    }

    /// Move the clock by `delta` seconds (negative goes back).
    pub fn advance(&self, delta: f64) {
        self.set(self.now_secs() + delta);
    }
}

impl Clock for MockClock {
    fn now_secs(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_secs(&self) -> f64 {
        (**self).now_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_reasonable_time() {
        let clock = SystemClock;
        // Should be after 2025-01-01
        assert!(clock.now_secs() > 1_735_689_600.0);
    }

    #[test]
    fn test_mock_clock_returns_fixed_time() {
        let clock = MockClock::new(12345.5);
        assert_eq!(clock.now_secs(), 12345.5);
    }

    #[test]
    fn test_mock_clock_moves() {
        let clock = MockClock::new(100.0);
        clock.advance(1.0);
        assert_eq!(clock.now_secs(), 101.0);
        clock.advance(-2.5);
        assert_eq!(clock.now_secs(), 98.5);
        clock.set(7.0);
        assert_eq!(clock.now_secs(), 7.0);
    }
}
