//! Story identifier strategies.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

pub trait IdGenerator: Send + Sync {
    /// Returns an id never handed out before by this generator.
    fn next_id(&self) -> String;
}

/// Decimal millisecond timestamps, bumped past the previous id when the clock
/// has not moved, so ids stay unique and strictly increasing in creation order.
#[derive(Default)]
pub struct TimestampIdGenerator {
    last: AtomicU64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues after `last`, typically the newest id already in the catalog.
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    fn next_after(&self, now: u64) -> u64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> String {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_after(now).to_string()
    }
}

/// Plain counter starting at 1. Deterministic, for tests.
#[derive(Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        (self.next.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_timestamp_ids_strictly_increase() {
        let ids = TimestampIdGenerator::new();
        let mut prev = 0u64;
        for _ in 0..1000 {
            let id: u64 = ids.next_id().parse().unwrap();
            assert!(id > prev);
            prev = id;
        }
    }

    #[test]
    fn test_stalled_clock_is_bumped() {
        let ids = TimestampIdGenerator::starting_after(5_000);
        assert_eq!(ids.next_after(4_000), 5_001);
        assert_eq!(ids.next_after(4_000), 5_002);
        assert_eq!(ids.next_after(9_000), 9_000);
    }

    #[test]
    fn test_timestamp_ids_unique_across_threads() {
        let ids = Arc::new(TimestampIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id(), "1");
        assert_eq!(ids.next_id(), "2");
    }
}
