//! Shared aggregation state read by scrapes and written by the update loop

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;

use crate::alerts::LabelKey;

/// Alert counts from exactly one fetch cycle
pub type Snapshot = HashMap<LabelKey, u64>;

/// Holds the current snapshot and the cumulative fetch error count.
///
/// The snapshot sits behind one `RwLock<Arc<_>>`: writers swap the whole `Arc`,
/// readers clone it, so a reader sees either the old or the new cycle in full.
/// The error counter is a separate atomic and never touches the snapshot.
#[derive(Debug, Default)]
pub struct MetricStore {
    current: RwLock<Arc<Snapshot>>,
    scrape_errors: AtomicU64,
    /// Unix millis of the last successful install, 0 if none yet
    last_success_ms: AtomicI64,
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `snapshot` as current, discarding the previous one entirely
    pub fn replace_snapshot(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        *self.current.write() = snapshot;
        self.last_success_ms
            .store(Utc::now().timestamp_millis(), Ordering::SeqCst);
    }

    /// Consistent view of the current snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    pub fn increment_scrape_errors(&self) {
        self.scrape_errors.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_scrape_errors(&self) -> u64 {
        self.scrape_errors.load(Ordering::SeqCst)
    }

    /// Time of the last successful `replace_snapshot`
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        match self.last_success_ms.load(Ordering::SeqCst) {
            0 => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_of(entries: &[(&str, &str, &str, u64)]) -> Snapshot {
        entries
            .iter()
            .map(|(name, state, instance, count)| (LabelKey::new(*name, *state, *instance), *count))
            .collect()
    }

    #[test]
    fn test_starts_empty() {
        let store = MetricStore::new();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.current_scrape_errors(), 0);
        assert!(store.last_success().is_none());
    }

    #[test]
    fn test_replace_discards_old_keys() {
        let store = MetricStore::new();
        store.replace_snapshot(snapshot_of(&[
            ("A", "firing", "n1", 3),
            ("B", "firing", "n2", 1),
        ]));

        let next = snapshot_of(&[("C", "active", "n3", 2)]);
        store.replace_snapshot(next.clone());

        assert_eq!(*store.snapshot(), next);
        assert!(store.last_success().is_some());
    }

    #[test]
    fn test_reader_keeps_its_snapshot() {
        let store = MetricStore::new();
        store.replace_snapshot(snapshot_of(&[("A", "firing", "n1", 1)]));

        let held = store.snapshot();
        store.replace_snapshot(Snapshot::new());

        assert_eq!(held.len(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_errors_do_not_touch_snapshot() {
        let store = MetricStore::new();
        let snap = snapshot_of(&[("A", "firing", "n1", 4)]);
        store.replace_snapshot(snap.clone());

        store.increment_scrape_errors();
        store.increment_scrape_errors();

        assert_eq!(store.current_scrape_errors(), 2);
        assert_eq!(*store.snapshot(), snap);
    }

    #[test]
    fn test_concurrent_readers_never_see_mixed_cycles() {
        // Every snapshot written has all keys sharing one generation number
        // in the instance label, so a torn read would show two generations.
        let store = Arc::new(MetricStore::new());

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for generation in 0..500u64 {
                    let snap: Snapshot = (0..16)
                        .map(|i| {
                            (
                                LabelKey::new(format!("alert{}", i), "firing", generation.to_string()),
                                generation,
                            )
                        })
                        .collect();
                    store.replace_snapshot(snap);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let snap = store.snapshot();
                        let mut generations: Vec<&str> =
                            snap.keys().map(|k| k.instance.as_str()).collect();
                        generations.sort_unstable();
                        generations.dedup();
                        assert!(generations.len() <= 1);
                        assert!(snap.is_empty() || snap.len() == 16);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(store.snapshot().len(), 16);
    }
}
