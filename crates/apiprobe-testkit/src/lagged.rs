//! Store with delayed read visibility
//!
//! Writes land immediately, but lagged reads keep returning the value that
//! was visible before the last write until `lag` has passed. Primary reads
//! (`get`, `values`) always see the latest write.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry<V> {
    current: Option<V>,
    previous: Option<V>,
    changed_at: Instant,
}

/// Key-value store whose lagged reads trail its writes
#[derive(Debug, Clone)]
pub struct LaggedStore<K, V> {
    entries: BTreeMap<K, Entry<V>>,
    lag: Duration,
}

impl<K: Ord + Clone, V: Clone> LaggedStore<K, V> {
    pub fn new(lag: Duration) -> Self {
        Self {
            entries: BTreeMap::new(),
            lag,
        }
    }

    pub fn lag(&self) -> Duration {
        self.lag
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.write(key, Some(value));
    }

    /// Remove `key`, returning the latest value if there was one
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let existing = self.get(key).cloned();
        if existing.is_some() {
            self.write(key.clone(), None);
        }
        existing
    }

    /// Latest written value
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).and_then(|e| e.current.as_ref())
    }

    /// Value a reader sees now
    pub fn get_lagged(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.changed_at.elapsed() >= self.lag {
            entry.current.clone()
        } else {
            entry.previous.clone()
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Latest values in key order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().filter_map(|e| e.current.as_ref())
    }

    pub fn len(&self) -> usize {
        self.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&mut self, key: K, value: Option<V>) {
        let previous = self.get_lagged(&key);
        self.entries.insert(
            key,
            Entry {
                current: value,
                previous,
                changed_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_no_lag_reads_latest() {
        let mut store = LaggedStore::new(Duration::ZERO);
        store.insert(1, "a");
        assert_eq!(store.get_lagged(&1), Some("a"));

        store.remove(&1);
        assert_eq!(store.get_lagged(&1), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_lagged_read_trails_insert() {
        let mut store = LaggedStore::new(HOUR);
        store.insert(1, "a");

        assert_eq!(store.get(&1), Some(&"a"));
        assert_eq!(store.get_lagged(&1), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lagged_read_trails_remove() {
        let mut store = LaggedStore::new(Duration::ZERO);
        store.insert(1, "a");
        assert_eq!(store.remove(&1), Some("a"));

        // readers still inside the lag window see the removed value
        store.lag = HOUR;
        assert!(!store.contains(&1));
        assert_eq!(store.get_lagged(&1), Some("a"));
    }

    #[test]
    fn test_values_in_key_order() {
        let mut store = LaggedStore::new(HOUR);
        store.insert(3, "c");
        store.insert(1, "a");
        store.insert(2, "b");
        store.remove(&2);

        let values: Vec<_> = store.values().copied().collect();
        assert_eq!(values, ["a", "c"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store: LaggedStore<i32, &str> = LaggedStore::new(HOUR);
        assert_eq!(store.remove(&7), None);
        assert_eq!(store.get_lagged(&7), None);
    }
}
