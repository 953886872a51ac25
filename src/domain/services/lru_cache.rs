//! Bounded LRU cache
//!
//! A map plus a recency index keyed by a monotonically increasing access
//! stamp. Every insert or read re-stamps the key; inserting a new key at
//! capacity evicts the key with the smallest stamp first. Lookups are a hash
//! probe plus a logarithmic re-stamp, never a scan.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::time::Instant;

/// Rejected cache capacity
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CacheConfigError {
    #[error("cache capacity must be a positive integer, got {value}")]
    InvalidCapacity { value: String },
}

/// A cached value and when it was last touched
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub last_access: Instant,
}

#[derive(Debug, Clone)]
struct Slot<V> {
    entry: CacheEntry<V>,
    stamp: u64,
}

#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, Slot<V>>,
    /// Access stamp to key; first is least recently used
    order: BTreeMap<u64, K>,
    next_stamp: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Result<Self, CacheConfigError> {
        if capacity == 0 {
            return Err(CacheConfigError::InvalidCapacity {
                value: capacity.to_string(),
            });
        }
        Ok(Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: BTreeMap::new(),
            next_stamp: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up a value, marking it most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let stamp = self.take_stamp();
        let slot = self.entries.get_mut(key)?;
        self.order.remove(&slot.stamp);
        self.order.insert(stamp, key.clone());
        slot.stamp = stamp;
        slot.entry.last_access = Instant::now();
        Some(&slot.entry.value)
    }

    /// Insert or replace a value; returns the evicted key, if any
    ///
    /// Replacing an existing key never evicts.
    pub fn insert(&mut self, key: K, value: V) -> Option<K> {
        let stamp = self.take_stamp();
        let slot = Slot {
            entry: CacheEntry {
                value,
                last_access: Instant::now(),
            },
            stamp,
        };

        if let Some(previous) = self.entries.insert(key.clone(), slot) {
            self.order.remove(&previous.stamp);
            self.order.insert(stamp, key);
            return None;
        }

        let evicted = if self.entries.len() > self.capacity {
            self.evict_lru()
        } else {
            None
        };
        self.order.insert(stamp, key);
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Keys from least to most recently used
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.order.values()
    }

    fn take_stamp(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }

    /// Drop the oldest key already in the order index
    fn evict_lru(&mut self) -> Option<K> {
        let (_, oldest) = self.order.pop_first()?;
        self.entries.remove(&oldest);
        Some(oldest)
    }
}
