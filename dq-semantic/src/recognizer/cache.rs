//! Bounded least-frequently-used cache for classified values.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Cache entry with its access frequency.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    frequency: u64,
    /// Insertion tick; older entries are evicted first among equals
    tick: u64,
}

/// Caches classification results to avoid redundant lookups.
///
/// When an insert finds the cache full, the `ceil(capacity * eviction_factor)`
/// least frequently read entries are evicted (at least one). Ties go to the
/// oldest entry.
#[derive(Debug)]
pub struct LfuCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    capacity: usize,
    eviction_factor: f32,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the default eviction factor of 1%.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(capacity, 10, 0.01)
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(capacity: usize, initial_capacity: usize, eviction_factor: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(initial_capacity.min(capacity)),
            capacity,
            eviction_factor,
            tick: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Gets a value and counts the access.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get_mut(key) {
            Some(entry) => {
                self.hits += 1;
                entry.frequency += 1;
                Some(&entry.value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Returns true if the key is cached, without counting an access.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Access frequency of a cached key.
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|entry| entry.frequency)
    }

    /// Inserts a value. Returns the number of entries evicted to make room.
    ///
    /// Replacing an existing key keeps its access frequency.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            return 0;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_least_used()
        } else {
            0
        };

        self.tick += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                frequency: 0,
                tick: self.tick,
            },
        );
        evicted
    }

    /// Clears entries and statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tick = 0;
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    /// Gets the current size of the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn eviction_batch(&self) -> usize {
        ((self.capacity as f32 * self.eviction_factor).ceil() as usize).max(1)
    }

    fn evict_least_used(&mut self) -> usize {
        let mut ranked: Vec<(u64, u64, K)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.frequency, entry.tick, key.clone()))
            .collect();
        ranked.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let batch = self.eviction_batch().min(ranked.len());
        for (_, _, key) in ranked.into_iter().take(batch) {
            self.entries.remove(&key);
        }
        self.evictions += batch as u64;
        batch
    }

    /// Gets cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}

/// Statistics about the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached entries
    pub entries: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Reads that found an entry
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of reads served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let reads = self.hits + self.misses;
        if reads == 0 {
            0.0
        } else {
            self.hits as f64 / reads as f64
        }
    }
}
