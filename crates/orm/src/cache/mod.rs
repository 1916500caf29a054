//! Model cache - keyed store of previously materialized model instances
//!
//! The loader's contract with a cache is only `get`/`put`/`remove`; capacity
//! and replacement policy belong to the implementation. At most one live
//! instance exists per key inside a given cache.

use std::collections::HashMap;

use crate::adapter::ModelRef;
use crate::value::SqlValue;

/// Hashable key derived from an entity's caching column value(s)
///
/// SQL NULL never forms a key: a row whose caching column is NULL is treated
/// as an always-miss and is never stored. Real keys hash on the f64 bit
/// pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Integer(i64),
    Real(u64),
    Text(String),
    Blob(Vec<u8>),
    Composite(Vec<CacheKey>),
}

impl CacheKey {
    /// Derive a key from a single caching column value. `None` for NULL.
    pub fn from_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Null => None,
            SqlValue::Integer(i) => Some(CacheKey::Integer(*i)),
            SqlValue::Real(f) => Some(CacheKey::Real(f.to_bits())),
            SqlValue::Text(s) => Some(CacheKey::Text(s.clone())),
            SqlValue::Blob(b) => Some(CacheKey::Blob(b.clone())),
        }
    }

    /// Derive a composite key. Any NULL component voids the whole key.
    pub fn composite(values: &[SqlValue]) -> Option<Self> {
        values
            .iter()
            .map(CacheKey::from_value)
            .collect::<Option<Vec<_>>>()
            .map(CacheKey::Composite)
    }
}

/// Keyed store of materialized model instances
pub trait ModelCache<M> {
    /// Look up a previously materialized instance.
    fn get(&mut self, key: &CacheKey) -> Option<ModelRef<M>>;

    /// Insert or overwrite; evicts per policy when at capacity.
    fn put(&mut self, key: CacheKey, model: ModelRef<M>);

    /// Drop a single entry, returning it if present.
    fn remove(&mut self, key: &CacheKey) -> Option<ModelRef<M>>;

    /// Drop every entry.
    fn clear(&mut self);

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded HashMap-backed cache
#[derive(Debug, Default)]
pub struct MapModelCache<M> {
    entries: HashMap<CacheKey, ModelRef<M>>,
}

impl<M> MapModelCache<M> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<M> ModelCache<M> for MapModelCache<M> {
    fn get(&mut self, key: &CacheKey) -> Option<ModelRef<M>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: CacheKey, model: ModelRef<M>) {
        self.entries.insert(key, model);
    }

    fn remove(&mut self, key: &CacheKey) -> Option<ModelRef<M>> {
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Capacity-bounded cache with least-recently-used eviction
///
/// Recency is a monotonic tick bumped on every get and put; eviction scans
/// for the stalest entry. Caches here are small (hundreds of rows), so the
/// scan stays cheap.
#[derive(Debug)]
pub struct LruModelCache<M> {
    capacity: usize,
    tick: u64,
    entries: HashMap<CacheKey, (u64, ModelRef<M>)>,
}

impl<M> LruModelCache<M> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tick: 0,
            entries: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_stalest(&mut self) {
        let stalest = self
            .entries
            .iter()
            .min_by_key(|(_, (tick, _))| *tick)
            .map(|(key, _)| key.clone());
        if let Some(key) = stalest {
            self.entries.remove(&key);
        }
    }
}

impl<M> ModelCache<M> for LruModelCache<M> {
    fn get(&mut self, key: &CacheKey) -> Option<ModelRef<M>> {
        let tick = self.next_tick();
        self.entries.get_mut(key).map(|entry| {
            entry.0 = tick;
            entry.1.clone()
        })
    }

    fn put(&mut self, key: CacheKey, model: ModelRef<M>) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_stalest();
        }
        let tick = self.next_tick();
        self.entries.insert(key, (tick, model));
    }

    fn remove(&mut self, key: &CacheKey) -> Option<ModelRef<M>> {
        self.entries.remove(key).map(|(_, model)| model)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
