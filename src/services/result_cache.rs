//! Bounded LRU cache for processing results.
//!
//! Entries are keyed by a canonical hash of the request parameters and
//! evicted least-recently-accessed first whenever the estimated total size
//! or the entry count exceeds its bound.

use retro_quant::{Color, PixelBuffer, ScaleEstimate};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use utoipa::ToSchema;

/// Estimated bytes per palette entry
const PALETTE_ENTRY_SIZE: usize = 16;

/// Size and count bounds of one cache instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum estimated total payload size in bytes
    pub max_size: usize,
    /// Maximum number of entries
    pub max_entries: usize,
}

impl CacheConfig {
    pub const fn new(max_size: usize, max_entries: usize) -> Self {
        Self {
            max_size,
            max_entries,
        }
    }

    /// Bounds for processed-image results (100 MiB, 50 entries)
    pub const fn image_processing() -> Self {
        Self::new(100 * 1024 * 1024, 50)
    }

    /// Bounds for small results such as palettes and scale estimates
    /// (20 MiB, 200 entries)
    pub const fn general() -> Self {
        Self::new(20 * 1024 * 1024, 200)
    }
}

/// Estimated in-memory size of a cached payload.
///
/// Estimates never fail: a payload whose size cannot be determined weighs 0.
pub trait CacheWeight {
    fn weight(&self) -> usize;
}

impl CacheWeight for PixelBuffer {
    fn weight(&self) -> usize {
        self.width() as usize * self.height() as usize * 4
    }
}

impl CacheWeight for Vec<Color> {
    fn weight(&self) -> usize {
        self.len() * PALETTE_ENTRY_SIZE
    }
}

impl CacheWeight for String {
    fn weight(&self) -> usize {
        self.len() * 2
    }
}

impl CacheWeight for Value {
    fn weight(&self) -> usize {
        serde_json::to_string(self).map_or(0, |s| s.len() * 2)
    }
}

impl CacheWeight for Option<ScaleEstimate> {
    fn weight(&self) -> usize {
        std::mem::size_of::<Option<ScaleEstimate>>()
    }
}

impl<T: CacheWeight> CacheWeight for Arc<T> {
    fn weight(&self) -> usize {
        self.as_ref().weight()
    }
}

/// Canonical cache key.
///
/// Built from any serializable parameter set. Object keys are sorted
/// recursively before hashing, so field order never affects the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hash the canonical JSON form of `params`.
    ///
    /// Fails only if `params` cannot be represented as JSON (for example a
    /// map with non-string keys).
    pub fn from_params<P: Serialize + ?Sized>(params: &P) -> Result<Self, serde_json::Error> {
        let value = canonicalize(serde_json::to_value(params)?);
        let canonical = serde_json::to_string(&value)?;

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let result = hasher.finalize();
        // First 16 bytes, 32 hex characters
        Ok(Self(hex::encode(&result[..16])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rebuild every object with its keys in lexicographic order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct CacheStats {
    /// Number of entries currently held
    pub entries: usize,
    /// Sum of estimated entry sizes in bytes
    pub total_size: usize,
    /// hits / (hits + misses), 0 before the first lookup
    pub hit_rate: f64,
    /// Configured size bound in bytes
    pub max_size: usize,
    /// Configured entry bound
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

struct CacheEntry<T> {
    value: T,
    size: usize,
    access_count: u64,
    /// Logical clock value of the last get or set
    last_access: u64,
}

struct CacheInner<T> {
    entries: HashMap<CacheKey, CacheEntry<T>>,
    total_size: usize,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl<T> CacheInner<T> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Remove the least recently accessed entry.
    fn evict_one(&mut self, name: &str) -> bool {
        let Some(oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone())
        else {
            return false;
        };
        if let Some(entry) = self.entries.remove(&oldest) {
            self.total_size -= entry.size;
            tracing::debug!(
                cache = name,
                key = %oldest,
                size = entry.size,
                accesses = entry.access_count,
                remaining = self.entries.len(),
                "Result cache: evicted least recently used entry"
            );
        }
        true
    }
}

/// Thread-safe bounded LRU cache.
///
/// All operations take an internal mutex, so one instance can be shared via
/// `Arc` between request handlers and blocking workers. Values are cloned
/// out on `get`; wrap large payloads in `Arc`.
pub struct ResultCache<T> {
    name: &'static str,
    config: CacheConfig,
    inner: Mutex<CacheInner<T>>,
}

impl<T: Clone + CacheWeight> ResultCache<T> {
    pub fn new(name: &'static str, config: CacheConfig) -> Self {
        Self {
            name,
            config,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                total_size: 0,
                clock: 0,
                hits: 0,
                misses: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner<T>> {
        // Every mutation leaves the state consistent, so a poisoned lock is
        // still usable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Look up `key`, refreshing its recency on a hit.
    pub fn get(&self, key: &CacheKey) -> Option<T> {
        let mut inner = self.lock();
        let now = inner.tick();
        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.access_count += 1;
                entry.last_access = now;
                let value = entry.value.clone();
                inner.hits += 1;
                tracing::debug!(cache = self.name, %key, "Result cache hit");
                Some(value)
            }
            None => {
                inner.misses += 1;
                tracing::debug!(cache = self.name, %key, "Result cache miss");
                None
            }
        }
    }

    /// Store `value` under `key`, replacing any previous entry, then evict
    /// until both bounds hold.
    pub fn set(&self, key: CacheKey, value: T) {
        let size = value.weight();
        let mut inner = self.lock();
        let now = inner.tick();

        if let Some(previous) = inner.entries.remove(&key) {
            inner.total_size -= previous.size;
        }
        inner.total_size += size;
        tracing::debug!(cache = self.name, %key, size, "Result cache: stored entry");
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                size,
                access_count: 0,
                last_access: now,
            },
        );

        while inner.total_size > self.config.max_size
            || inner.entries.len() > self.config.max_entries
        {
            if !inner.evict_one(self.name) {
                break;
            }
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.total_size = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let lookups = inner.hits + inner.misses;
        CacheStats {
            entries: inner.entries.len(),
            total_size: inner.total_size,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                inner.hits as f64 / lookups as f64
            },
            max_size: self.config.max_size,
            max_entries: self.config.max_entries,
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}
