//! Read-through query cache collaborator.
//!
//! # Responsibility
//! - Define the `QueryCache` contract operations read and write through.
//! - Encode cached row lists as JSON payloads.
//! - Provide an in-process implementation for tests and single-node use.
//!
//! # Invariants
//! - "Not cached" and "cached empty list" are distinct: a lookup returns
//!   `CacheLookup::Miss` only when no payload exists.
//! - Cache failures surface to callers unchanged; no retry happens here.

use crate::model::person_type::PersonTypeRow;
use crate::query::QueryFingerprint;
use log::debug;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backing store could not serve the request.
    Unavailable(String),
    /// A stored payload could not be decoded as a row list.
    Corrupted { key: String, message: String },
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "query cache unavailable: {message}"),
            Self::Corrupted { key, message } => {
                write!(f, "cached payload for `{key}` is corrupted: {message}")
            }
        }
    }
}

impl Error for CacheError {}

/// Key/value store addressed by query fingerprints.
///
/// Implementations synchronize internally; operations share one instance
/// through `Arc<dyn QueryCache>`.
pub trait QueryCache: Send + Sync {
    /// Returns the stored payload, or `None` when nothing is stored.
    fn get(&self, key: &QueryFingerprint) -> CacheResult<Option<String>>;
    /// Stores `payload` under `key`, replacing any previous payload.
    fn set(&self, key: &QueryFingerprint, payload: String) -> CacheResult<()>;
    /// Drops every stored entry.
    fn flush(&self) -> CacheResult<()>;
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(Vec<PersonTypeRow>),
    Miss,
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Serializes a row list into a cache payload.
pub fn encode_rows(key: &QueryFingerprint, rows: &[PersonTypeRow]) -> CacheResult<String> {
    serde_json::to_string(rows).map_err(|err| CacheError::Corrupted {
        key: key.to_string(),
        message: err.to_string(),
    })
}

/// Deserializes a cache payload into a row list.
pub fn decode_rows(key: &QueryFingerprint, payload: &str) -> CacheResult<Vec<PersonTypeRow>> {
    serde_json::from_str(payload).map_err(|err| CacheError::Corrupted {
        key: key.to_string(),
        message: err.to_string(),
    })
}

/// Reads `key` from `cache` and decodes it into a lookup result.
pub fn lookup_rows(cache: &dyn QueryCache, key: &QueryFingerprint) -> CacheResult<CacheLookup> {
    match cache.get(key)? {
        Some(payload) => Ok(CacheLookup::Hit(decode_rows(key, &payload)?)),
        None => Ok(CacheLookup::Miss),
    }
}

/// Encodes `rows` and writes them to `cache` under `key`.
pub fn store_rows(
    cache: &dyn QueryCache,
    key: &QueryFingerprint,
    rows: &[PersonTypeRow],
) -> CacheResult<()> {
    let payload = encode_rows(key, rows)?;
    cache.set(key, payload)
}

/// Counters describing in-memory cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub flushes: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryFingerprint, String>,
    stats: CacheStats,
}

/// Process-local `QueryCache` without eviction.
#[derive(Debug, Default)]
pub struct InMemoryQueryCache {
    state: Mutex<CacheState>,
}

impl InMemoryQueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the usage counters.
    pub fn stats(&self) -> CacheStats {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stats
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, CacheState>> {
        self.state
            .lock()
            .map_err(|_| CacheError::Unavailable("in-memory cache lock poisoned".to_string()))
    }
}

impl QueryCache for InMemoryQueryCache {
    fn get(&self, key: &QueryFingerprint) -> CacheResult<Option<String>> {
        let mut state = self.lock()?;
        let payload = state.entries.get(key).cloned();
        if payload.is_some() {
            state.stats.hits += 1;
        } else {
            state.stats.misses += 1;
        }
        Ok(payload)
    }

    fn set(&self, key: &QueryFingerprint, payload: String) -> CacheResult<()> {
        let mut state = self.lock()?;
        state.entries.insert(key.clone(), payload);
        state.stats.writes += 1;
        Ok(())
    }

    fn flush(&self) -> CacheResult<()> {
        let mut state = self.lock()?;
        let dropped = state.entries.len();
        state.entries.clear();
        state.stats.flushes += 1;
        debug!("event=cache_flush module=cache status=ok dropped={dropped}");
        Ok(())
    }
}
