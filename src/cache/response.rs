//! Persistent offline cache for advice responses.
//!
//! [`ResponseCache`] remembers the advice generated for a query so the same
//! question can be answered again without the backend, including while the
//! device is offline.
//!
//! # Keys
//!
//! Entries are keyed on a [`fingerprint`] of the query text and language tag.
//! The query is trimmed, lower-cased and has internal whitespace collapsed,
//! so `"  Wheat  PRICE "` and `"wheat price"` asked in the same language hit
//! the same entry, while the same text in Hindi and in English does not.
//!
//! # Persisted layout
//!
//! The whole cache is one JSON object (fingerprint → [`CacheEntry`]) stored
//! under a single storage key ([`DEFAULT_STORAGE_KEY`] unless configured).
//! Timestamps serialize as RFC 3339 strings.
//!
//! # Failure semantics
//!
//! The cache is best-effort and never fails its caller. Storage read errors
//! behave like an empty cache for lookups and skip any write that would have
//! been based on that read, write errors are dropped, and a record that no
//! longer parses is treated as empty and removed. Every such failure is logged
//! at `warn` and counted in [`STORAGE_ERRORS_TOTAL`](crate::telemetry::STORAGE_ERRORS_TOTAL).
//!
//! # Expiry
//!
//! [`get`](ResponseCache::get) treats an expired entry as a miss but leaves it
//! in place. Expired entries are removed by
//! [`cleanup_cache`](ResponseCache::cleanup_cache), or by capacity eviction
//! which always drops the oldest `created_at` first.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use crate::{Result, SakhaError};
use crate::storage::KeyValueStorage;
use crate::telemetry;
use crate::types::AdviceResponse;

/// Storage key the cache record lives under by default.
pub const DEFAULT_STORAGE_KEY: &str = "krishi_sakha_offline_cache";

/// Separator between normalized query text and language tag in a fingerprint.
const FINGERPRINT_SEPARATOR: &str = "::";

/// Configuration for the offline response cache.
///
/// ```rust
/// # use krishi_sakha::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(12 * 3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for cached entries. Default: 24 hours.
    pub ttl: Duration,
    /// Maximum number of cached entries, `None` for unbounded. Default: 100.
    pub max_entries: Option<usize>,
    /// Storage key holding the serialized cache.
    pub storage_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 3600),
            max_entries: Some(100),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the maximum number of cached entries (clamped to at least 1).
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = Some(n.max(1));
        self
    }

    /// Remove the entry count limit.
    pub fn unbounded(mut self) -> Self {
        self.max_entries = None;
        self
    }

    /// Store the cache under a different storage key.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

/// A single cached advice response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Fingerprint of the query and language (see [`fingerprint`]).
    pub key: String,
    pub response: AdviceResponse,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is stale at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Snapshot of the cache contents.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Number of stored entries, expired ones included.
    pub total_responses: usize,
    /// Serialized size of the stored record in bytes.
    pub size_bytes: usize,
    /// `size_bytes` formatted for display (e.g. `"1.4 KB"`).
    pub cache_size: String,
    /// Newest `created_at` among entries; `None` when empty.
    pub last_updated: Option<DateTime<Utc>>,
}

type Store = BTreeMap<String, CacheEntry>;

/// Offline cache of advice responses.
///
/// Cheap to share: all state lives in the injected storage, so the cache
/// itself only holds handles. Each operation is a single read-modify-write
/// against the storage record; concurrent writers to the same key resolve
/// as last write wins.
pub struct ResponseCache {
    storage: Arc<dyn KeyValueStorage>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache over `storage` using the system clock.
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: CacheConfig) -> Self {
        Self {
            storage,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Store `response` for `(query, language)`, replacing any previous entry.
    ///
    /// Evicts the oldest entries when the store is over capacity. Never
    /// fails; a storage error leaves the cache as it was. When the stored
    /// record cannot be read the write is skipped, so one failed read never
    /// replaces the persisted entries.
    pub fn put(&self, query: &str, language: &str, response: AdviceResponse) {
        let now = self.clock.now();
        let key = fingerprint(query, language);
        let ttl = TimeDelta::from_std(self.config.ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let Ok(mut store) = self.load() else {
            debug!(key = %key, "offline cache unreadable, not caching response");
            return;
        };
        store.insert(
            key.clone(),
            CacheEntry {
                key: key.clone(),
                response,
                created_at: now,
                expires_at,
            },
        );

        if let Some(max) = self.config.max_entries {
            evict_oldest(&mut store, max.max(1), &key);
        }

        debug!(key = %key, entries = store.len(), "cached advice response");
        self.save(&store);
    }

    /// Look up the response for `(query, language)`.
    ///
    /// Returns `None` when absent or expired. Expired entries stay in
    /// storage until [`cleanup_cache`](Self::cleanup_cache).
    pub fn get(&self, query: &str, language: &str) -> Option<AdviceResponse> {
        let key = fingerprint(query, language);
        let now = self.clock.now();
        let mut store = self.load().unwrap_or_default();

        match store.remove(&key) {
            Some(entry) if !entry.is_expired(now) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                debug!(key = %key, "offline cache hit");
                Some(entry.response)
            }
            Some(_) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                debug!(key = %key, "offline cache entry expired");
                None
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Remove every entry with `expires_at <= now`.
    ///
    /// Returns the number of entries removed. Idempotent.
    pub fn cleanup_cache(&self) -> usize {
        let now = self.clock.now();
        let Ok(mut store) = self.load() else {
            return 0;
        };
        let before = store.len();
        store.retain(|_, entry| !entry.is_expired(now));
        let removed = before - store.len();

        if removed > 0 {
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "reason" => "expired")
                .increment(removed as u64);
            info!(removed, remaining = store.len(), "removed expired cache entries");
            self.save(&store);
        }
        removed
    }

    /// Remove every entry.
    pub fn clear_cache(&self) {
        if let Err(e) = self.storage.remove_item(&self.config.storage_key) {
            metrics::counter!(telemetry::STORAGE_ERRORS_TOTAL, "operation" => "remove")
                .increment(1);
            warn!(error = %e, "failed to clear offline cache");
        } else {
            info!("offline cache cleared");
        }
    }

    /// Entry count, stored size and newest insertion time.
    pub fn cache_stats(&self) -> CacheStats {
        let (store, size_bytes) = match self.read_record() {
            Ok(Some(raw)) => match parse_record(&raw) {
                Some(store) => (store, raw.len()),
                None => (Store::new(), 0),
            },
            Ok(None) | Err(_) => (Store::new(), 0),
        };

        CacheStats {
            total_responses: store.len(),
            size_bytes,
            cache_size: format_size(size_bytes),
            last_updated: store.values().map(|e| e.created_at).max(),
        }
    }

    /// Every stored entry, expired ones included, in key order.
    pub fn entries(&self) -> Vec<CacheEntry> {
        self.load().unwrap_or_default().into_values().collect()
    }

    // -- private helpers ---------------------------------------------------

    /// Raw stored record; `Err` when storage could not be read or holds
    /// corrupt data.
    fn read_record(&self) -> Result<Option<String>> {
        self.storage
            .get_item(&self.config.storage_key)
            .inspect_err(|e| {
                if !matches!(e, SakhaError::CorruptStorage(_)) {
                    metrics::counter!(telemetry::STORAGE_ERRORS_TOTAL, "operation" => "read")
                        .increment(1);
                    warn!(error = %e, "failed to read offline cache");
                }
            })
    }

    /// Current entries. An absent or corrupt record is an empty store; a
    /// read failure is an error so callers never write over data they could
    /// not see.
    fn load(&self) -> Result<Store> {
        let raw = match self.read_record() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Store::new()),
            Err(SakhaError::CorruptStorage(reason)) => {
                warn!(%reason, "offline cache storage is corrupt, discarding it");
                self.discard_record();
                return Ok(Store::new());
            }
            Err(e) => return Err(e),
        };
        match parse_record(&raw) {
            Some(store) => Ok(store),
            None => {
                warn!("offline cache record is corrupt, discarding it");
                self.discard_record();
                Ok(Store::new())
            }
        }
    }

    fn discard_record(&self) {
        if let Err(e) = self.storage.remove_item(&self.config.storage_key) {
            metrics::counter!(telemetry::STORAGE_ERRORS_TOTAL, "operation" => "remove")
                .increment(1);
            warn!(error = %e, "failed to remove corrupt offline cache record");
        }
    }

    fn save(&self, store: &Store) {
        let data = match serde_json::to_string(store) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "failed to serialize offline cache");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(&self.config.storage_key, &data) {
            metrics::counter!(telemetry::STORAGE_ERRORS_TOTAL, "operation" => "write")
                .increment(1);
            warn!(error = %e, "failed to persist offline cache");
        }
    }
}

/// Deterministic cache key for a query asked in a language.
///
/// ```rust
/// # use krishi_sakha::cache::fingerprint;
/// assert_eq!(fingerprint("  Wheat\t PRICE ", "HI"), "wheat price::hi");
/// ```
pub fn fingerprint(query: &str, language: &str) -> String {
    let normalized = query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    format!(
        "{normalized}{FINGERPRINT_SEPARATOR}{}",
        language.trim().to_lowercase()
    )
}

/// Human-readable byte count: `"512 B"`, `"1.4 KB"`, `"2.0 MB"`.
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}

fn parse_record(raw: &str) -> Option<Store> {
    serde_json::from_str(raw).ok()
}

/// Drop oldest entries until at most `max` remain, never dropping `keep`.
fn evict_oldest(store: &mut Store, max: usize, keep: &str) {
    while store.len() > max {
        let oldest = store
            .iter()
            .filter(|(k, _)| k.as_str() != keep)
            .min_by_key(|(_, e)| e.created_at)
            .map(|(k, _)| k.clone());
        let Some(oldest) = oldest else {
            break;
        };
        debug!(key = %oldest, "evicting oldest offline cache entry");
        metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "reason" => "capacity").increment(1);
        store.remove(&oldest);
    }
}
