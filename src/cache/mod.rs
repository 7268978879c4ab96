//! Offline response caching.
//!
//! - [`ResponseCache`]: TTL + capacity bounded store of advice responses,
//!   persisted through a [`KeyValueStorage`](crate::storage::KeyValueStorage)
//!   so answers survive restarts and stay available when the advice backend
//!   is unreachable. See [`response`] module docs for the persisted layout
//!   and failure semantics.
//!
//! - [`Clock`]: time source used for entry timestamps. [`SystemClock`] in
//!   production, [`ManualClock`] wherever time has to be controlled.

pub mod clock;
pub mod response;

pub use clock::{Clock, ManualClock, SystemClock};
pub use response::{
    CacheConfig, CacheEntry, CacheStats, DEFAULT_STORAGE_KEY, ResponseCache, fingerprint,
    format_size,
};
