//! Telemetry metric name constants.
//!
//! Centralised metric names for the cache, the demo matcher and the advisor.
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `krishi_sakha_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation`: storage operation: "read", "write" or "remove"
//! - `reason`: eviction reason: "expired" or "capacity"
//! - `outcome`: demo lookup outcome: "match" or "miss"
//! - `source`: where an answer came from: "cache", "live" or "demo"

/// Total offline cache hits.
pub const CACHE_HITS_TOTAL: &str = "krishi_sakha_cache_hits_total";

/// Total offline cache misses (absent or expired entries).
pub const CACHE_MISSES_TOTAL: &str = "krishi_sakha_cache_misses_total";

/// Total entries removed by cleanup or capacity eviction.
///
/// Labels: `reason` ("expired" | "capacity").
pub const CACHE_EVICTIONS_TOTAL: &str = "krishi_sakha_cache_evictions_total";

/// Total storage failures swallowed by the cache.
///
/// Labels: `operation` ("read" | "write" | "remove").
pub const STORAGE_ERRORS_TOTAL: &str = "krishi_sakha_storage_errors_total";

/// Total demo-mode lookups.
///
/// Labels: `outcome` ("match" | "miss").
pub const DEMO_LOOKUPS_TOTAL: &str = "krishi_sakha_demo_lookups_total";

/// Total answers served by the advisor.
///
/// Labels: `source` ("cache" | "live" | "demo").
pub const ANSWERS_TOTAL: &str = "krishi_sakha_answers_total";

/// Live advice request duration in seconds.
pub const BACKEND_DURATION_SECONDS: &str = "krishi_sakha_backend_duration_seconds";
