//! Krishi Sakha - offline answers for a farm advisory assistant
//!
//! This crate holds the parts of the Krishi Sakha assistant that keep it
//! useful without a network: a persistent [`ResponseCache`] of generated
//! advice and a [`DemoMatcher`] that answers from a fixed set of canned
//! questions, including questions asked in another language or script.
//! [`OfflineAdvisor`] ties both to a live [`AdviceBackend`].
//!
//! # Cache Example
//!
//! ```rust
//! use std::sync::Arc;
//! use krishi_sakha::{AdviceResponse, CacheConfig, MemoryStorage, ResponseCache};
//!
//! let cache = ResponseCache::new(Arc::new(MemoryStorage::new()), CacheConfig::default());
//! cache.put(
//!     "When should I sow wheat?",
//!     "en",
//!     AdviceResponse::new("Sow between 1 and 20 November.", "Timely sowing avoids heat at grain fill."),
//! );
//!
//! // Case and spacing do not matter; language does.
//! assert!(cache.get("when should i   sow wheat?", "en").is_some());
//! assert!(cache.get("When should I sow wheat?", "hi").is_none());
//! ```
//!
//! # Demo Example
//!
//! ```rust
//! use krishi_sakha::DemoMatcher;
//!
//! let matcher = DemoMatcher::default();
//! let demo = matcher
//!     .get_demo_response("धान में कौन सा उर्वरक डालें?")
//!     .expect("paddy fertilizer question should match");
//! assert!(demo.answer.contains("DAP"));
//! ```
//!
//! # Advisor Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use krishi_sakha::{HttpAdviceBackend, OfflineAdvisor};
//!
//! #[tokio::main]
//! async fn main() -> krishi_sakha::Result<()> {
//!     let advisor = OfflineAdvisor::builder()
//!         .backend(Arc::new(HttpAdviceBackend::new("https://advice.example.org")?))
//!         .build()?;
//!
//!     let advice = advisor.ask("Onion price in Nashik today?", "en").await?;
//!     println!("{} ({})", advice.response.advice, advice.source.as_str());
//!     Ok(())
//! }
//! ```

pub mod advisor;
pub mod backend;
pub mod cache;
#[cfg(feature = "cli")]
pub mod config;
pub mod demo;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use advisor::{OfflineAdvisor, OfflineAdvisorBuilder};
pub use backend::{AdviceBackend, HttpAdviceBackend};
pub use cache::{CacheConfig, CacheEntry, CacheStats, ResponseCache};
pub use demo::{DemoMatcher, MatcherConfig, TopicTable};
pub use error::{Result, SakhaError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, git_dirty, version_string};

// Re-export all types
pub use types::{Advice, AdviceResponse, AdviceSource, DemoQaEntry, DemoResponse, MatchResult};
