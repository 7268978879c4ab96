//! Query answering: offline cache, live backend, demo fallback.
//!
//! [`OfflineAdvisor`] is the flow the chat screen runs for every question:
//!
//! 1. A cached answer for the same query and language is returned directly.
//! 2. In demo mode, a matching canned answer is returned.
//! 3. Otherwise the advice backend is called (bounded by a timeout) and a
//!    successful answer is written to the cache.
//! 4. If the backend is missing or fails transiently, a matching canned
//!    answer is used when demo fallback is enabled.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::backend::{AdviceBackend, DEFAULT_TIMEOUT};
use crate::cache::{CacheConfig, ResponseCache};
use crate::demo::DemoMatcher;
use crate::storage::MemoryStorage;
use crate::telemetry;
use crate::types::{Advice, AdviceResponse, AdviceSource, DemoResponse};
use crate::{Result, SakhaError};

/// Answers farmer queries using the cache, the backend and demo data.
pub struct OfflineAdvisor {
    cache: ResponseCache,
    backend: Option<Arc<dyn AdviceBackend>>,
    matcher: DemoMatcher,
    demo_mode: bool,
    demo_fallback: bool,
    request_timeout: Duration,
}

impl OfflineAdvisor {
    /// Create a new builder for configuring the advisor.
    pub fn builder() -> OfflineAdvisorBuilder {
        OfflineAdvisorBuilder::new()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn matcher(&self) -> &DemoMatcher {
        &self.matcher
    }

    pub fn is_demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// Answer `query` asked in `language`.
    #[instrument(skip_all, fields(language = %language))]
    pub async fn ask(&self, query: &str, language: &str) -> Result<Advice> {
        if query.trim().is_empty() {
            return Err(SakhaError::InvalidInput("query is empty".to_string()));
        }

        if let Some(response) = self.cache.get(query, language) {
            return Ok(self.answered(response, AdviceSource::Cache, None));
        }

        if self.demo_mode {
            if let Some(demo) = self.matcher.get_demo_response(query) {
                return Ok(self.demo_answer(demo));
            }
        }

        let Some(backend) = &self.backend else {
            return self.fall_back(query, SakhaError::NoBackend);
        };

        match self.call_backend(backend.as_ref(), query, language).await {
            Ok(response) => {
                self.cache.put(query, language, response.clone());
                Ok(self.answered(response, AdviceSource::Live, None))
            }
            Err(e) if e.is_transient() => {
                warn!(backend = backend.name(), error = %e, "advice backend unavailable");
                self.fall_back(query, e)
            }
            Err(e) => Err(e),
        }
    }

    async fn call_backend(
        &self,
        backend: &dyn AdviceBackend,
        query: &str,
        language: &str,
    ) -> Result<AdviceResponse> {
        let start = Instant::now();
        let result = tokio::time::timeout(
            self.request_timeout,
            backend.generate_advice(query, language),
        )
        .await
        .unwrap_or(Err(SakhaError::Timeout(self.request_timeout)));
        metrics::histogram!(telemetry::BACKEND_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        result
    }

    fn fall_back(&self, query: &str, err: SakhaError) -> Result<Advice> {
        if self.demo_fallback {
            if let Some(demo) = self.matcher.get_demo_response(query) {
                info!("answering from demo data");
                return Ok(self.demo_answer(demo));
            }
        }
        debug!(error = %err, "no fallback answer available");
        Err(err)
    }

    fn demo_answer(&self, demo: DemoResponse) -> Advice {
        let response = AdviceResponse::new(demo.answer, String::new()).with_source("demo");
        self.answered(response, AdviceSource::Demo, Some(demo.confidence))
    }

    fn answered(
        &self,
        response: AdviceResponse,
        source: AdviceSource,
        confidence: Option<f64>,
    ) -> Advice {
        metrics::counter!(telemetry::ANSWERS_TOTAL, "source" => source.as_str()).increment(1);
        Advice {
            response,
            source,
            confidence,
        }
    }
}

/// Builder for [`OfflineAdvisor`].
pub struct OfflineAdvisorBuilder {
    cache: Option<ResponseCache>,
    backend: Option<Arc<dyn AdviceBackend>>,
    matcher: Option<DemoMatcher>,
    demo_mode: bool,
    demo_fallback: bool,
    request_timeout: Duration,
}

impl OfflineAdvisorBuilder {
    pub fn new() -> Self {
        Self {
            cache: None,
            backend: None,
            matcher: None,
            demo_mode: false,
            demo_fallback: true,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use `cache` for offline answers. Default: in-memory, default config.
    pub fn cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Generate live advice through `backend`.
    pub fn backend(mut self, backend: Arc<dyn AdviceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Match demo answers with `matcher`. Default: built-in reference set.
    pub fn matcher(mut self, matcher: DemoMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Prefer canned answers over the backend. Default: off.
    pub fn demo_mode(mut self, enabled: bool) -> Self {
        self.demo_mode = enabled;
        self
    }

    /// Use canned answers when the backend is missing or unavailable.
    /// Default: on.
    pub fn demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    /// Upper bound for a single backend call. Default: 30 seconds.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OfflineAdvisor> {
        if self.request_timeout.is_zero() {
            return Err(SakhaError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.backend.is_none() && !self.demo_mode && !self.demo_fallback {
            return Err(SakhaError::Configuration(
                "no advice backend and demo answers disabled".to_string(),
            ));
        }

        let cache = self.cache.unwrap_or_else(|| {
            ResponseCache::new(Arc::new(MemoryStorage::new()), CacheConfig::default())
        });

        Ok(OfflineAdvisor {
            cache,
            backend: self.backend,
            matcher: self.matcher.unwrap_or_default(),
            demo_mode: self.demo_mode,
            demo_fallback: self.demo_fallback,
            request_timeout: self.request_timeout,
        })
    }
}

impl Default for OfflineAdvisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
