//! Advice generation backends.
//!
//! The generative model that writes advice is an external service. The
//! [`AdviceBackend`] trait is the seam the advisor calls through;
//! [`HttpAdviceBackend`] speaks to a hosted JSON endpoint.

mod http;

pub use http::{DEFAULT_TIMEOUT, HttpAdviceBackend};

use async_trait::async_trait;

use crate::Result;
use crate::types::AdviceResponse;

/// Something that can turn a farmer's query into advice.
#[async_trait]
pub trait AdviceBackend: Send + Sync {
    /// Short name for logs and metrics.
    fn name(&self) -> &str;

    /// Generate advice for `query` asked in `language` (e.g. `"hi"`).
    async fn generate_advice(&self, query: &str, language: &str) -> Result<AdviceResponse>;
}
