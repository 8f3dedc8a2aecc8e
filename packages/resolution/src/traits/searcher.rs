//! Search provider trait.
//!
//! Abstracts over web search backends (SerpAPI, Google Custom Search,
//! Tavily, ...). The pipeline only needs one operation: issue a query, get
//! the organic hits back in response order.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::SearchHit;

/// A web search backend.
///
/// Implementations own their transport concerns - credentials, timeouts,
/// and rate limiting all live behind this seam. `search` is expected to
/// suspend the caller while a rate limiter withholds a slot rather than
/// fail fast.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Issue one search and return the provider's organic hits, positions
    /// assigned 1-based in response order.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError>;
}
