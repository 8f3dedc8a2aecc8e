//! The Resolver - main entry point wiring search and extraction together.

use std::time::Duration;

use crate::cache::SearchCache;
use crate::error::TemplateError;
use crate::pipeline::extract::ExtractionEngine;
use crate::pipeline::search::EntitySearcher;
use crate::pipeline::table::{flatten_rows, SearchRow};
use crate::traits::{ChatModel, SearchProvider};
use crate::types::ExtractionRecord;

/// Everything one batch run produces.
#[derive(Debug)]
pub struct BatchOutput {
    /// One row per (entity, hit) in input order
    pub raw: Vec<SearchRow>,

    /// One validated record per entity in input order
    pub processed: Vec<ExtractionRecord>,
}

/// The pipeline facade: cached, rate-limited search per entity followed by
/// one extraction per entity.
///
/// # Example
///
/// ```rust,ignore
/// let resolver = Resolver::new(
///     SerpApiClient::from_env()?,
///     GroqChat::from_env()?,
///     SearchCache::new("data/search_cache"),
/// );
///
/// let output = resolver
///     .run(&entities, "Get me the email address of {company}")
///     .await?;
/// ```
pub struct Resolver<P: SearchProvider, M: ChatModel> {
    searcher: EntitySearcher<P>,
    engine: ExtractionEngine<M>,
}

impl<P: SearchProvider, M: ChatModel> Resolver<P, M> {
    /// Wire a resolver from its three collaborators.
    pub fn new(provider: P, model: M, cache: SearchCache) -> Self {
        Self {
            searcher: EntitySearcher::new(provider, cache),
            engine: ExtractionEngine::new(model),
        }
    }

    /// Override the inter-entity search delay (tests run with zero).
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.searcher = self.searcher.with_pace(pace);
        self
    }

    /// Run the full batch: search every entity in input order, then extract
    /// once per entity.
    ///
    /// Extraction always recomputes - a search cache hit saves the provider
    /// call but never the model call. Per-entity failures are contained as
    /// data (error-marked results, sentinel records); only a malformed
    /// template fails the run.
    pub async fn run(
        &self,
        entities: &[String],
        template: &str,
    ) -> Result<BatchOutput, TemplateError> {
        let results = self.searcher.search_batch(entities, template).await?;
        let raw = flatten_rows(&results);

        let mut processed = Vec::with_capacity(results.len());
        for result in &results {
            let record = self
                .engine
                .extract(&result.entity, &result.results, template)
                .await;
            processed.push(record);
        }

        Ok(BatchOutput { raw, processed })
    }
}
