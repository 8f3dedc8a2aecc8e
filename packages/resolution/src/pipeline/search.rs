//! Entity search orchestration - cache consult, provider fallback, pacing.

use std::time::Duration;

use tracing::{error, info};

use crate::cache::SearchCache;
use crate::error::TemplateError;
use crate::pipeline::prompts::COMPANY_PLACEHOLDER;
use crate::pipeline::table::{flatten_rows, SearchRow};
use crate::providers::CALLS_PER_MINUTE;
use crate::traits::SearchProvider;
use crate::types::{EntitySearchResult, QueryKind};

/// Render the query issued to the provider.
///
/// Unlike the prompt-side rendering this is strict: a template with no
/// `{company}` placeholder would issue the identical query for every
/// entity, so it is rejected up front.
pub fn render_query(template: &str, entity: &str) -> Result<String, TemplateError> {
    if !template.contains(COMPANY_PLACEHOLDER) {
        return Err(TemplateError::MissingPlaceholder {
            template: template.to_string(),
        });
    }
    Ok(template.replace(COMPANY_PLACEHOLDER, entity))
}

/// Orchestrates per-entity search: derives the query kind, consults the
/// cache, falls back to the provider, and persists fresh results.
///
/// Owns the cache slot lifecycle exclusively for the duration of a run.
pub struct EntitySearcher<P: SearchProvider> {
    provider: P,
    cache: SearchCache,
    pace: Duration,
}

impl<P: SearchProvider> EntitySearcher<P> {
    /// Create an orchestrator. The inter-entity pace defaults to the rate
    /// limiter's cadence (60 / [`CALLS_PER_MINUTE`] seconds) so cache-heavy
    /// batches stay under the provider ceiling too.
    pub fn new(provider: P, cache: SearchCache) -> Self {
        Self {
            provider,
            cache,
            pace: Duration::from_secs(60 / CALLS_PER_MINUTE as u64),
        }
    }

    /// Override the inter-entity delay (tests run with zero).
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Resolve one entity's search result.
    ///
    /// Cache hits return immediately. A provider failure is contained: the
    /// returned result carries the error and an empty hit list instead of
    /// failing the call. Only a malformed template errors, since that is
    /// fatal to the whole batch.
    pub async fn search_one(
        &self,
        entity: &str,
        template: &str,
    ) -> Result<EntitySearchResult, TemplateError> {
        let kind = QueryKind::from_template(template);

        if let Some(cached) = self.cache.lookup(entity, kind) {
            info!("cache hit for {entity} - {kind}");
            return Ok(cached);
        }

        let query = render_query(template, entity)?;
        match self.provider.search(&query).await {
            Ok(hits) => {
                let result = EntitySearchResult::new(entity, kind, query, hits);
                self.cache.store(&result);
                Ok(result)
            }
            Err(e) => {
                let message = format!("Error searching for entity {entity}: {e}");
                error!("{message}");
                Ok(EntitySearchResult::failed(entity, kind, query, message))
            }
        }
    }

    /// Run the batch strictly in input order, one per-entity result each.
    ///
    /// Sleeps for the configured pace after each non-final entity. One
    /// entity's provider failure never aborts the batch; a malformed
    /// template does, before any entity is attempted.
    pub async fn search_batch(
        &self,
        entities: &[String],
        template: &str,
    ) -> Result<Vec<EntitySearchResult>, TemplateError> {
        if let Some(first) = entities.first() {
            // Surface a template problem before burning provider calls.
            render_query(template, first)?;
        }

        let total = entities.len();
        let mut results = Vec::with_capacity(total);
        for (idx, entity) in entities.iter().enumerate() {
            info!("processing {}/{}: {} with prompt: {}", idx + 1, total, entity, template);
            results.push(self.search_one(entity, template).await?);
            if idx + 1 < total {
                tokio::time::sleep(self.pace).await;
            }
        }
        Ok(results)
    }

    /// The flat raw-results view: one row per (entity, hit).
    ///
    /// Entities with zero hits (including error-marked ones) contribute
    /// zero rows.
    pub async fn search_many(
        &self,
        entities: &[String],
        template: &str,
    ) -> Result<Vec<SearchRow>, TemplateError> {
        let results = self.search_batch(entities, template).await?;
        Ok(flatten_rows(&results))
    }
}
