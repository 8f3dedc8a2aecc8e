//! Entity Resolution Pipeline
//!
//! Takes a list of entity names and a free-text prompt template ("Get me
//! the email address of {company}"), runs one web search per entity
//! through a disk cache and a rate-limited provider client, feeds the
//! snippets to a language model, and tabulates validated (value,
//! confidence, source) records alongside the raw hits, with CSV export.
//!
//! # Design
//!
//! - Explicitly constructed, injected components: the search backend and
//!   the model sit behind [`SearchProvider`] and [`ChatModel`] seams, so a
//!   whole batch runs against fakes in tests.
//! - Failures local to one entity are contained and reported as data (an
//!   error-marked result, a sentinel record); a batch always completes and
//!   yields a full table. Only a malformed template fails the run.
//! - Strictly sequential: one entity at a time, one call in flight, with
//!   the provider ceiling enforced by a client-owned token bucket and an
//!   inter-entity delay at the same cadence.
//!
//! # Usage
//!
//! ```rust,ignore
//! use resolution::{GroqChat, Resolver, SearchCache, SerpApiClient};
//!
//! let resolver = Resolver::new(
//!     SerpApiClient::from_env()?,
//!     GroqChat::from_env()?,
//!     SearchCache::new("data/search_cache"),
//! );
//!
//! let output = resolver
//!     .run(&entities, "Get me the email address of {company}")
//!     .await?;
//!
//! resolution::write_processed_csv(&output.processed, std::io::stdout())?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The two seams ([`SearchProvider`], [`ChatModel`])
//! - [`types`] - Hits, cache slots, query kinds, extraction records
//! - [`cache`] - Disk-backed per-entity search cache
//! - [`providers`] - SerpAPI and Groq implementations
//! - [`pipeline`] - Orchestrator, prompts, extraction engine, CSV tables
//! - [`testing`] - Mock implementations for tests

pub mod cache;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    CacheError, ModelError, ProviderError, ResolutionError, Result, TemplateError,
};
pub use traits::{ChatModel, SearchProvider};
pub use types::{
    Confidence, EntitySearchResult, ExtractionRecord, QueryKind, RawExtraction, SearchHit,
    ERROR_SOURCE, MAX_HITS, NOT_FOUND_INFO, NO_SOURCE,
};

// Re-export the cache and providers
pub use cache::{SearchCache, CACHE_TTL_SECS};
pub use providers::{GroqChat, RateGate, SerpApiClient, CALLS_PER_MINUTE};

// Re-export pipeline components
pub use pipeline::{
    build_extraction_prompt, flatten_rows, render_query, write_processed_csv, write_raw_csv,
    BatchOutput, EntitySearcher, ExtractionEngine, Resolver, SearchRow, COMPANY_PLACEHOLDER,
    SYSTEM_PROMPT,
};
