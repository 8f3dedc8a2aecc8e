//! Typed errors for the resolution pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Umbrella error for resolution operations.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Search backend call failed
    #[error("search provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Language model call failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Prompt template is unusable for the whole batch
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Cache slot I/O failed
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration error (missing credentials, bad paths)
    #[error("config error: {0}")]
    Config(String),
}

/// Failures calling the external search backend.
///
/// These are contained per entity: the orchestrator converts them into an
/// error-marked result with zero hits instead of aborting the batch.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-2xx response from the backend
    #[error("provider returned status {status}")]
    Status { status: u16 },

    /// Response body did not match the expected shape
    #[error("failed to decode provider response: {0}")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failures invoking the language model.
///
/// The extraction engine absorbs these into an `"Error"`-sourced record so
/// callers can tell a broken call apart from a clean "nothing found".
#[derive(Debug, Error)]
pub enum ModelError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-2xx response from the model API
    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response carried no choices
    #[error("model returned no choices")]
    Empty,
}

/// A prompt template the batch cannot run with.
///
/// Propagated to the caller rather than contained: a malformed template
/// fails every entity identically, so per-entity retries would be pointless.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template has no `{company}` placeholder to substitute into
    #[error("template has no {{company}} placeholder: {template:?}")]
    MissingPlaceholder { template: String },
}

/// Cache slot I/O failures.
///
/// Never propagated: the cache logs these at `warn` and reports a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the slot file failed
    #[error("slot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Slot file exists but does not parse
    #[error("slot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, ResolutionError>;
