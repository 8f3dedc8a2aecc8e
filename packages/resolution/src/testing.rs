//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline without real provider or model
//! calls. Both mocks record every call so tests can assert on call counts
//! (e.g. cache hits saving provider calls).

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{ModelError, ProviderError};
use crate::traits::{ChatModel, SearchProvider};
use crate::types::SearchHit;

/// A mock search provider returning scripted hits per query.
///
/// Unknown queries return an empty hit list; queries marked failing return
/// a transport error. Clones share state, so a test can keep a clone for
/// assertions after moving the mock into the pipeline.
#[derive(Clone, Default)]
pub struct MockSearchProvider {
    hits: Arc<RwLock<HashMap<String, Vec<SearchHit>>>>,
    fail_queries: Arc<RwLock<Vec<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script hits for an exact query string.
    pub fn with_hits(self, query: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        self.hits.write().unwrap().insert(query.into(), hits);
        self
    }

    /// Mark an exact query string as failing with a transport error.
    pub fn fail_query(self, query: impl Into<String>) -> Self {
        self.fail_queries.write().unwrap().push(query.into());
        self
    }

    /// Every query issued, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        self.calls.write().unwrap().push(query.to_string());

        if self.fail_queries.read().unwrap().iter().any(|q| q == query) {
            return Err(ProviderError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock connection refused",
            ))));
        }

        Ok(self
            .hits
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

/// Record of one call made to [`MockChatModel`].
#[derive(Debug, Clone)]
pub struct MockChatCall {
    pub system: String,
    pub user: String,
}

/// A mock chat model replaying a scripted queue of responses.
///
/// Responses are consumed in order; once the queue is empty the default
/// response is returned (a brace-free refusal unless overridden). Clones
/// share state, like [`MockSearchProvider`].
#[derive(Clone, Default)]
pub struct MockChatModel {
    responses: Arc<RwLock<VecDeque<String>>>,
    default_response: Arc<RwLock<Option<String>>>,
    fail: Arc<RwLock<bool>>,
    calls: Arc<RwLock<Vec<MockChatCall>>>,
}

impl MockChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response; calls pop the queue in order.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.write().unwrap().push_back(response.into());
        self
    }

    /// Response returned once the queue is drained.
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = Some(response.into());
        self
    }

    /// Make every call fail with a transport error.
    pub fn failing(self) -> Self {
        *self.fail.write().unwrap() = true;
        self
    }

    /// Every (system, user) pair sent, in order.
    pub fn calls(&self) -> Vec<MockChatCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ModelError> {
        self.calls.write().unwrap().push(MockChatCall {
            system: system.to_string(),
            user: user.to_string(),
        });

        if *self.fail.read().unwrap() {
            return Err(ModelError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock connection refused",
            ))));
        }

        if let Some(response) = self.responses.write().unwrap().pop_front() {
            return Ok(response);
        }

        Ok(self
            .default_response
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "No structured answer was produced.".to_string()))
    }
}

/// Build a plausible hit for tests.
pub fn sample_hit(position: u32, domain: &str) -> SearchHit {
    SearchHit::new(
        position,
        format!("Result {position} from {domain}"),
        format!("https://{domain}/page{position}"),
    )
    .with_snippet(format!("Snippet {position} about {domain}"))
    .with_displayed_link(domain)
}
