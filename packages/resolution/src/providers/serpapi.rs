//! SerpAPI-backed search provider with a client-owned rate limiter.
//!
//! Request parameters are fixed: Google engine, [`MAX_HITS`] results,
//! English, US region, safe-search active, 30 second request timeout. No
//! retry at this layer - a transport or non-2xx failure surfaces as
//! [`ProviderError`] and the orchestrator decides what to do with it.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, ResolutionError, Result};
use crate::security::SecretString;
use crate::traits::SearchProvider;
use crate::types::{SearchHit, MAX_HITS};

/// Ceiling on provider calls per rolling 60 second window.
pub const CALLS_PER_MINUTE: u32 = 10;

/// Environment variable holding the SerpAPI key.
pub const API_KEY_VAR: &str = "API_KEY_SERPAPI";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Token bucket guarding outbound provider calls.
///
/// [`RateGate::acquire`] suspends the caller until the window admits
/// another call. The gate lives inside the client, so the ceiling is global
/// for everything sharing that client instance, not per entity.
pub struct RateGate {
    limiter: DefaultRateLimiter,
}

impl RateGate {
    /// A gate admitting `calls` per rolling 60 second window.
    pub fn per_minute(calls: u32) -> Self {
        let calls = NonZeroU32::new(calls).expect("calls per minute must be > 0");
        Self {
            limiter: RateLimiter::direct(Quota::per_minute(calls)),
        }
    }

    /// A gate with a custom quota (tests use faster refills).
    pub fn with_quota(quota: Quota) -> Self {
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    /// Suspend until the next call is admitted.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

/// SerpAPI search client.
pub struct SerpApiClient {
    api_key: SecretString,
    client: reqwest::Client,
    base_url: String,
    gate: RateGate,
}

impl SerpApiClient {
    /// Create a client with the given API key and the default
    /// [`CALLS_PER_MINUTE`] ceiling.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            client: reqwest::Client::new(),
            base_url: "https://serpapi.com/search".to_string(),
            gate: RateGate::per_minute(CALLS_PER_MINUTE),
        }
    }

    /// Create from the `API_KEY_SERPAPI` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| ResolutionError::Config(format!("{API_KEY_VAR} not set")))?;
        Ok(Self::new(api_key))
    }

    /// Point at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Replace the rate gate (tests use faster quotas).
    pub fn with_gate(mut self, gate: RateGate) -> Self {
        self.gate = gate;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<SerpHit>,
}

#[derive(Debug, Deserialize)]
struct SerpHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    displayed_link: String,
}

fn hits_from_response(response: SerpResponse) -> Vec<SearchHit> {
    response
        .organic_results
        .into_iter()
        .take(MAX_HITS)
        .enumerate()
        .map(|(idx, hit)| SearchHit {
            title: hit.title,
            link: hit.link,
            snippet: hit.snippet,
            position: idx as u32 + 1,
            displayed_link: hit.displayed_link,
        })
        .collect()
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str) -> std::result::Result<Vec<SearchHit>, ProviderError> {
        self.gate.acquire().await;
        debug!("issuing provider call for query: {query}");

        let num = MAX_HITS.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.expose()),
                ("engine", "google"),
                ("num", num.as_str()),
                ("hl", "en"),
                ("gl", "us"),
                ("safe", "active"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let body: SerpResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(Box::new(e)))?;

        Ok(hits_from_response(body))
    }
}
