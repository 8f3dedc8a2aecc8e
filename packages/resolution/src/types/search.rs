//! Search result types - hits and the per-entity cache slot contents.

use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::query::QueryKind;

/// Hard ceiling on hits kept per entity.
///
/// Applied both at request time (the provider is asked for this many) and
/// again when the result is assembled, as a documented invariant.
pub const MAX_HITS: usize = 5;

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub snippet: String,

    /// 1-based rank in the provider's response order
    pub position: u32,

    /// The human-readable source string the provider displays
    #[serde(default)]
    pub displayed_link: String,
}

impl SearchHit {
    /// Create a hit with the given rank; remaining fields start empty.
    pub fn new(position: u32, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: String::new(),
            position,
            displayed_link: String::new(),
        }
    }

    /// Set the snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the displayed source string.
    pub fn with_displayed_link(mut self, displayed_link: impl Into<String>) -> Self {
        self.displayed_link = displayed_link.into();
        self
    }
}

/// One entity's search outcome - exactly what a cache slot holds.
///
/// Created on a cache miss after a provider call (successful or failed) and
/// read-only afterward. A slot is logically expired once its age reaches the
/// cache's time-to-live; a fresh fetch then overwrites it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySearchResult {
    pub entity: String,

    #[serde(rename = "query_type")]
    pub query_kind: QueryKind,

    /// The literal query string issued to the provider
    pub query: String,

    /// Local wall-clock creation time, `YYYY-MM-DD HH:MM:SS`
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,

    /// Set when the provider call failed; the hit list is empty then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub results: Vec<SearchHit>,
}

impl EntitySearchResult {
    /// Assemble a successful result: truncate to [`MAX_HITS`], restamp
    /// 1-based positions in response order, and stamp the current time.
    pub fn new(
        entity: impl Into<String>,
        query_kind: QueryKind,
        query: impl Into<String>,
        mut results: Vec<SearchHit>,
    ) -> Self {
        results.truncate(MAX_HITS);
        for (idx, hit) in results.iter_mut().enumerate() {
            hit.position = idx as u32 + 1;
        }
        Self {
            entity: entity.into(),
            query_kind,
            query: query.into(),
            timestamp: Local::now().naive_local(),
            error: None,
            results,
        }
    }

    /// Assemble an error-marked result with zero hits.
    ///
    /// This is data, not a failure: a batch carries it forward so one
    /// entity's provider fault never aborts the run.
    pub fn failed(
        entity: impl Into<String>,
        query_kind: QueryKind,
        query: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            query_kind,
            query: query.into(),
            timestamp: Local::now().naive_local(),
            error: Some(error.into()),
            results: Vec::new(),
        }
    }

    /// Override the creation timestamp (used to exercise expiry).
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the slot has reached its time-to-live at `now`.
    ///
    /// The boundary is exact: age `max_age - 1s` is fresh, age `max_age`
    /// is stale.
    pub fn is_stale(&self, now: NaiveDateTime, max_age: TimeDelta) -> bool {
        now - self.timestamp >= max_age
    }
}

/// Cache timestamps keep the flat-file format of the original cache
/// directory: local wall-clock seconds, `YYYY-MM-DD HH:MM:SS`.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
