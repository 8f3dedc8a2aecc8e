//! Domain types for the resolution pipeline.

pub mod query;
pub mod record;
pub mod search;

pub use query::QueryKind;
pub use record::{
    Confidence, ExtractionRecord, RawExtraction, ERROR_SOURCE, NOT_FOUND_INFO, NO_SOURCE,
};
pub use search::{EntitySearchResult, SearchHit, MAX_HITS};
