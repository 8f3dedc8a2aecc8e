//! Extraction engine - model call, JSON scan, validation, sentinel policy.

use tracing::error;

use crate::pipeline::prompts::{build_extraction_prompt, SYSTEM_PROMPT};
use crate::traits::ChatModel;
use crate::types::{ExtractionRecord, RawExtraction, SearchHit};

/// Turns one entity's search hits into a validated extraction record.
///
/// A pure function of (entity, hits, template) plus the model call: the
/// engine holds no state between runs and nothing is cached, so extraction
/// recomputes even when the search side was a cache hit.
pub struct ExtractionEngine<M: ChatModel> {
    model: M,
}

impl<M: ChatModel> ExtractionEngine<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Run one extraction. Infallible by contract: parse and validation
    /// problems become the canonical not-found record, a failed model call
    /// becomes an `"Error"`-sourced record carrying the cause.
    pub async fn extract(
        &self,
        entity: &str,
        hits: &[SearchHit],
        template: &str,
    ) -> ExtractionRecord {
        let prompt = build_extraction_prompt(entity, hits, template);

        let response = match self.model.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(response) => response,
            Err(e) => {
                error!("model call failed for {entity}: {e}");
                return ExtractionRecord::call_failed(entity, &e.to_string());
            }
        };

        parse_response(entity, &response).unwrap_or_else(|| ExtractionRecord::not_found(entity))
    }
}

/// Scan the response for its outermost brace-delimited window and decode
/// it into a validated record.
///
/// The scan is greedy: first `{` to last `}`. No window, undecodable JSON,
/// or a record failing validation all yield `None`; decode failures log the
/// raw response for diagnosis.
fn parse_response(entity: &str, response: &str) -> Option<ExtractionRecord> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }

    let window = &response[start..=end];
    let raw: RawExtraction = match serde_json::from_str(window) {
        Ok(raw) => raw,
        Err(e) => {
            error!("error parsing model response for {entity}: {e}; raw response: {response}");
            return None;
        }
    };
    raw.validate(entity)
}
