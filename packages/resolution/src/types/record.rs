//! Extraction records - the validated answer for one entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel value for `extracted_info` when nothing was found.
pub const NOT_FOUND_INFO: &str = "Information not found";

/// Sentinel `source` paired with the not-found record.
pub const NO_SOURCE: &str = "None";

/// Sentinel `source` marking a record produced by a failed model call,
/// distinguishable from the clean not-found case.
pub const ERROR_SOURCE: &str = "Error";

/// Quality rating the model attaches to an extracted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Parse the exact uppercase tier names the model is instructed to use.
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The validated answer for one entity in one processing run.
///
/// Created once, never mutated, never persisted by the pipeline itself -
/// persistence is the caller's concern via the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRecord {
    pub entity: String,
    pub extracted_info: String,
    pub confidence: Confidence,
    pub source: String,
}

impl ExtractionRecord {
    /// The canonical "nothing found" record.
    ///
    /// Also the replacement for any model answer that fails validation.
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            extracted_info: NOT_FOUND_INFO.to_string(),
            confidence: Confidence::Low,
            source: NO_SOURCE.to_string(),
        }
    }

    /// The record for a model call that itself broke, carrying the cause in
    /// `extracted_info` so the user sees what happened.
    pub fn call_failed(entity: impl Into<String>, error: &str) -> Self {
        Self {
            entity: entity.into(),
            extracted_info: format!("Error during LLM processing: {error}"),
            confidence: Confidence::Low,
            source: ERROR_SOURCE.to_string(),
        }
    }

    /// Whether this is the canonical not-found record.
    pub fn is_not_found(&self) -> bool {
        self.extracted_info == NOT_FOUND_INFO && self.source == NO_SOURCE
    }
}

/// The wire shape the model is asked to produce.
///
/// Everything lands as raw strings; [`RawExtraction::validate`] is the only
/// path to an [`ExtractionRecord`].
#[derive(Debug, Deserialize)]
pub struct RawExtraction {
    pub extracted_info: String,
    pub confidence: String,
    pub source: String,
}

impl RawExtraction {
    /// Promote to a validated record.
    ///
    /// Rejects (returns `None`) when the confidence is not one of the three
    /// tiers or `extracted_info` is empty after trimming; the caller
    /// substitutes the canonical not-found record.
    pub fn validate(self, entity: &str) -> Option<ExtractionRecord> {
        let confidence = Confidence::parse_strict(&self.confidence)?;
        if self.extracted_info.trim().is_empty() {
            return None;
        }
        Some(ExtractionRecord {
            entity: entity.to_string(),
            extracted_info: self.extracted_info,
            confidence,
            source: self.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_raw_extraction_promotes_unchanged() {
        let raw = RawExtraction {
            extracted_info: "contact@acme.com".to_string(),
            confidence: "MEDIUM".to_string(),
            source: "https://acme.com/contact".to_string(),
        };
        let record = raw.validate("Acme Corp").unwrap();
        assert_eq!(record.extracted_info, "contact@acme.com");
        assert_eq!(record.confidence, Confidence::Medium);
        assert_eq!(record.source, "https://acme.com/contact");
    }

    #[test]
    fn unknown_confidence_tier_is_rejected() {
        let raw = RawExtraction {
            extracted_info: "contact@acme.com".to_string(),
            confidence: "high".to_string(),
            source: "acme.com".to_string(),
        };
        assert!(raw.validate("Acme Corp").is_none());
    }

    #[test]
    fn whitespace_only_info_is_rejected() {
        let raw = RawExtraction {
            extracted_info: "   \n".to_string(),
            confidence: "LOW".to_string(),
            source: "None".to_string(),
        };
        assert!(raw.validate("Acme Corp").is_none());
    }

    #[test]
    fn sentinels_are_distinguishable() {
        let not_found = ExtractionRecord::not_found("Acme Corp");
        let failed = ExtractionRecord::call_failed("Acme Corp", "connection refused");

        assert!(not_found.is_not_found());
        assert!(!failed.is_not_found());
        assert_eq!(failed.source, ERROR_SOURCE);
        assert!(failed.extracted_info.contains("connection refused"));
    }

    #[test]
    fn confidence_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"HIGH\"");
        let parsed: Confidence = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, Confidence::Low);
    }
}
