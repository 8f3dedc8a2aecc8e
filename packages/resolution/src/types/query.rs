//! Query classification derived from prompt templates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of what a prompt template is asking for.
///
/// The kind partitions the search cache: the same entity searched with an
/// email template and an address template occupies two separate slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Email,
    Address,
    Phone,
    Website,
    General,
}

impl QueryKind {
    /// Classify a prompt template by case-insensitive keyword match.
    ///
    /// Priority order is fixed: email, address, phone, website, then the
    /// general fallback. The first keyword present wins, so a template
    /// mentioning both "email" and "phone" classifies as [`QueryKind::Email`].
    pub fn from_template(template: &str) -> Self {
        let lower = template.to_lowercase();
        if lower.contains("email") {
            Self::Email
        } else if lower.contains("address") {
            Self::Address
        } else if lower.contains("phone") {
            Self::Phone
        } else if lower.contains("website") {
            Self::Website
        } else {
            Self::General
        }
    }

    /// The lowercase tag used in cache files and slot ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Website => "website",
            Self::General => "general",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
