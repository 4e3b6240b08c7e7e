//! Wire data model for the linguistic-analysis service.
//!
//! Request/response shapes as exchanged with the analysis endpoint. Offsets
//! in a [`WireMatch`] are absolute character offsets into the flattened text
//! that was sent; offsets in a [`WireContext`] are relative to its excerpt.

use serde::{Deserialize, Serialize};

/// Language sent when the session does not configure one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Request body sent to the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Flattened document text, lines joined with `\n`.
    pub text: String,
    /// Language code checked against, e.g. `en-US`.
    #[serde(default = "default_language")]
    pub language: String,
}

impl AnalysisRequest {
    /// Create a request with the default language.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: default_language(),
        }
    }
}

/// Response body returned by the analysis endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Reported issues, in service order.
    #[serde(default)]
    pub matches: Vec<WireMatch>,
}

/// One reported issue span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMatch {
    /// Absolute character offset into the flattened text.
    pub offset: usize,
    /// Span length in characters.
    pub length: usize,
    /// Human-readable description of the issue.
    #[serde(default)]
    pub message: String,
    /// The rule that produced this match.
    #[serde(default)]
    pub rule: WireRule,
    /// Excerpt around the issue, for display.
    #[serde(default)]
    pub context: Option<WireContext>,
    /// Candidate replacement texts, best first.
    #[serde(default)]
    pub replacements: Vec<WireReplacement>,
}

/// Identification of the rule behind a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRule {
    /// Stable rule identifier.
    #[serde(default)]
    pub id: String,
    /// Optional human-readable rule description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Excerpt around a match; `offset`/`length` are relative to `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireContext {
    /// The excerpt text.
    pub text: String,
    /// Start of the issue within the excerpt, in characters.
    pub offset: usize,
    /// Length of the issue within the excerpt, in characters.
    pub length: usize,
}

/// One candidate replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireReplacement {
    /// Replacement text for the matched span.
    pub value: String,
}
