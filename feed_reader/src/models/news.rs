use chrono::NaiveDateTime;
use serde::Serialize;

/// One headline row from a news table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    /// Headline text.
    pub headline: String,
    /// Timestamp exactly as printed on the page (e.g. `"Oct-17-25 04:05PM"`, `"03:30PM"`).
    pub timestamp_text: String,
    /// Link target of the headline, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Resolved publication time (exchange-local, naive), when the stamp could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDateTime>,
}
