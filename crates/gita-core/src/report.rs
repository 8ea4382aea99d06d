use crate::error::GitaError;
use crate::verse::VerseRef;
use serde::Serialize;

/// Longest message the report sink keeps
pub const MAX_REPORT_CHARS: usize = 500;

/// Body of `POST /report`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSubmission {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u8>,
    #[serde(rename = "verse", skip_serializing_if = "Option::is_none")]
    pub verse_number: Option<u16>,
}

impl ReportSubmission {
    /// Build a report about `reference`, trimming whitespace and capping the
    /// message length.
    pub fn new(message: &str, reference: Option<VerseRef>) -> Result<Self, GitaError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(GitaError::EmptyReport);
        }

        Ok(Self {
            message: trimmed.chars().take(MAX_REPORT_CHARS).collect(),
            chapter: reference.map(|r| r.chapter),
            verse_number: reference.map(|r| r.verse),
        })
    }
}
