//! Failure taxonomy for user-triggered actions.
//!
//! Every variant is recoverable: the action that produced it reports the
//! failure and the application stays interactive.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitaError {
    /// The verse fetch failed; the current verse is left as it was.
    #[error("could not load verse: {0}")]
    LoadFailure(String),

    /// An action needing a displayed verse ran before one was loaded.
    #[error("no verse loaded yet - press 'n' to load one")]
    NoCurrentVerse,

    /// An explain resolution is already running.
    #[error("already looking up an explanation")]
    AlreadyResolving,

    #[error("report message is empty")]
    EmptyReport,

    /// The report sink rejected the submission or could not be reached.
    #[error("could not send report: {0}")]
    ReportFailure(String),

    /// Neither the primary nor the secondary explanation site is reachable.
    #[error("no explanation available for verse {0}")]
    ResourceUnavailable(String),
}

/// Rejected correction table entries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("chapter {0} is out of range")]
    InvalidChapter(u8),

    #[error("chapter {chapter}: range {low}-{high} is inverted")]
    InvertedRange { chapter: u8, low: u16, high: u16 },

    #[error("chapter {chapter}: range {low}-{high} overlaps or precedes the previous range")]
    Unordered { chapter: u8, low: u16, high: u16 },
}
