//! UI-agnostic application state types
//!
//! The verse session and the explain flow are owned by whichever front end
//! drives them and passed to the resolver and views by reference.

use crate::error::GitaError;
use crate::verse::{Verse, VerseRef};

/// Issued when a verse request starts; newer requests get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// What happened to a completed load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadApplied {
    /// The result was the newest seen and now decides the session
    Current,
    /// A newer request already completed; the result was dropped
    Stale,
}

/// The verse currently shown, if any.
#[derive(Debug, Default)]
pub struct VerseSession {
    current: Option<Verse>,
    issued: u64,
    applied: u64,
}

impl VerseSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Verse> {
        self.current.as_ref()
    }

    pub fn current_ref(&self) -> Option<VerseRef> {
        self.current.as_ref().map(Verse::reference)
    }

    /// Reference of the current verse, or `NoCurrentVerse`
    pub fn require_current(&self) -> Result<VerseRef, GitaError> {
        self.current_ref().ok_or(GitaError::NoCurrentVerse)
    }

    /// Replace the held verse unconditionally
    pub fn set_current(&mut self, verse: Verse) {
        self.current = Some(verse);
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Loads started but not yet completed or superseded
    pub fn is_loading(&self) -> bool {
        self.issued > self.applied
    }

    /// Apply a load result if `ticket` is newer than every result applied
    /// so far. A current failure leaves the held verse untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: &Result<Verse, GitaError>,
    ) -> LoadApplied {
        if ticket.0 <= self.applied {
            tracing::debug!("dropping stale verse load #{} (applied #{})", ticket.0, self.applied);
            return LoadApplied::Stale;
        }

        self.applied = ticket.0;
        if let Ok(verse) = result {
            self.set_current(verse.clone());
        }
        LoadApplied::Current
    }
}

/// Explain action: `Idle -> Resolving -> Navigated | Unavailable`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExplainState {
    #[default]
    Idle,
    Resolving(VerseRef),
    Navigated(String),
    Unavailable(VerseRef),
}

impl ExplainState {
    pub fn is_resolving(&self) -> bool {
        matches!(self, ExplainState::Resolving(_))
    }

    /// Enter `Resolving` for the session's current verse.
    ///
    /// Without a verse the state stays as it was and `NoCurrentVerse` is
    /// returned for the caller to show.
    pub fn begin(&mut self, session: &VerseSession) -> Result<VerseRef, GitaError> {
        if self.is_resolving() {
            return Err(GitaError::AlreadyResolving);
        }
        let reference = session.require_current()?;
        *self = ExplainState::Resolving(reference);
        Ok(reference)
    }

    /// Settle the flow once the resolved page has actually been opened
    pub fn navigated(&mut self, url: String) {
        *self = ExplainState::Navigated(url);
    }

    /// Settle the flow when neither page was reachable
    pub fn unavailable(&mut self, reference: VerseRef) -> GitaError {
        *self = ExplainState::Unavailable(reference);
        GitaError::ResourceUnavailable(reference.to_string())
    }

    /// Drop a resolved page that could not be opened
    pub fn abandon(&mut self) {
        *self = ExplainState::Idle;
    }
}
