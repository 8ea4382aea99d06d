use std::sync::Arc;
use tokio::sync::mpsc;
use gita_core::{
    ExplainState, GitaError, LoadApplied, LoadTicket, Probe, ReportSubmission, Resolution,
    Resolver, SearchEngine, Verse, VerseBackend, VerseRef, VerseSession,
};
use gita_core::report::MAX_REPORT_CHARS;
use crate::browser::Browser;
use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the report box
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Results of background network work, delivered back through the event loop
#[derive(Debug)]
pub enum TaskOutcome {
    VerseLoaded {
        ticket: LoadTicket,
        result: Result<Verse, GitaError>,
    },
    Explained {
        reference: VerseRef,
        resolution: Resolution,
    },
    ReportSent {
        result: Result<(), GitaError>,
    },
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub session: VerseSession,
    pub explain: ExplainState,
    pub status: Option<StatusMessage>,

    // Report input state
    pub report_input: String,
    pub report_cursor: usize, // cursor position in report_input, in chars
    pub report_sending: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Services
    backend: Arc<dyn VerseBackend>,
    probe: Option<Arc<dyn Probe>>,
    resolver: Arc<Resolver>,
    browser: Arc<dyn Browser>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        backend: Arc<dyn VerseBackend>,
        probe: Option<Arc<dyn Probe>>,
        resolver: Resolver,
        browser: Arc<dyn Browser>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            session: VerseSession::new(),
            explain: ExplainState::default(),
            status: None,

            report_input: String::new(),
            report_cursor: 0,
            report_sending: false,

            animation_frame: 0,

            backend,
            probe,
            resolver: Arc::new(resolver),
            browser,
            events,
        }
    }

    pub fn current_verse(&self) -> Option<&Verse> {
        self.session.current()
    }

    /// True while any network task is outstanding
    pub fn is_busy(&self) -> bool {
        self.session.is_loading() || self.explain.is_resolving() || self.report_sending
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        let text = text.into();
        match kind {
            StatusKind::Error => tracing::warn!("{}", text),
            _ => tracing::debug!("status: {}", text),
        }
        self.status = Some(StatusMessage { kind, text });
    }

    fn report_error(&mut self, err: &GitaError) {
        let kind = match err {
            GitaError::NoCurrentVerse | GitaError::AlreadyResolving | GitaError::EmptyReport => {
                StatusKind::Warning
            }
            _ => StatusKind::Error,
        };
        self.set_status(kind, err.to_string());
    }

    /// Request a new random verse. Later requests win over earlier ones.
    pub fn request_verse(&mut self) {
        let ticket = self.session.begin_load();
        let backend = self.backend.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = backend.fetch_verse().await;
            let _ = events.send(AppEvent::Task(TaskOutcome::VerseLoaded { ticket, result }));
        });
    }

    pub fn explain(&mut self) {
        let reference = match self.explain.begin(&self.session) {
            Ok(reference) => reference,
            Err(e) => {
                self.report_error(&e);
                return;
            }
        };

        let Some(probe) = self.probe.clone() else {
            let url = self.resolver.resolve_primary_url(reference.chapter, reference.verse);
            self.finish_explain(reference, Resolution::Found(url));
            return;
        };

        self.set_status(StatusKind::Info, format!("Looking up an explanation for {}", reference));
        let resolver = self.resolver.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let resolution = resolver.resolve_with_fallback(probe.as_ref(), reference).await;
            let _ = events.send(AppEvent::Task(TaskOutcome::Explained { reference, resolution }));
        });
    }

    fn finish_explain(&mut self, reference: VerseRef, resolution: Resolution) {
        match resolution {
            Resolution::Found(url) => {
                if self.open_url(&url, &format!("explanation of {}", reference)) {
                    self.explain.navigated(url);
                } else {
                    self.explain.abandon();
                }
            }
            Resolution::NotFound => {
                let err = self.explain.unavailable(reference);
                self.report_error(&err);
            }
        }
    }

    pub fn search(&mut self, engine: SearchEngine) {
        match self.session.require_current() {
            Ok(reference) => {
                let url = self
                    .resolver
                    .resolve_search_url(engine, reference.chapter, reference.verse);
                self.open_url(&url, &format!("{} search for {}", engine.display_name(), reference));
            }
            Err(e) => self.report_error(&e),
        }
    }

    /// Open `url` in the browser, returning whether the launch worked
    fn open_url(&mut self, url: &str, label: &str) -> bool {
        match self.browser.open(url) {
            Ok(()) => {
                self.set_status(StatusKind::Success, format!("Opened {}", label));
                true
            }
            Err(e) => {
                self.set_status(StatusKind::Error, format!("{} ({})", e, url));
                false
            }
        }
    }

    /// Enter the report box, only when there is a verse to report on
    pub fn start_report(&mut self) {
        match self.session.require_current() {
            Ok(_) => {
                self.input_mode = InputMode::Editing;
                self.report_cursor = self.report_input.chars().count();
            }
            Err(e) => self.report_error(&e),
        }
    }

    pub fn submit_report(&mut self) {
        if self.report_sending {
            return;
        }

        let report = match self
            .session
            .require_current()
            .and_then(|reference| ReportSubmission::new(&self.report_input, Some(reference)))
        {
            Ok(report) => report,
            Err(e) => {
                self.report_error(&e);
                return;
            }
        };

        self.report_sending = true;
        self.set_status(StatusKind::Info, "Sending report");
        let backend = self.backend.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = backend.submit_report(&report).await;
            let _ = events.send(AppEvent::Task(TaskOutcome::ReportSent { result }));
        });
    }

    pub fn apply_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::VerseLoaded { ticket, result } => {
                if self.session.complete_load(ticket, &result) == LoadApplied::Stale {
                    return;
                }
                match result {
                    Ok(verse) => {
                        tracing::info!("showing verse {}", verse.reference());
                        self.status = None;
                    }
                    Err(e) => self.report_error(&e),
                }
            }
            TaskOutcome::Explained { reference, resolution } => {
                self.finish_explain(reference, resolution);
            }
            TaskOutcome::ReportSent { result } => {
                self.report_sending = false;
                match result {
                    Ok(()) => {
                        self.report_input.clear();
                        self.report_cursor = 0;
                        self.input_mode = InputMode::Normal;
                        self.set_status(StatusKind::Success, "Report sent. Thank you!");
                    }
                    Err(e) => self.report_error(&e),
                }
            }
        }
    }

    /// Insert at the cursor unless the message is already at the length cap.
    /// The text is frozen while it is being sent.
    pub fn insert_report_char(&mut self, c: char) {
        if self.report_sending || self.report_input.chars().count() >= MAX_REPORT_CHARS {
            return;
        }
        let byte_pos = char_to_byte_index(&self.report_input, self.report_cursor);
        self.report_input.insert(byte_pos, c);
        self.report_cursor += 1;
    }

    pub fn backspace_report(&mut self) {
        if !self.report_sending && self.report_cursor > 0 {
            self.report_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.report_input, self.report_cursor);
            self.report_input.remove(byte_pos);
        }
    }

    pub fn delete_report(&mut self) {
        let char_count = self.report_input.chars().count();
        if !self.report_sending && self.report_cursor < char_count {
            let byte_pos = char_to_byte_index(&self.report_input, self.report_cursor);
            self.report_input.remove(byte_pos);
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub(crate) fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
