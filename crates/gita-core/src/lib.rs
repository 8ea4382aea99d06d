pub mod client;
pub mod config;
pub mod corrections;
pub mod error;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod state;
pub mod verse;

// Re-export main types for convenience
pub use client::{GitaClient, VerseBackend};
pub use config::Config;
pub use corrections::{CorrectionRange, CorrectionTable};
pub use error::{GitaError, TableError};
pub use probe::{DirectProbe, Probe, ProbeMode, ProxyProbe, Reachability};
pub use report::ReportSubmission;
pub use resolver::{Resolution, Resolver, SearchEngine};
pub use state::{ExplainState, LoadApplied, LoadTicket, VerseSession};
pub use verse::{Verse, VerseRef};

use std::sync::Arc;

/// Resolver built from the configured base URLs and the vedabase table
pub fn resolver_from_config(config: &Config) -> Resolver {
    Resolver::new(&config.primary_base, &config.secondary_base, CorrectionTable::vedabase())
}

/// Probe matching the configured mode, or `None` when probing is off
pub fn probe_from_config(config: &Config) -> Option<Arc<dyn Probe>> {
    match config.probe {
        ProbeMode::None => None,
        ProbeMode::Direct => Some(Arc::new(DirectProbe::new(config.probe_timeout()))),
        ProbeMode::Proxy => Some(Arc::new(ProxyProbe::new(
            &config.server_url,
            config.probe_timeout(),
        ))),
    }
}
