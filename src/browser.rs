use anyhow::{anyhow, Result};

/// Hands a URL to whatever displays web pages on this machine.
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// The user's default browser
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        tracing::info!("opening {}", url);
        open::that_detached(url).map_err(|e| anyhow!("Could not open browser: {}", e))
    }
}
