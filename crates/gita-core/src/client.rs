use crate::error::GitaError;
use crate::report::ReportSubmission;
use crate::verse::Verse;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// The verse server as seen by the application: a source of verses and a
/// sink for reports.
#[async_trait]
pub trait VerseBackend: Send + Sync {
    async fn fetch_verse(&self) -> Result<Verse, GitaError>;
    async fn submit_report(&self, report: &ReportSubmission) -> Result<(), GitaError>;
}

#[derive(Deserialize)]
struct ServerError {
    error: String,
}

#[derive(Clone)]
pub struct GitaClient {
    client: Client,
    base_url: String,
}

impl GitaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Status line plus the server's `{"error": ...}` message when it sent one
async fn describe_failure(response: Response) -> String {
    let status = response.status();
    match response.json::<ServerError>().await {
        Ok(body) => format!("{} ({})", status, body.error),
        Err(_) => status.to_string(),
    }
}

#[async_trait]
impl VerseBackend for GitaClient {
    async fn fetch_verse(&self) -> Result<Verse, GitaError> {
        let url = format!("{}/api/verse", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GitaError::LoadFailure(e.to_string()))?;

        if !response.status().is_success() {
            let reason = describe_failure(response).await;
            return Err(GitaError::LoadFailure(format!("server returned {}", reason)));
        }

        let verse: Verse = response
            .json()
            .await
            .map_err(|e| GitaError::LoadFailure(format!("malformed verse: {}", e)))?;

        if !verse.reference().is_valid() {
            return Err(GitaError::LoadFailure(format!(
                "server sent nonexistent verse {}",
                verse.reference()
            )));
        }

        tracing::debug!("fetched verse {}", verse.reference());
        Ok(verse)
    }

    async fn submit_report(&self, report: &ReportSubmission) -> Result<(), GitaError> {
        let url = format!("{}/report", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(report)
            .send()
            .await
            .map_err(|e| GitaError::ReportFailure(e.to_string()))?;

        if !response.status().is_success() {
            let reason = describe_failure(response).await;
            return Err(GitaError::ReportFailure(format!("server returned {}", reason)));
        }

        Ok(())
    }
}
