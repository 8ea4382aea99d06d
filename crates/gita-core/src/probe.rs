//! Reachability checks run before navigating to an explanation page.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const MIN_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Answer from a reachability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    /// Errors, timeouts and non-2xx answers
    Unreachable,
    /// The checker itself is not available, so nothing is known about the target
    Unknown,
}

/// Answers whether a URL currently responds successfully.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self, url: &str) -> Reachability;
}

fn probe_client(timeout: Duration) -> Client {
    match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("could not build probe client: {}; relying on per-request timeout", e);
            Client::new()
        }
    }
}

/// How the explain action verifies a page before opening it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// Open the primary URL without checking it
    #[default]
    None,
    /// Request the external site directly
    Direct,
    /// Ask the server's `/check_url` endpoint
    Proxy,
}

impl ProbeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMode::None => "none",
            ProbeMode::Direct => "direct",
            ProbeMode::Proxy => "proxy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(ProbeMode::None),
            "direct" => Some(ProbeMode::Direct),
            "proxy" => Some(ProbeMode::Proxy),
            _ => None,
        }
    }
}

/// Sends HEAD straight to the target, falling back to GET for servers that
/// refuse HEAD.
#[derive(Clone)]
pub struct DirectProbe {
    client: Client,
    timeout: Duration,
}

impl DirectProbe {
    /// `timeout` is raised to [`MIN_PROBE_TIMEOUT`] when shorter
    pub fn new(timeout: Duration) -> Self {
        let timeout = timeout.max(MIN_PROBE_TIMEOUT);
        Self {
            client: probe_client(timeout),
            timeout,
        }
    }
}

#[async_trait]
impl Probe for DirectProbe {
    async fn check(&self, url: &str) -> Reachability {
        let status = match self.client.head(url).timeout(self.timeout).send().await {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                match self.client.get(url).timeout(self.timeout).send().await {
                    Ok(response) => response.status(),
                    Err(e) => {
                        tracing::debug!("GET probe of {} failed: {}", url, e);
                        return Reachability::Unreachable;
                    }
                }
            }
            Ok(response) => response.status(),
            Err(e) => {
                tracing::debug!("HEAD probe of {} failed: {}", url, e);
                return Reachability::Unreachable;
            }
        };

        tracing::debug!("probe {} -> {}", url, status);
        if status.is_success() {
            Reachability::Reachable
        } else {
            Reachability::Unreachable
        }
    }
}

#[derive(Deserialize)]
struct CheckUrlResponse {
    ok: bool,
}

/// Delegates the check to `GET {server}/check_url?url=<encoded>`.
///
/// A server without that route (404 or 405) gives [`Reachability::Unknown`].
#[derive(Clone)]
pub struct ProxyProbe {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ProxyProbe {
    /// `timeout` is raised to [`MIN_PROBE_TIMEOUT`] when shorter
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let timeout = timeout.max(MIN_PROBE_TIMEOUT);
        Self {
            client: probe_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl Probe for ProxyProbe {
    async fn check(&self, url: &str) -> Reachability {
        let endpoint = format!("{}/check_url", self.base_url);

        let response = match self
            .client
            .get(&endpoint)
            .query(&[("url", url)])
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("reachability proxy request failed: {}", e);
                return Reachability::Unreachable;
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => {
                tracing::warn!(
                    "server has no usable /check_url ({}), skipping the check",
                    response.status()
                );
                return Reachability::Unknown;
            }
            status if !status.is_success() => {
                tracing::warn!("reachability proxy returned {}", status);
                return Reachability::Unreachable;
            }
            _ => {}
        }

        match response.json::<CheckUrlResponse>().await {
            Ok(CheckUrlResponse { ok: true }) => Reachability::Reachable,
            Ok(CheckUrlResponse { ok: false }) => Reachability::Unreachable,
            Err(e) => {
                tracing::warn!("reachability proxy sent an unreadable body: {}", e);
                Reachability::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_mode_parsing() {
        assert_eq!(ProbeMode::from_str("Proxy"), Some(ProbeMode::Proxy));
        assert_eq!(ProbeMode::from_str("direct"), Some(ProbeMode::Direct));
        assert_eq!(ProbeMode::from_str("none"), Some(ProbeMode::None));
        assert_eq!(ProbeMode::from_str("ping"), None);
    }

    #[test]
    fn test_probe_mode_round_trips_through_as_str() {
        for mode in [ProbeMode::None, ProbeMode::Direct, ProbeMode::Proxy] {
            assert_eq!(ProbeMode::from_str(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_probe_mode_defaults_to_none() {
        assert_eq!(ProbeMode::default(), ProbeMode::None);
    }

    #[test]
    fn test_short_timeouts_are_raised_to_minimum() {
        assert_eq!(DirectProbe::new(Duration::ZERO).timeout, MIN_PROBE_TIMEOUT);
        assert_eq!(ProxyProbe::new("http://x", Duration::from_millis(10)).timeout, MIN_PROBE_TIMEOUT);
        assert_eq!(DirectProbe::new(Duration::from_secs(7)).timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_probe_mode_serde_lowercase() {
        let mode: ProbeMode = serde_json::from_str("\"direct\"").unwrap();
        assert_eq!(mode, ProbeMode::Direct);
        assert_eq!(serde_json::to_string(&ProbeMode::Proxy).unwrap(), "\"proxy\"");
    }
}
