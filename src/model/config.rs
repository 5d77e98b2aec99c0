use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::anyhow;

/// The REST production endpoint for GitHub.
pub const GITHUB_API_ENDPOINT: &str = "https://api.github.com";

/// The default timeout applied to every API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration of the HTTP API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// The base URL of the API, without trailing path.
    pub base_url: String,

    /// The timeout of a single request, connection included.
    pub timeout: Duration,

    /// The user agent sent with every request.
    pub user_agent: String,
}

impl ApiClientConfig {
    /// Creates a new `ApiClientConfig` pointing at the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Replaces the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: GITHUB_API_ENDPOINT.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// What happens to in-flight requests when a new fetch starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SupersessionPolicy {
    /// Cancel every in-flight request before starting the new one.
    #[default]
    CancelPrevious,

    /// Let older requests run, but drop their results when they arrive.
    DiscardStale,

    /// Let every request complete and update the state in arrival order.
    Concurrent,
}

impl FromStr for SupersessionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel-previous" => Ok(Self::CancelPrevious),
            "discard-stale" => Ok(Self::DiscardStale),
            "concurrent" => Ok(Self::Concurrent),
            _ => Err(anyhow!(
                "Unknown supersession policy '{s}', expected one of: cancel-previous, discard-stale, concurrent"
            )),
        }
    }
}

impl Display for SupersessionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupersessionPolicy::CancelPrevious => write!(f, "cancel-previous"),
            SupersessionPolicy::DiscardStale => write!(f, "discard-stale"),
            SupersessionPolicy::Concurrent => write!(f, "concurrent"),
        }
    }
}
