//! Client configuration, with production defaults and environment overrides.

use std::time::Duration;

use crate::constants::BASE_URL;

/// Environment variable holding the portal API key.
pub const ENV_API_KEY: &str = "PORTAL_API_KEY";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "PORTAL_BASE_URL";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "PORTAL_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings shared by every request a client makes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the CKAN action API. Defaults to [`BASE_URL`].
    pub base_url: String,
    /// Sent verbatim as the `Authorization` header when set.
    pub api_key: Option<String>,
    /// Per-request timeout. Defaults to 30 seconds.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("portal_api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Reads overrides from `PORTAL_API_KEY`, `PORTAL_BASE_URL` and
    /// `PORTAL_TIMEOUT_SECS`. Unset, empty, or unparseable values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            base_url: non_empty(ENV_BASE_URL).unwrap_or(defaults.base_url),
            api_key: non_empty(ENV_API_KEY),
            timeout: non_empty(ENV_TIMEOUT_SECS)
                .and_then(|val| val.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            user_agent: defaults.user_agent,
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
