//! Client configuration
//!
//! The API key resolves in this order: an explicit key on the request, then
//! the key set on [`ClientConfig`] (either with [`ClientConfig::with_api_key`]
//! or read from `ALTMETRIC_KEY` by [`ClientConfig::from_env`]), then the
//! shared demo key.

use std::env;
use std::time::Duration;

/// Base URL of the Altmetric v1 API
pub const DEFAULT_BASE_URL: &str = "http://api.altmetric.com/v1";

/// Shared public key used when no other key is configured
pub const DEMO_API_KEY: &str = "37c9ae22b7979124ea650f3412255bf9";

/// Environment variable read by [`ClientConfig::from_env`]
pub const API_KEY_ENV_VAR: &str = "ALTMETRIC_KEY";

/// Configuration for [`AltmetricClient`](crate::AltmetricClient)
///
/// # Example
///
/// ```
/// use altmetric_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_api_key("your_api_key_here")
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.effective_api_key(), "your_api_key_here");
/// assert_eq!(config.effective_base_url(), "http://api.altmetric.com/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Override for the API base URL (used for testing against a mock server)
    pub base_url: Option<String>,
    /// Override for the `User-Agent` header
    pub user_agent: Option<String>,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration with no API key, the default base URL and a 30 second timeout
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            user_agent: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Configuration whose API key is taken from `ALTMETRIC_KEY`, if set
    pub fn from_env() -> Self {
        let config = Self::new();
        match env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => config.with_api_key(key.trim()),
            _ => config,
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }

    /// The configured key, or the shared demo key
    pub fn effective_api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or(DEMO_API_KEY)
    }

    /// The base URL without a trailing slash
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("altmetric-client-rs/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
