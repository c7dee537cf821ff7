//! Configuration management for brewscout.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Every value has a default, so the tool runs against
//! the public coffee shop API without any configuration at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use reqwest::Url;
use tracing::{debug, warn};

use crate::error::FinderError;

pub const DEFAULT_TOKEN_URL: &str = "https://api-challenge.agilefreaks.com/v1/tokens";
pub const DEFAULT_SHOPS_URL: &str = "https://api-challenge.agilefreaks.com/v1/coffee_shops";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(5000);

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `brewscout/.env` under the platform-specific
/// local data directory:
/// - Linux: `~/.local/share/brewscout/.env`
/// - macOS: `~/Library/Application Support/brewscout/.env`
/// - Windows: `%LOCALAPPDATA%/brewscout/.env`
///
/// A missing `.env` file is not an error; defaults and the process environment
/// are used instead.
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) => debug!(path = %path.display(), error = %e, "no environment file loaded"),
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("brewscout/.env");
    path
}

/// How often each kind of failure may be retried while talking to the API.
///
/// Every failure class has its own budget, so one run can survive a stale
/// token, an outage and a timeout, but never loops on any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fresh tokens fetched after the shop endpoint answers 401.
    pub token_refreshes: u32,
    /// Retries after the shop endpoint answers 503.
    pub unavailable_retries: u32,
    /// Retries after a client-side timeout or a 504 from the shop endpoint.
    pub timeout_retries: u32,
    /// Extra attempts at the initial token request.
    pub token_retries: u32,
    /// Fixed delay before every retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            token_refreshes: 1,
            unavailable_retries: 1,
            timeout_retries: 1,
            token_retries: 0,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries anything.
    pub fn none() -> Self {
        RetryPolicy {
            token_refreshes: 0,
            unavailable_retries: 0,
            timeout_retries: 0,
            token_retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub token_url: String,
    pub shops_url: String,
    /// Bound applied to every single HTTP call.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            shops_url: DEFAULT_SHOPS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration from environment variables.
    ///
    /// Reads:
    /// - `BREWSCOUT_TOKEN_URL`: token endpoint
    /// - `BREWSCOUT_SHOPS_URL`: coffee shop listing endpoint
    /// - `BREWSCOUT_TIMEOUT_MS`: bound for a single request
    /// - `BREWSCOUT_BACKOFF_MS`: delay before a retry
    /// - `BREWSCOUT_TOKEN_REFRESHES`, `BREWSCOUT_UNAVAILABLE_RETRIES`,
    ///   `BREWSCOUT_TIMEOUT_RETRIES`, `BREWSCOUT_TOKEN_RETRIES`: retry budgets
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key/value source using the
    /// `BREWSCOUT_*` keys read by [`ClientConfig::from_env`].
    ///
    /// Values are trimmed before parsing. Unparsable numbers are logged and
    /// replaced by their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ClientConfig::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let number = |key: &str| parse_value::<u64>(key, lookup(key));
        let budget = |key: &str| parse_value::<u32>(key, lookup(key));

        ClientConfig {
            token_url: text("BREWSCOUT_TOKEN_URL").unwrap_or(defaults.token_url),
            shops_url: text("BREWSCOUT_SHOPS_URL").unwrap_or(defaults.shops_url),
            timeout: number("BREWSCOUT_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            retry: RetryPolicy {
                token_refreshes: budget("BREWSCOUT_TOKEN_REFRESHES")
                    .unwrap_or(defaults.retry.token_refreshes),
                unavailable_retries: budget("BREWSCOUT_UNAVAILABLE_RETRIES")
                    .unwrap_or(defaults.retry.unavailable_retries),
                timeout_retries: budget("BREWSCOUT_TIMEOUT_RETRIES")
                    .unwrap_or(defaults.retry.timeout_retries),
                token_retries: budget("BREWSCOUT_TOKEN_RETRIES")
                    .unwrap_or(defaults.retry.token_retries),
                backoff: number("BREWSCOUT_BACKOFF_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.retry.backoff),
            },
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_shops_url(mut self, url: impl Into<String>) -> Self {
        self.shops_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.retry.backoff = backoff;
        self
    }

    /// Checks that both endpoints parse as http(s) URLs and the timeout is non-zero.
    pub fn validate(&self) -> Result<(), FinderError> {
        for (name, url) in [("token", &self.token_url), ("shops", &self.shops_url)] {
            let parsed = Url::parse(url).map_err(|e| {
                FinderError::Config(format!("invalid {} URL '{}': {}", name, url, e))
            })?;

            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(FinderError::Config(format!(
                    "{} URL must use http or https, got '{}'",
                    name, url
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(FinderError::Config("timeout cannot be zero".to_string()));
        }

        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable configuration value");
            None
        }
    }
}
