//! Gateway configuration
//!
//! The API key is the only value that normally comes from outside. Without it
//! requests still go out, unauthenticated and subject to the public rate limit.

use crate::constants::{
    API_KEY_ENV, API_URL_ENV, COINGECKO_API_URL, REQUEST_TIMEOUT_SECS, TIMEOUT_ENV, USER_AGENT,
};
use std::time::Duration;

/// Settings for [`CoinGeckoGateway`](crate::gateways::CoinGeckoGateway)
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    /// Demo API key, if any
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Reads `COINGECKO_API_KEY`, `COINGECKO_API_URL` and
    /// `COINGECKO_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config = config.with_api_key(lookup(API_KEY_ENV));
        if config.api_key.is_none() {
            tracing::warn!(
                env = API_KEY_ENV,
                "No API key configured, requests will be rate limited"
            );
        }

        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    env = TIMEOUT_ENV,
                    value = %raw,
                    "Ignoring invalid timeout"
                ),
            }
        }

        config
    }

    /// Sets the API key; blank keys count as absent
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = GatewayConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url, COINGECKO_API_URL);
        assert!(!config.is_authenticated());
        assert_eq!(config.timeout, Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn reads_key_url_and_timeout() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (API_KEY_ENV, " CG-test "),
            (API_URL_ENV, "http://localhost:9000/api/v3/"),
            (TIMEOUT_ENV, "3"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("CG-test"));
        assert_eq!(config.base_url, "http://localhost:9000/api/v3");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_key_and_bad_timeout_are_ignored() {
        let config =
            GatewayConfig::from_lookup(lookup(&[(API_KEY_ENV, "   "), (TIMEOUT_ENV, "soon")]));
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }
}
