use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use url::Url;

use crate::common::error::ApiError;

pub const DEFAULT_API_BASE_URL: &str = "https://appointment-manager-node.onrender.com/api/v1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub doctors_page_size: usize,
    pub doctors_fetch_limit: u32,
    pub query_retries: u32,
    pub stale_time: Duration,
    pub http_timeout: Duration,
    pub keyring_fallback: bool,
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid"),
            doctors_page_size: 6,
            doctors_fetch_limit: 100,
            query_retries: 2,
            stale_time: Duration::from_secs(300),
            http_timeout: Duration::from_secs(30),
            keyring_fallback: false,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!("[CONFIG] API base URL: {}", config.api_base_url);
        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let api_base_url = match lookup("MEDIBOOK_API_BASE_URL") {
            Some(raw) => Url::parse(raw.trim())
                .map_err(|e| ApiError::Config(format!("MEDIBOOK_API_BASE_URL '{}': {}", raw, e)))?,
            None => defaults.api_base_url,
        };
        Ok(Self {
            api_base_url,
            doctors_page_size: parse_or(&lookup, "MEDIBOOK_DOCTORS_PAGE_SIZE", defaults.doctors_page_size)
                .max(1),
            doctors_fetch_limit: parse_or(&lookup, "MEDIBOOK_DOCTORS_FETCH_LIMIT", defaults.doctors_fetch_limit)
                .max(1),
            query_retries: parse_or(&lookup, "MEDIBOOK_QUERY_RETRIES", defaults.query_retries),
            stale_time: Duration::from_secs(parse_or(
                &lookup,
                "MEDIBOOK_STALE_SECS",
                defaults.stale_time.as_secs(),
            )),
            http_timeout: Duration::from_secs(parse_or(
                &lookup,
                "MEDIBOOK_HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )),
            keyring_fallback: lookup("KEYRING_FALLBACK")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.keyring_fallback),
            data_dir: lookup("MEDIBOOK_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
        })
    }

    pub fn session_fallback_path(&self) -> Option<PathBuf> {
        self.keyring_fallback.then(|| self.data_dir.join("session.json"))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("[CONFIG] Ignoring invalid value for {}", key);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.doctors_page_size, 6);
        assert_eq!(config.query_retries, 2);
        assert!(config.session_fallback_path().is_none());
    }

    #[test]
    fn overrides_and_invalid_numbers() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("MEDIBOOK_API_BASE_URL", "http://localhost:4000/api/v1"),
            ("MEDIBOOK_DOCTORS_PAGE_SIZE", "not-a-number"),
            ("MEDIBOOK_QUERY_RETRIES", "5"),
            ("KEYRING_FALLBACK", "true"),
            ("MEDIBOOK_DATA_DIR", "/tmp/medibook"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:4000/api/v1");
        assert_eq!(config.doctors_page_size, 6);
        assert_eq!(config.query_retries, 5);
        assert_eq!(
            config.session_fallback_path(),
            Some(PathBuf::from("/tmp/medibook/session.json"))
        );
    }

    #[test]
    fn bad_base_url_is_a_config_error() {
        let err = ClientConfig::from_lookup(lookup_from(&[("MEDIBOOK_API_BASE_URL", "::nope")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
