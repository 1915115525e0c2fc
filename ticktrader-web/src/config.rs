//! Client configuration: base address, credentials and request timeout

use std::time::Duration;
use ticktrader_core::{Result, TickTraderError};
use tracing::info;
use url::Url;

use crate::auth::Credentials;
use crate::transport::DEFAULT_TIMEOUT;

pub const ENV_ADDRESS: &str = "TICKTRADER_ADDRESS";
pub const ENV_ID: &str = "TICKTRADER_ID";
pub const ENV_KEY: &str = "TICKTRADER_KEY";
pub const ENV_SECRET: &str = "TICKTRADER_SECRET";
pub const ENV_TIMEOUT_SECS: &str = "TICKTRADER_TIMEOUT_SECS";

/// Immutable client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    address: String,
    credentials: Credentials,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given Web API address
    ///
    /// The address must be an absolute URL such as
    /// `https://ttlive.example.com:8443`. Credentials may be empty when only
    /// public endpoints are used.
    pub fn new(address: &str, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            address: normalize_address(address)?,
            credentials,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Configuration for public endpoints only
    pub fn public(address: &str) -> Result<Self> {
        Self::new(address, Credentials::anonymous())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from environment variables (and `.env` if present)
    ///
    /// - `TICKTRADER_ADDRESS` (required)
    /// - `TICKTRADER_ID`, `TICKTRADER_KEY`, `TICKTRADER_SECRET`
    /// - `TICKTRADER_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let address = lookup(ENV_ADDRESS).ok_or_else(|| {
            TickTraderError::config(format!("{} environment variable not set", ENV_ADDRESS))
        })?;

        let credentials = Credentials::new(
            lookup(ENV_ID).unwrap_or_default(),
            lookup(ENV_KEY).unwrap_or_default(),
            lookup(ENV_SECRET).unwrap_or_default(),
        );

        let mut config = Self::new(&address, credentials)?;

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|e| {
                TickTraderError::config(format!("Invalid {} '{}': {}", ENV_TIMEOUT_SECS, raw, e))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if config.credentials.is_complete() {
            info!(
                "Loaded TickTrader Web API credentials from environment (id: {})",
                config.credentials.id()
            );
        } else {
            info!("No complete TickTrader Web API credentials found - private endpoints will be unavailable");
        }

        Ok(config)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Validate the address and strip trailing slashes so paths join cleanly
fn normalize_address(address: &str) -> Result<String> {
    let address = address.trim();
    if address.is_empty() {
        return Err(TickTraderError::config(
            "TickTrader Web API address should be valid",
        ));
    }

    let url = Url::parse(address).map_err(|e| {
        TickTraderError::config(format!("Invalid Web API address '{}': {}", address, e))
    })?;
    if url.cannot_be_a_base() {
        return Err(TickTraderError::config(format!(
            "Invalid Web API address '{}': not a base URL",
            address
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(TickTraderError::config(format!(
            "Invalid Web API address '{}': must not carry a query or fragment",
            address
        )));
    }

    Ok(address.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_address_validation() {
        assert!(ClientConfig::public("").unwrap_err().is_config());
        assert!(ClientConfig::public("   ").unwrap_err().is_config());
        assert!(ClientConfig::public("not a url").unwrap_err().is_config());
        assert!(ClientConfig::public("mailto:desk@example.com")
            .unwrap_err()
            .is_config());
    }

    #[test]
    fn test_address_with_query_or_fragment_rejected() {
        assert!(ClientConfig::public("http://x?y=1").unwrap_err().is_config());
        assert!(ClientConfig::public("http://x?").unwrap_err().is_config());
        assert!(ClientConfig::public("http://x#frag").unwrap_err().is_config());
        assert!(ClientConfig::public("https://ttlive.example.com:8443/?a=b")
            .unwrap_err()
            .is_config());
        assert!(ClientConfig::public("https://ttlive.example.com:8443/base").is_ok());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::public("https://ttlive.example.com:8443/").unwrap();
        assert_eq!(config.address(), "https://ttlive.example.com:8443");
    }

    #[test]
    fn test_address_kept_verbatim() {
        let config = ClientConfig::public("https://ttlive.example.com:8443").unwrap();
        assert_eq!(config.address(), "https://ttlive.example.com:8443");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_ADDRESS, "https://ttdemo.example.com:8443"),
            (ENV_ID, "id"),
            (ENV_KEY, "key"),
            (ENV_SECRET, "secret"),
            (ENV_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.address(), "https://ttdemo.example.com:8443");
        assert_eq!(config.credentials().id(), "id");
        assert!(config.credentials().is_complete());
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_public_only() {
        let config = ClientConfig::from_lookup(lookup_from(&[(
            ENV_ADDRESS,
            "https://ttdemo.example.com:8443",
        )]))
        .unwrap();
        assert!(!config.credentials().is_complete());
    }

    #[test]
    fn test_from_lookup_errors() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.is_config());

        let err = ClientConfig::from_lookup(lookup_from(&[
            (ENV_ADDRESS, "https://ttdemo.example.com:8443"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(err.is_config());
    }
}
