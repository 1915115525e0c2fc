//! HMAC request signing for the TickTrader Web API
//!
//! The server recomputes the signature from the `Authorization` header and the
//! request it received, so the payload layout below is bit-exact:
//!
//! ```text
//! message   = timestamp + id + key + method + url + body
//! signature = base64(HMAC-SHA256(secret, message))
//! header    = "HMAC {id}:{key}:{timestamp}:{signature}"
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use ticktrader_core::{Result, TickTraderError};
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Scheme prefix of the `Authorization` header
pub const AUTHORIZATION_SCHEME: &str = "HMAC";

// ============================================================================
// Credentials
// ============================================================================

/// Web API credentials: id, key and secret issued by the server
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    id: String,
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(id: impl Into<String>, key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Empty credentials, good for public endpoints only
    pub fn anonymous() -> Self {
        Self::new("", "", "")
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Check that every field is present
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(TickTraderError::config("Web API id should be valid"));
        }
        if self.key.is_empty() {
            return Err(TickTraderError::config("Web API key should be valid"));
        }
        if self.secret.is_empty() {
            return Err(TickTraderError::config("Web API secret should be valid"));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Signing
// ============================================================================

/// Everything that goes into one request signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignablePayload<'a> {
    pub timestamp_millis: i64,
    pub id: &'a str,
    pub key: &'a str,
    pub method: &'a str,
    pub url: &'a str,
    pub body: &'a str,
}

impl<'a> SignablePayload<'a> {
    pub fn new(
        credentials: &'a Credentials,
        method: &'a str,
        url: &'a str,
        body: Option<&'a str>,
        timestamp_millis: i64,
    ) -> Self {
        Self {
            timestamp_millis,
            id: credentials.id.as_str(),
            key: credentials.key.as_str(),
            method,
            url,
            body: body.unwrap_or(""),
        }
    }

    /// Concatenation of all fields, no separators
    pub fn message(&self) -> String {
        format!(
            "{}{}{}{}{}{}",
            self.timestamp_millis, self.id, self.key, self.method, self.url, self.body
        )
    }
}

/// Compute the base64 HMAC-SHA256 of a payload
fn compute_signature(secret: &str, payload: &SignablePayload<'_>) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| TickTraderError::signing(format!("Failed to create HMAC: {}", e)))?;

    mac.update(payload.message().as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the `Authorization` header value for a request
///
/// `url` must be the exact URL sent on the wire (address, path and query) and
/// `body` the exact body string, if any.
pub fn sign(
    method: &str,
    url: &str,
    body: Option<&str>,
    credentials: &Credentials,
    timestamp_millis: i64,
) -> Result<String> {
    credentials.validate()?;

    let payload = SignablePayload::new(credentials, method, url, body, timestamp_millis);

    debug!(
        "Signing request: method={}, url={}, body_len={}, timestamp={}",
        method,
        url,
        payload.body.len(),
        timestamp_millis
    );

    let signature = compute_signature(&credentials.secret, &payload)?;

    Ok(format!(
        "{} {}:{}:{}:{}",
        AUTHORIZATION_SCHEME, credentials.id, credentials.key, timestamp_millis, signature
    ))
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn current_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> Credentials {
        Credentials::new("A", "B", "C")
    }

    #[test]
    fn test_payload_concatenation_order() {
        let credentials = test_credentials();
        let payload = SignablePayload::new(
            &credentials,
            "POST",
            "http://x/api/v1/trade",
            Some(r#"{"Id":1}"#),
            1000,
        );
        assert_eq!(
            payload.message(),
            r#"1000ABPOSThttp://x/api/v1/trade{"Id":1}"#
        );
    }

    #[test]
    fn test_sign_known_vector() {
        let header = sign(
            "GET",
            "http://x/api/v1/account",
            None,
            &test_credentials(),
            1000,
        )
        .unwrap();

        // base64(HMAC-SHA256(key = "C", msg = "1000ABGEThttp://x/api/v1/account"))
        assert_eq!(
            header,
            "HMAC A:B:1000:Jp6Daa3arar8KkxwSYT8p2uwtHp5gG/SNzG/EdnPvZQ="
        );
    }

    #[test]
    fn test_raw_digest_matches_reference() {
        let credentials = test_credentials();
        let payload =
            SignablePayload::new(&credentials, "GET", "http://x/api/v1/account", None, 1000);

        let mut mac = HmacSha256::new_from_slice(b"C").unwrap();
        mac.update(payload.message().as_bytes());
        assert_eq!(
            hex::encode(mac.finalize().into_bytes()),
            "269e8369addaadaafc2a4c704984fca76bb0b47a79806fd23731bf11d9cfbd94"
        );
    }

    #[test]
    fn test_empty_body_equals_no_body() {
        let credentials = test_credentials();
        let url = "http://x/api/v1/account";
        assert_eq!(
            sign("GET", url, None, &credentials, 1000).unwrap(),
            sign("GET", url, Some(""), &credentials, 1000).unwrap()
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let credentials = Credentials::new("webapi-id", "webapi-key", "webapi-secret");
        let body = r#"{"Type":"Market","Side":"Buy","Symbol":"EURUSD","Amount":1000.0}"#;
        let url = "https://ttlive.example.com:8443/api/v1/trade";

        let first = sign("POST", url, Some(body), &credentials, 1234567890123).unwrap();
        let second = sign("POST", url, Some(body), &credentials, 1234567890123).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            "HMAC webapi-id:webapi-key:1234567890123:bbnZACiQdXs4G/XxEIV8+udTTIy+0UkjZCieDueoq3U="
        );

        let later = sign("POST", url, Some(body), &credentials, 1234567890124).unwrap();
        assert_ne!(first, later);
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let url = "http://x/api/v1/account";
        for credentials in [
            Credentials::new("", "B", "C"),
            Credentials::new("A", "", "C"),
            Credentials::new("A", "B", ""),
            Credentials::anonymous(),
        ] {
            let err = sign("GET", url, None, &credentials, 1000).unwrap_err();
            assert!(err.is_config(), "unexpected error: {}", err);
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("my-id", "my-key", "my-secret");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("my-id"));
        assert!(!debug.contains("my-key"));
        assert!(!debug.contains("my-secret"));
    }

    #[test]
    fn test_current_timestamp_is_millis() {
        // Anything after 2020 in milliseconds has 13 digits
        let now = current_timestamp_millis();
        assert!(now > 1_577_836_800_000);
        assert_eq!(now.to_string().len(), 13);
    }
}
