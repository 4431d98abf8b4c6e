//! Core data types for PhoneID batch runs.
//!
//! This module defines the per-run configuration shared by all workers, the
//! product (call shape) selector, and the `Outcome` produced for every
//! submitted phone number.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::PhoneIdError;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://rest-ww.telesign.com";

/// Addons requested on every standard call unless disabled.
pub const DEFAULT_ADDONS: &[&str] = &["contact", "number_deactivation", "porting_history"];

/// Status code recorded when no HTTP response was ever received.
pub const TRANSPORT_FAILURE_STATUS: i32 = -1;

/// Payload key holding the raw body when it is not valid JSON.
pub const RAW_TEXT_KEY: &str = "raw_text";

/// Payload key holding the error description of a failed call.
pub const ERROR_KEY: &str = "error";

/// Which PhoneID product (and therefore which call shape) to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    /// `POST {base}/v1/phoneid/{phone}` with a JSON body carrying addons
    #[default]
    Standard,

    /// `GET {base}/v1/phoneid/live/{phone}` with query parameters
    Live,
}

impl Product {
    /// Path template for this product, relative to the base URL.
    pub fn path(&self, phone: &str) -> String {
        match self {
            Product::Standard => format!("/v1/phoneid/{}", phone),
            Product::Live => format!("/v1/phoneid/live/{}", phone),
        }
    }

    /// Full endpoint URL for `phone`, tolerating a trailing slash on `base_url`.
    pub fn endpoint_url(&self, base_url: &str, phone: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path(phone))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::Standard => write!(f, "standard"),
            Product::Live => write!(f, "live"),
        }
    }
}

impl FromStr for Product {
    type Err = PhoneIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Product::Standard),
            "live" => Ok(Product::Live),
            other => Err(PhoneIdError::config(format!(
                "Unknown product '{}', expected 'standard' or 'live'",
                other
            ))),
        }
    }
}

/// Immutable configuration for one batch run.
///
/// Built once before dispatch and shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// API base URL, e.g. `https://rest-ww.telesign.com`
    pub base_url: String,

    /// Which call shape to use
    pub product: Product,

    /// Per-request transport timeout
    /// Default: 15 seconds
    pub timeout: Duration,

    /// Retries after the first attempt on 429/5xx/transport errors
    /// Default: 3
    pub max_retries: u32,

    /// Base of the exponential backoff (`base * 2^i` before retry `i`)
    /// Default: 1 second
    pub backoff_base: Duration,

    /// Optional use-case code sent as `ucid`
    pub ucid: Option<String>,

    /// Final, de-duplicated addon list for standard calls
    pub addons: Vec<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            product: Product::Standard,
            timeout: Duration::from_secs(15),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
            ucid: None,
            addons: DEFAULT_ADDONS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl RequestConfig {
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.product = product;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn with_ucid<S: Into<String>>(mut self, ucid: Option<S>) -> Self {
        self.ucid = ucid.map(Into::into).filter(|u: &String| !u.is_empty());
        self
    }

    pub fn with_addons(mut self, addons: Vec<String>) -> Self {
        self.addons = addons;
        self
    }

    /// Full endpoint URL for one phone number.
    pub fn endpoint_url(&self, phone: &str) -> String {
        self.product.endpoint_url(&self.base_url, phone)
    }
}

/// Terminal result of processing one phone number.
///
/// Created exactly once per submitted identifier and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    phone: String,
    status_code: i32,
    response: Value,
}

impl Outcome {
    /// Build an outcome from an HTTP response.
    ///
    /// A body that is not valid JSON is kept under `raw_text` instead of
    /// failing the call.
    pub fn from_response(phone: impl Into<String>, status_code: u16, body: &str) -> Self {
        let response = serde_json::from_str::<Value>(body)
            .unwrap_or_else(|_| json!({ RAW_TEXT_KEY: body }));
        Self {
            phone: phone.into(),
            status_code: i32::from(status_code),
            response,
        }
    }

    /// Build an outcome for a call that never produced an HTTP response.
    pub fn failure(phone: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            phone: phone.into(),
            status_code: TRANSPORT_FAILURE_STATUS,
            response: json!({ ERROR_KEY: error.to_string() }),
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn response(&self) -> &Value {
        &self.response
    }

    /// True when no HTTP response was received.
    pub fn is_transport_failure(&self) -> bool {
        self.status_code == TRANSPORT_FAILURE_STATUS
    }

    /// Error description for failed outcomes, if present.
    pub fn error_message(&self) -> Option<&str> {
        self.response.get(ERROR_KEY).and_then(Value::as_str)
    }

    /// `response.status.description`, when the payload carries one.
    pub fn status_description(&self) -> Option<&str> {
        self.response
            .as_object()?
            .get("status")?
            .as_object()?
            .get("description")?
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(
            Product::Standard.endpoint_url("https://api.example.com/", "15551234567"),
            "https://api.example.com/v1/phoneid/15551234567"
        );
        assert_eq!(
            Product::Live.endpoint_url("https://api.example.com", "15551234567"),
            "https://api.example.com/v1/phoneid/live/15551234567"
        );
    }

    #[test]
    fn test_product_from_str() {
        assert_eq!("standard".parse::<Product>().unwrap(), Product::Standard);
        assert_eq!(" LIVE ".parse::<Product>().unwrap(), Product::Live);
        assert!("premium".parse::<Product>().is_err());
    }

    #[test]
    fn test_outcome_from_json_response() {
        let outcome =
            Outcome::from_response("15551234567", 200, r#"{"status":{"description":"ok"}}"#);
        assert_eq!(outcome.status_code(), 200);
        assert_eq!(outcome.status_description(), Some("ok"));
        assert!(!outcome.is_transport_failure());
    }

    #[test]
    fn test_outcome_keeps_raw_text_on_invalid_json() {
        let outcome = Outcome::from_response("15551234567", 502, "<html>Bad Gateway</html>");
        assert_eq!(outcome.status_code(), 502);
        assert_eq!(
            outcome.response()[RAW_TEXT_KEY],
            Value::String("<html>Bad Gateway</html>".to_string())
        );
        assert_eq!(outcome.status_description(), None);
    }

    #[test]
    fn test_status_description_requires_nested_object() {
        let outcome = Outcome::from_response("1", 200, r#"{"status":"ok"}"#);
        assert_eq!(outcome.status_description(), None);

        let outcome = Outcome::from_response("1", 200, r#"[1, 2, 3]"#);
        assert_eq!(outcome.status_description(), None);
    }

    #[test]
    fn test_failure_outcome() {
        let outcome = Outcome::failure("15551234567", "connection refused");
        assert_eq!(outcome.status_code(), TRANSPORT_FAILURE_STATUS);
        assert!(outcome.is_transport_failure());
        assert_eq!(outcome.error_message(), Some("connection refused"));
    }

    #[test]
    fn test_ucid_empty_is_none() {
        let config = RequestConfig::default().with_ucid(Some(""));
        assert_eq!(config.ucid, None);
        let config = RequestConfig::default().with_ucid(Some("BACF"));
        assert_eq!(config.ucid.as_deref(), Some("BACF"));
    }
}
