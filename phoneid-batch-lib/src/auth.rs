//! Credential loading and HTTP Basic authentication for the PhoneID API.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::env;
use std::fmt;

use crate::error::PhoneIdError;

/// Environment variable holding the TeleSign customer id.
pub const CUSTOMER_ID_VAR: &str = "TELE_SIGN_CUSTOMER_ID";

/// Environment variable holding the TeleSign API key.
pub const API_KEY_VAR: &str = "TELE_SIGN_API_KEY";

/// Customer id / API key pair.
#[derive(Clone)]
pub struct Credentials {
    customer_id: String,
    api_key: String,
}

impl Credentials {
    pub fn new(customer_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Read both credentials from the environment.
    ///
    /// Missing or empty variables are a fatal validation error.
    pub fn from_env() -> Result<Self, PhoneIdError> {
        let customer_id = required_var(CUSTOMER_ID_VAR)?;
        let api_key = required_var(API_KEY_VAR)?;
        Ok(Self::new(customer_id, api_key))
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// `Basic base64(customer_id:api_key)`
    pub fn authorization_value(&self) -> String {
        let encoded = BASE64_STANDARD.encode(format!("{}:{}", self.customer_id, self.api_key));
        format!("Basic {}", encoded)
    }

    /// Header map carrying the `Authorization` header.
    pub fn auth_headers(&self) -> Result<HeaderMap, PhoneIdError> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&self.authorization_value()).map_err(|e| {
            PhoneIdError::config(format!("failed to build Authorization header: {}", e))
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("customer_id", &self.customer_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn required_var(key: &str) -> Result<String, PhoneIdError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PhoneIdError::missing_credential(key)),
    }
}
