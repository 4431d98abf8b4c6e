//! # PhoneID Batch Library
//!
//! Concurrent, rate-limited batch client for the TeleSign PhoneID API.
//!
//! A batch of phone numbers is fanned out to a fixed pool of workers. Every
//! HTTP attempt, retries included, passes through one shared limiter that
//! spaces requests strictly `1/tps` apart with no burst allowance. 429, 5xx
//! and transport errors are retried with exponential backoff. Each submitted
//! number yields exactly one [`Outcome`], and a failure on one number never
//! aborts the batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use phoneid_batch_lib::{Credentials, Dispatcher, HttpTransport, RateLimiter, RequestConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::from_env()?;
//!     let transport = Arc::new(HttpTransport::new(&credentials)?);
//!     let limiter = Arc::new(RateLimiter::new(Some(10.0)));
//!     let dispatcher = Dispatcher::from_parts(transport, limiter, RequestConfig::default(), 5);
//!
//!     let outcomes = dispatcher.run(&["15551234567".to_string()]).await;
//!     for outcome in &outcomes {
//!         println!("{} -> {}", outcome.phone(), outcome.status_code());
//!     }
//!     Ok(())
//! }
//! ```

// Re-export main public API types and functions
pub use addons::{merge_addons, parse_addons, read_addons_file};
pub use auth::{Credentials, API_KEY_VAR, CUSTOMER_ID_VAR};
pub use collector::{BatchSummary, OutcomeSet, OutcomeSink, ResultCollector};
pub use config::{load_env_config, ConfigManager, DefaultsConfig, EnvConfig, FileConfig};
pub use dispatcher::Dispatcher;
pub use error::{PhoneIdError, TransportError};
pub use executor::{RequestExecutor, RetryPolicy};
pub use rate_limiter::RateLimiter;
pub use report::{write_csv, write_csv_file, ReportRow, CSV_HEADER};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
pub use types::{Outcome, Product, RequestConfig, DEFAULT_ADDONS, DEFAULT_BASE_URL};
pub use utils::{normalize_phone, read_numbers, validate_identifiers, NumberFilter, ParsedNumbers};

// Public modules
pub mod addons;
pub mod config;
pub mod executor;
pub mod report;
pub mod request;
pub mod utils;

// Internal modules
mod auth;
mod collector;
mod dispatcher;
mod error;
mod rate_limiter;
mod transport;
mod types;

#[cfg(test)]
mod test_support;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, PhoneIdError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
