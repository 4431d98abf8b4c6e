//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, reading
//! `PHONEID_*` environment variables, and merging file configurations with
//! proper precedence rules.

use crate::error::PhoneIdError;
use crate::types::Product;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "PHONEID_CONFIG";

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// `standard` or `live`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,

    /// Per-request timeout ("15", "0.5", "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Worker count; 0 is treated as 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Retries after the first attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Backoff base in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff: Option<f64>,

    /// Requests per second across all workers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tps_limit: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ucid: Option<String>,

    /// Include the built-in addon list on standard calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_default_addons: Option<bool>,

    /// Extra addons for standard calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addons: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_digits: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_digits: Option<usize>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which config files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if parsing or validation fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, PhoneIdError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PhoneIdError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PhoneIdError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            PhoneIdError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is loaded first, then the global file in `$HOME`, then the
    /// local file in the working directory; later files override earlier ones.
    pub fn discover_and_load(&self) -> Result<FileConfig, PhoneIdError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                }
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            for (i, path) in loaded_files.iter().enumerate() {
                tracing::info!(
                    path = %path.display(),
                    precedence = i,
                    "merged config file (higher precedence wins)"
                );
            }
        }

        Ok(merged_config)
    }

    /// Local configuration file in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./phoneid-batch.toml", "./.phoneid-batch.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Global configuration file in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".phoneid-batch.toml", "phoneid-batch.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// XDG configuration file.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("phoneid-batch").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(lower_defaults), Some(higher_defaults)) => {
                    Some(DefaultsConfig {
                        base_url: higher_defaults.base_url.or(lower_defaults.base_url),
                        product: higher_defaults.product.or(lower_defaults.product),
                        timeout: higher_defaults.timeout.or(lower_defaults.timeout),
                        concurrency: higher_defaults.concurrency.or(lower_defaults.concurrency),
                        max_retries: higher_defaults.max_retries.or(lower_defaults.max_retries),
                        backoff: higher_defaults.backoff.or(lower_defaults.backoff),
                        tps_limit: higher_defaults.tps_limit.or(lower_defaults.tps_limit),
                        ucid: higher_defaults.ucid.or(lower_defaults.ucid),
                        include_default_addons: higher_defaults
                            .include_default_addons
                            .or(lower_defaults.include_default_addons),
                        addons: higher_defaults.addons.or(lower_defaults.addons),
                        min_digits: higher_defaults.min_digits.or(lower_defaults.min_digits),
                        max_digits: higher_defaults.max_digits.or(lower_defaults.max_digits),
                    })
                }
                (None, Some(higher_defaults)) => Some(higher_defaults),
                (Some(lower_defaults), None) => Some(lower_defaults),
                (None, None) => None,
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), PhoneIdError> {
        let Some(defaults) = &config.defaults else {
            return Ok(());
        };

        if let Some(timeout_str) = &defaults.timeout {
            if parse_timeout_string(timeout_str).is_none() {
                return Err(PhoneIdError::config(format!(
                    "Invalid timeout format '{}'. Use seconds like '15', '0.5', '30s' or minutes like '2m'",
                    timeout_str
                )));
            }
        }

        if let Some(product) = &defaults.product {
            product.parse::<Product>()?;
        }

        if let Some(backoff) = defaults.backoff {
            if !is_valid_seconds(backoff) {
                return Err(PhoneIdError::config(format!(
                    "Invalid backoff '{}', must be a non-negative number of seconds",
                    backoff
                )));
            }
        }

        if let (Some(min), Some(max)) = (defaults.min_digits, defaults.max_digits) {
            if min > max {
                return Err(PhoneIdError::config(format!(
                    "min_digits ({}) cannot exceed max_digits ({})",
                    min, max
                )));
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via `PHONEID_*`
/// environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub base_url: Option<String>,
    pub product: Option<Product>,
    pub timeout: Option<String>,
    pub concurrency: Option<usize>,
    pub max_retries: Option<u32>,
    pub backoff: Option<f64>,
    pub tps_limit: Option<f64>,
    pub ucid: Option<String>,
    pub config: Option<String>,
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    // PHONEID_BASE_URL - API base URL
    if let Some(base_url) = non_empty("PHONEID_BASE_URL") {
        tracing::debug!(PHONEID_BASE_URL = %base_url, "using environment value");
        env_config.base_url = Some(base_url.trim().to_string());
    }

    // PHONEID_PRODUCT - standard or live
    if let Some(val) = non_empty("PHONEID_PRODUCT") {
        match val.parse::<Product>() {
            Ok(product) => env_config.product = Some(product),
            Err(_) => {
                tracing::warn!("Invalid PHONEID_PRODUCT='{}', use standard or live", val);
            }
        }
    }

    // PHONEID_TIMEOUT - per-request timeout
    if let Some(timeout_str) = non_empty("PHONEID_TIMEOUT") {
        if parse_timeout_string(&timeout_str).is_some() {
            env_config.timeout = Some(timeout_str);
        } else {
            tracing::warn!(
                "Invalid PHONEID_TIMEOUT='{}', use seconds like '15', '0.5', '30s' or '2m'",
                timeout_str
            );
        }
    }

    // PHONEID_CONCURRENCY - worker count
    if let Some(val) = non_empty("PHONEID_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(concurrency) => env_config.concurrency = Some(concurrency),
            Err(_) => {
                tracing::warn!("Invalid PHONEID_CONCURRENCY='{}', must be a whole number", val);
            }
        }
    }

    // PHONEID_MAX_RETRIES - retries after the first attempt
    if let Some(val) = non_empty("PHONEID_MAX_RETRIES") {
        match val.trim().parse::<u32>() {
            Ok(retries) => env_config.max_retries = Some(retries),
            Err(_) => {
                tracing::warn!("Invalid PHONEID_MAX_RETRIES='{}', must be >= 0", val);
            }
        }
    }

    // PHONEID_BACKOFF - backoff base in seconds
    if let Some(val) = non_empty("PHONEID_BACKOFF") {
        match val.trim().parse::<f64>() {
            Ok(secs) if is_valid_seconds(secs) => env_config.backoff = Some(secs),
            _ => {
                tracing::warn!("Invalid PHONEID_BACKOFF='{}', must be seconds >= 0", val);
            }
        }
    }

    // PHONEID_TPS_LIMIT - requests per second; 0 disables
    if let Some(val) = non_empty("PHONEID_TPS_LIMIT") {
        match val.trim().parse::<f64>() {
            Ok(tps) if tps.is_finite() => env_config.tps_limit = Some(tps),
            _ => {
                tracing::warn!("Invalid PHONEID_TPS_LIMIT='{}', must be a number", val);
            }
        }
    }

    // PHONEID_UCID - use case code
    if let Some(ucid) = non_empty("PHONEID_UCID") {
        env_config.ucid = Some(ucid.trim().to_string());
    }

    // PHONEID_CONFIG - explicit config file
    if let Some(config_path) = non_empty(CONFIG_PATH_VAR) {
        env_config.config = Some(config_path);
    }

    env_config
}

/// Parse a timeout string like "15", "0.5", "30s", "1.5m" into a `Duration`.
///
/// A bare number is taken as seconds and fractions are allowed. Zero,
/// negative and unrepresentable values yield `None`.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let (number, scale) = if let Some(secs) = timeout_str.strip_suffix('s') {
        (secs, 1.0)
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        (mins, 60.0)
    } else {
        (timeout_str.as_str(), 1.0)
    };

    let secs = number.trim().parse::<f64>().ok()? * scale;
    if secs.is_nan() || secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

fn is_valid_seconds(secs: f64) -> bool {
    secs.is_finite() && secs >= 0.0
}
