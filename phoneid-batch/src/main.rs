//! PhoneID Batch CLI Application
//!
//! Reads phone numbers from a CSV or text file, looks every number up with the
//! TeleSign PhoneID API through phoneid-batch-lib, and writes a CSV report.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use phoneid_batch_lib::config::parse_timeout_string;
use phoneid_batch_lib::utils::{DEFAULT_MAX_DIGITS, DEFAULT_MIN_DIGITS};
use phoneid_batch_lib::{
    load_env_config, merge_addons, parse_addons, read_numbers, validate_identifiers,
    write_csv_file, ConfigManager, Credentials, Dispatcher, EnvConfig, FileConfig, HttpTransport,
    NumberFilter, PhoneIdError, Product, RateLimiter, ReportRow, RequestConfig, DEFAULT_BASE_URL,
};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Exit code for configuration, credential and input errors.
const EXIT_FATAL: i32 = 2;

const DEFAULT_OUTPUT: &str = "phoneid_results.csv";

/// CLI arguments for phoneid-batch
#[derive(Parser, Debug)]
#[command(name = "phoneid-batch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Look up phone numbers in bulk with the TeleSign PhoneID API")]
#[command(
    long_about = "Look up phone numbers in bulk with the TeleSign PhoneID API.\n\nCredentials are read from TELE_SIGN_CUSTOMER_ID and TELE_SIGN_API_KEY. Calls are retried on 429/5xx and network errors, optionally paced by a global TPS limit, and every number ends up as one row of the CSV report."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// CSV file (first column) or text file with one phone number per line
    #[arg(value_name = "INPUT", help_heading = "Input")]
    pub input: PathBuf,

    /// Minimum digits for a valid number (default: 8)
    #[arg(long = "min-digits", value_name = "N", help_heading = "Input")]
    pub min_digits: Option<usize>,

    /// Maximum digits for a valid number (default: 15)
    #[arg(long = "max-digits", value_name = "N", help_heading = "Input")]
    pub max_digits: Option<usize>,

    /// Keep numbers outside the digit bounds instead of skipping them
    #[arg(long = "no-skip-invalid", help_heading = "Input")]
    pub no_skip_invalid: bool,

    /// PhoneID product: standard (POST with addons) or live (GET)
    #[arg(long = "product", value_name = "PRODUCT", help_heading = "Request")]
    pub product: Option<String>,

    /// Extra addons, comma or semicolon separated (standard product only)
    #[arg(long = "addons", value_name = "LIST", help_heading = "Request")]
    pub addons: Option<String>,

    /// JSON file with an addon array or {"addons": [...]}
    #[arg(long = "addons-file", value_name = "FILE", help_heading = "Request")]
    pub addons_file: Option<PathBuf>,

    /// Do not request the default addons (contact, number_deactivation, porting_history)
    #[arg(long = "no-default-addons", help_heading = "Request")]
    pub no_default_addons: bool,

    /// Use case code sent with every request
    #[arg(long = "ucid", value_name = "CODE", help_heading = "Request")]
    pub ucid: Option<String>,

    /// API base URL (default: https://rest-ww.telesign.com)
    #[arg(long = "base-url", value_name = "URL", help_heading = "Request")]
    pub base_url: Option<String>,

    /// HTTP/HTTPS proxy URL
    #[arg(long = "proxy", value_name = "URL", help_heading = "Request")]
    pub proxy: Option<String>,

    /// Max concurrent requests (default: 5; 0 is treated as 1)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// Global requests-per-second limit across all workers (0 disables)
    #[arg(long = "tps-limit", value_name = "TPS", help_heading = "Performance")]
    pub tps_limit: Option<f64>,

    /// Per-request timeout in seconds, e.g. 15, 0.5, 30s, 2m (default: 15)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Retries on 429/5xx and network errors (default: 3)
    #[arg(long = "max-retries", value_name = "N", help_heading = "Performance")]
    pub max_retries: Option<u32>,

    /// Backoff base in seconds; retry i waits backoff * 2^i (default: 1.0)
    #[arg(long = "backoff", value_name = "SECONDS", help_heading = "Performance")]
    pub backoff: Option<f64>,

    /// Output CSV path
    #[arg(
        short = 'o',
        long = "out",
        value_name = "FILE",
        default_value = DEFAULT_OUTPUT,
        help_heading = "Output"
    )]
    pub out: PathBuf,

    /// Suppress the header and summary
    #[arg(short = 'q', long = "quiet", help_heading = "Output")]
    pub quiet: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Configuration")]
    pub verbose: u8,
}

/// Fully resolved run settings after config file, environment and CLI.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    base_url: String,
    product: Product,
    timeout: Duration,
    concurrency: usize,
    max_retries: u32,
    backoff: f64,
    tps_limit: Option<f64>,
    ucid: Option<String>,
    include_default_addons: bool,
    addons: Vec<String>,
    min_digits: usize,
    max_digits: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            product: Product::Standard,
            timeout: Duration::from_secs(15),
            concurrency: 5,
            max_retries: 3,
            backoff: 1.0,
            tps_limit: None,
            ucid: None,
            include_default_addons: true,
            addons: Vec::new(),
            min_digits: DEFAULT_MIN_DIGITS,
            max_digits: DEFAULT_MAX_DIGITS,
        }
    }
}

impl Settings {
    /// Immutable per-run request configuration shared by all workers.
    fn request_config(&self) -> Result<RequestConfig, PhoneIdError> {
        let backoff = Duration::try_from_secs_f64(self.backoff).map_err(|e| {
            PhoneIdError::config(format!("Invalid backoff '{}': {}", self.backoff, e))
        })?;

        Ok(RequestConfig::default()
            .with_base_url(self.base_url.clone())
            .with_product(self.product)
            .with_timeout(self.timeout)
            .with_max_retries(self.max_retries)
            .with_backoff_base(backoff)
            .with_ucid(self.ucid.clone())
            .with_addons(merge_addons(&self.addons, self.include_default_addons)))
    }

    fn number_filter(&self, skip_invalid: bool) -> NumberFilter {
        NumberFilter {
            min_digits: self.min_digits,
            max_digits: self.max_digits,
            skip_invalid,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(EXIT_FATAL);
    }

    if let Err(e) = run_batch(args).await {
        eprintln!("Error: {}", e);
        process::exit(EXIT_FATAL);
    }
}

/// Install the stderr tracing subscriber; `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let (Some(min), Some(max)) = (args.min_digits, args.max_digits) {
        if min > max {
            return Err(format!(
                "--min-digits ({}) cannot exceed --max-digits ({})",
                min, max
            ));
        }
    }

    if let Some(product) = &args.product {
        product.parse::<Product>().map_err(|e| e.to_string())?;
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use seconds like '15', '0.5', '30s' or minutes like '2m'",
                timeout
            ));
        }
    }

    if let Some(backoff) = args.backoff {
        if !backoff.is_finite() || backoff < 0.0 {
            return Err(format!("Backoff must be >= 0 seconds, got {}", backoff));
        }
    }

    if let Some(tps) = args.tps_limit {
        if !tps.is_finite() {
            return Err(format!("Invalid --tps-limit {}", tps));
        }
    }

    Ok(())
}

/// Main batch logic
async fn run_batch(args: Args) -> Result<(), PhoneIdError> {
    let env_config = load_env_config();
    let file_config = load_file_config(&args, &env_config)?;
    let settings = build_settings(&args, file_config, &env_config)?;

    let credentials = Credentials::from_env()?;
    tracing::debug!(customer_id = credentials.customer_id(), "loaded credentials");

    let filter = settings.number_filter(!args.no_skip_invalid);
    let parsed = read_numbers(&args.input, &filter)?;
    if !parsed.skipped.is_empty() {
        tracing::warn!(
            skipped = parsed.skipped.len(),
            "skipped invalid phone numbers (use --no-skip-invalid to keep them)"
        );
    }
    validate_identifiers(&parsed.numbers)?;

    let request_config = settings.request_config()?;
    let transport = HttpTransport::with_proxy(&credentials, args.proxy.as_deref())?;
    let limiter = RateLimiter::new(settings.tps_limit);
    let dispatcher = Dispatcher::from_parts(
        Arc::new(transport),
        Arc::new(limiter),
        request_config,
        settings.concurrency,
    );

    let phone_count = parsed.numbers.len();
    if !args.quiet {
        ui::print_header(
            phone_count,
            &settings.product.to_string(),
            dispatcher.concurrency(),
            settings.tps_limit,
        );
    }

    let spinner = if args.quiet {
        None
    } else {
        ui::Spinner::start(format!("Looking up {} numbers...", phone_count))
    };

    let start_time = Instant::now();
    let outcomes = dispatcher.run(&parsed.numbers).await;
    let duration = start_time.elapsed();

    if let Some(s) = spinner {
        s.stop().await;
    }

    let rows: Vec<ReportRow> = outcomes.iter().map(ReportRow::from).collect();
    write_csv_file(&args.out, &rows)?;
    println!(
        "Wrote {} results to: {}",
        rows.len(),
        absolute_path(&args.out).display()
    );

    if !args.quiet {
        ui::print_summary(&outcomes.summary(), duration);
        ui::print_failure_summary(&outcomes);
    }

    Ok(())
}

/// Load the config file named by `--config` / `PHONEID_CONFIG`, or discover one.
fn load_file_config(args: &Args, env_config: &EnvConfig) -> Result<FileConfig, PhoneIdError> {
    let config_manager = ConfigManager::new(args.verbose > 0);

    match args.config.as_ref().or(env_config.config.as_ref()) {
        Some(path) => {
            tracing::info!(path = %path, "using explicit config file");
            config_manager.load_file(path).map_err(|e| {
                PhoneIdError::config(format!("Failed to load config file '{}': {}", path, e))
            })
        }
        None => config_manager.discover_and_load(),
    }
}

/// Build run settings.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (PHONEID_*)
/// 3. Config file (explicit, or local > global > XDG)
/// 4. Built-in defaults
fn build_settings(
    args: &Args,
    file_config: FileConfig,
    env_config: &EnvConfig,
) -> Result<Settings, PhoneIdError> {
    let settings = merge_file_config_into_settings(Settings::default(), file_config)?;
    let settings = apply_environment_config(settings, env_config);
    let settings = apply_cli_args_to_settings(settings, args)?;

    if settings.min_digits > settings.max_digits {
        return Err(PhoneIdError::config(format!(
            "min_digits ({}) cannot exceed max_digits ({})",
            settings.min_digits, settings.max_digits
        )));
    }
    if !settings.base_url.starts_with("http://") && !settings.base_url.starts_with("https://") {
        return Err(PhoneIdError::config(format!(
            "Base URL must start with http:// or https://, got '{}'",
            settings.base_url
        )));
    }

    Ok(settings)
}

/// Merge FileConfig into Settings
fn merge_file_config_into_settings(
    mut settings: Settings,
    file_config: FileConfig,
) -> Result<Settings, PhoneIdError> {
    let Some(defaults) = file_config.defaults else {
        return Ok(settings);
    };

    if let Some(base_url) = defaults.base_url {
        settings.base_url = base_url;
    }
    if let Some(product) = defaults.product {
        settings.product = product.parse()?;
    }
    if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
        settings.timeout = timeout;
    }
    if let Some(concurrency) = defaults.concurrency {
        settings.concurrency = concurrency;
    }
    if let Some(max_retries) = defaults.max_retries {
        settings.max_retries = max_retries;
    }
    if let Some(backoff) = defaults.backoff {
        settings.backoff = backoff;
    }
    if let Some(tps) = defaults.tps_limit {
        settings.tps_limit = Some(tps);
    }
    if let Some(ucid) = defaults.ucid {
        settings.ucid = Some(ucid);
    }
    if let Some(include) = defaults.include_default_addons {
        settings.include_default_addons = include;
    }
    if let Some(addons) = defaults.addons {
        settings.addons = addons;
    }
    if let Some(min_digits) = defaults.min_digits {
        settings.min_digits = min_digits;
    }
    if let Some(max_digits) = defaults.max_digits {
        settings.max_digits = max_digits;
    }

    Ok(settings)
}

/// Apply PHONEID_* environment variables to settings.
fn apply_environment_config(mut settings: Settings, env_config: &EnvConfig) -> Settings {
    if let Some(base_url) = &env_config.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(product) = env_config.product {
        settings.product = product;
    }
    if let Some(timeout) = env_config.timeout.as_deref().and_then(parse_timeout_string) {
        settings.timeout = timeout;
    }
    if let Some(concurrency) = env_config.concurrency {
        settings.concurrency = concurrency;
    }
    if let Some(max_retries) = env_config.max_retries {
        settings.max_retries = max_retries;
    }
    if let Some(backoff) = env_config.backoff {
        settings.backoff = backoff;
    }
    if let Some(tps) = env_config.tps_limit {
        settings.tps_limit = Some(tps);
    }
    if let Some(ucid) = &env_config.ucid {
        settings.ucid = Some(ucid.clone());
    }

    settings
}

/// Apply CLI arguments to settings (highest precedence).
///
/// Only flags the user actually passed override earlier layers.
fn apply_cli_args_to_settings(mut settings: Settings, args: &Args) -> Result<Settings, PhoneIdError> {
    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(product) = &args.product {
        settings.product = product.parse()?;
    }
    if let Some(timeout) = args.timeout.as_deref().and_then(parse_timeout_string) {
        settings.timeout = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }
    if let Some(max_retries) = args.max_retries {
        settings.max_retries = max_retries;
    }
    if let Some(backoff) = args.backoff {
        settings.backoff = backoff;
    }
    if let Some(tps) = args.tps_limit {
        settings.tps_limit = Some(tps);
    }
    if let Some(ucid) = &args.ucid {
        settings.ucid = Some(ucid.clone());
    }
    if args.no_default_addons {
        settings.include_default_addons = false;
    }
    if let Some(min_digits) = args.min_digits {
        settings.min_digits = min_digits;
    }
    if let Some(max_digits) = args.max_digits {
        settings.max_digits = max_digits;
    }

    // Addons only apply to standard calls; live lookups never read them
    if settings.product == Product::Standard {
        // Addons given on the command line replace those from the config file
        let custom_addons = parse_addons(args.addons.as_deref(), args.addons_file.as_deref())?;
        if !custom_addons.is_empty() {
            settings.addons = custom_addons;
        }
    } else if args.addons.is_some() || args.addons_file.is_some() {
        tracing::warn!("--addons and --addons-file are ignored for the live product");
    }

    Ok(settings)
}

fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phoneid_batch_lib::DefaultsConfig;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["phoneid-batch", "numbers.csv"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn file_config(defaults: DefaultsConfig) -> FileConfig {
        FileConfig {
            defaults: Some(defaults),
        }
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.out, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(args.verbose, 0);

        let settings = build_settings(&args, FileConfig::default(), &EnvConfig::default()).unwrap();
        assert_eq!(settings, Settings::default());

        let config = settings.request_config().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.product, Product::Standard);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff_base, Duration::from_secs(1));
        assert_eq!(
            config.addons,
            vec!["contact", "number_deactivation", "porting_history"]
        );
    }

    #[test]
    fn test_concurrency_is_coerced_not_rejected() {
        assert!(validate_args(&args(&["-c", "0"])).is_ok());
        assert!(validate_args(&args(&["-c", "500"])).is_ok());

        let settings =
            build_settings(&args(&["-c", "0"]), FileConfig::default(), &EnvConfig::default())
                .unwrap();
        assert_eq!(settings.concurrency, 0);

        let transport = HttpTransport::new(&Credentials::new("customer", "secret")).unwrap();
        let dispatcher = Dispatcher::from_parts(
            Arc::new(transport),
            Arc::new(RateLimiter::unlimited()),
            settings.request_config().unwrap(),
            settings.concurrency,
        );
        assert_eq!(dispatcher.concurrency(), 1);
    }

    #[test]
    fn test_fractional_timeouts_accepted() {
        assert!(validate_args(&args(&["--timeout", "15.0"])).is_ok());
        assert!(validate_args(&args(&["--timeout", "0.5"])).is_ok());

        let settings = build_settings(
            &args(&["--timeout", "0.5"]),
            FileConfig::default(),
            &EnvConfig::default(),
        )
        .unwrap();
        assert_eq!(settings.timeout, Duration::from_millis(500));

        let env = EnvConfig {
            timeout: Some("15.0".to_string()),
            ..Default::default()
        };
        let settings = build_settings(&args(&[]), FileConfig::default(), &env).unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(15));

        let file = file_config(DefaultsConfig {
            timeout: Some("2.5".to_string()),
            ..Default::default()
        });
        let settings = build_settings(&args(&[]), file, &EnvConfig::default()).unwrap();
        assert_eq!(settings.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_validate_args_rejects_bad_values() {
        assert!(validate_args(&args(&["--min-digits", "12", "--max-digits", "10"])).is_err());
        assert!(validate_args(&args(&["--product", "premium"])).is_err());
        assert!(validate_args(&args(&["--timeout", "soon"])).is_err());
        assert!(validate_args(&args(&["--timeout", "0s"])).is_err());
        assert!(validate_args(&args(&["--backoff=-1"])).is_err());
        assert!(validate_args(&args(&["--tps-limit", "inf"])).is_err());
    }

    #[test]
    fn test_validate_args_accepts_full_invocation() {
        let args = args(&[
            "--product",
            "live",
            "--timeout",
            "2m",
            "--backoff",
            "0.5",
            "--tps-limit",
            "0",
            "-vv",
            "--quiet",
        ]);
        assert!(validate_args(&args).is_ok());
        assert_eq!(args.verbose, 2);
        assert!(args.quiet);
    }

    #[test]
    fn test_precedence_file_env_cli() {
        let file = file_config(DefaultsConfig {
            base_url: Some("https://file.example.com".to_string()),
            concurrency: Some(10),
            max_retries: Some(1),
            ucid: Some("FILE".to_string()),
            ..Default::default()
        });
        let env = EnvConfig {
            concurrency: Some(20),
            ucid: Some("ENV".to_string()),
            ..Default::default()
        };
        let args = args(&["--ucid", "CLI"]);

        let settings = build_settings(&args, file, &env).unwrap();

        assert_eq!(settings.base_url, "https://file.example.com"); // file only
        assert_eq!(settings.max_retries, 1); // file only
        assert_eq!(settings.concurrency, 20); // env beats file
        assert_eq!(settings.ucid.as_deref(), Some("CLI")); // CLI beats env
    }

    #[test]
    fn test_cli_addons_replace_file_addons() {
        let file = file_config(DefaultsConfig {
            addons: Some(vec!["subscriber_status".to_string()]),
            ..Default::default()
        });

        let settings =
            build_settings(&args(&[]), file.clone(), &EnvConfig::default()).unwrap();
        assert_eq!(settings.addons, vec!["subscriber_status"]);

        let settings = build_settings(
            &args(&["--addons", "device_info; contact", "--no-default-addons"]),
            file,
            &EnvConfig::default(),
        )
        .unwrap();
        assert_eq!(settings.addons, vec!["device_info", "contact"]);
        assert_eq!(
            settings.request_config().unwrap().addons,
            vec!["device_info", "contact"]
        );
    }

    #[test]
    fn test_default_addons_merged_first() {
        let settings = build_settings(
            &args(&["--addons", "contact,subscriber_status"]),
            FileConfig::default(),
            &EnvConfig::default(),
        )
        .unwrap();

        assert_eq!(
            settings.request_config().unwrap().addons,
            vec![
                "contact",
                "number_deactivation",
                "porting_history",
                "subscriber_status"
            ]
        );
    }

    #[test]
    fn test_timeout_backoff_and_product_conversion() {
        let settings = build_settings(
            &args(&["--timeout", "2m", "--backoff", "0.25", "--product", "LIVE"]),
            FileConfig::default(),
            &EnvConfig::default(),
        )
        .unwrap();
        let config = settings.request_config().unwrap();

        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.backoff_base, Duration::from_millis(250));
        assert_eq!(config.product, Product::Live);
    }

    #[test]
    fn test_invalid_resolved_settings() {
        let file = file_config(DefaultsConfig {
            min_digits: Some(10),
            ..Default::default()
        });
        let err = build_settings(&args(&["--max-digits", "9"]), file, &EnvConfig::default())
            .unwrap_err();
        assert!(matches!(err, PhoneIdError::Config { .. }));

        let err = build_settings(
            &args(&["--base-url", "ftp://example.com"]),
            FileConfig::default(),
            &EnvConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PhoneIdError::Config { .. }));
    }

    #[test]
    fn test_missing_addons_file_is_fatal() {
        let err = build_settings(
            &args(&["--addons-file", "/nonexistent/addons.json"]),
            FileConfig::default(),
            &EnvConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PhoneIdError::File { .. }));
    }

    #[test]
    fn test_live_product_skips_addons_file() {
        let settings = build_settings(
            &args(&[
                "--product",
                "live",
                "--addons-file",
                "/nonexistent/addons.json",
                "--addons",
                "device_info",
            ]),
            FileConfig::default(),
            &EnvConfig::default(),
        )
        .unwrap();
        assert_eq!(settings.product, Product::Live);
        assert!(settings.addons.is_empty());

        let env = EnvConfig {
            product: Some(Product::Live),
            ..Default::default()
        };
        let settings = build_settings(
            &args(&["--addons-file", "/nonexistent/addons.json"]),
            FileConfig::default(),
            &env,
        )
        .unwrap();
        assert_eq!(settings.product, Product::Live);
    }

    #[test]
    fn test_number_filter() {
        let settings = build_settings(
            &args(&["--min-digits", "10", "--max-digits", "12"]),
            FileConfig::default(),
            &EnvConfig::default(),
        )
        .unwrap();

        let filter = settings.number_filter(false);
        assert_eq!(filter.min_digits, 10);
        assert_eq!(filter.max_digits, 12);
        assert!(!filter.skip_invalid);
    }
}
