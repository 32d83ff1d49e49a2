pub mod external;

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::api::{Error, RetryPolicy, ServiceOptions};
use crate::{logs_router, metrics_router};
use external::ServiceProperties;

/// Which routing service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ServiceKind {
    #[default]
    Logs,
    Metrics,
}

impl ServiceKind {
    pub fn service_name(&self) -> &'static str {
        match self {
            ServiceKind::Logs => logs_router::DEFAULT_SERVICE_NAME,
            ServiceKind::Metrics => metrics_router::DEFAULT_SERVICE_NAME,
        }
    }

    pub fn region_url(&self, region: &str) -> Result<&'static str, Error> {
        match self {
            ServiceKind::Logs => logs_router::service_url_for_region(region),
            ServiceKind::Metrics => metrics_router::service_url_for_region(region),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line configuration.
///
/// Flags left unset fall back to the `LOGS_ROUTER_*` / `METRICS_ROUTER_*`
/// service properties.
#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// Routing service to address
    #[arg(long, value_enum, default_value = "logs", env = "PLATFORM_ROUTER_SERVICE")]
    pub service: ServiceKind,

    /// Region whose endpoint to use, e.g. us-south or private.eu-de
    #[arg(long, env = "PLATFORM_ROUTER_REGION")]
    pub region: Option<String>,

    /// Explicit service URL (overrides --region)
    #[arg(long, env = "PLATFORM_ROUTER_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Authentication type: iam, bearerToken, basic or noAuth
    #[arg(long, env = "PLATFORM_ROUTER_AUTH_TYPE")]
    pub auth_type: Option<String>,

    /// IAM API key
    #[arg(long, env = "PLATFORM_ROUTER_APIKEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// Pre-issued bearer token
    #[arg(long, env = "PLATFORM_ROUTER_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value = "60", env = "PLATFORM_ROUTER_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Retry attempts for 429 and 5xx responses (0 disables retries)
    #[arg(long, default_value = "0", env = "PLATFORM_ROUTER_MAX_RETRIES")]
    pub max_retries: u32,

    /// Upper bound on the delay between retries in seconds
    #[arg(long, default_value = "30", env = "PLATFORM_ROUTER_MAX_RETRY_INTERVAL_SECS")]
    pub max_retry_interval_secs: u64,

    /// Gzip-compress request bodies
    #[arg(long, default_value = "false", env = "PLATFORM_ROUTER_GZIP")]
    pub gzip: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "PLATFORM_ROUTER_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Print client metrics to stderr on exit
    #[arg(long, default_value = "false", env = "PLATFORM_ROUTER_PRINT_METRICS")]
    pub print_metrics: bool,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_retry_interval(&self) -> Duration {
        Duration::from_secs(self.max_retry_interval_secs)
    }

    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        (self.max_retries > 0).then(|| RetryPolicy::new(self.max_retries, self.max_retry_interval()))
    }

    /// Service URL from `--service-url`, else from `--region`.
    pub fn resolved_url(&self) -> Result<Option<String>, Error> {
        if let Some(url) = &self.service_url {
            return Ok(Some(url.clone()));
        }
        match &self.region {
            Some(region) => Ok(Some(self.service.region_url(region)?.to_string())),
            None => Ok(None),
        }
    }

    /// Client options from the environment's service properties overlaid
    /// with these flags.
    pub fn service_options(&self) -> Result<ServiceOptions, Error> {
        let properties = ServiceProperties::from_env(self.service.service_name())?;
        self.overlay(properties)
    }

    /// Apply flags on top of externally supplied properties.
    pub fn overlay(&self, mut properties: ServiceProperties) -> Result<ServiceOptions, Error> {
        if self.auth_type.is_some() {
            properties.auth_type = self.auth_type.clone();
        }
        if self.apikey.is_some() {
            properties.apikey = self.apikey.clone();
        }
        if self.bearer_token.is_some() {
            properties.bearer_token = self.bearer_token.clone();
        }
        if let Some(url) = self.resolved_url()? {
            properties.url = Some(url);
        }

        let mut options = properties.service_options()?.timeout(self.timeout());
        if let Some(policy) = self.retry_policy() {
            options = options.retry(policy);
        }
        if self.gzip {
            options = options.gzip(true);
        }
        Ok(options)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service: ServiceKind::Logs,
            region: None,
            service_url: None,
            auth_type: None,
            apikey: None,
            bearer_token: None,
            timeout_secs: 60,
            max_retries: 0,
            max_retry_interval_secs: 30,
            gzip: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            print_metrics: false,
        }
    }
}
