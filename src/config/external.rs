use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::api::auth::{
    AuthType, Authenticator, BasicAuthenticator, BearerTokenAuthenticator, IamAuthenticator,
    NoAuthAuthenticator, DEFAULT_IAM_URL,
};
use crate::api::{Error, RetryPolicy, ServiceOptions};

/// Service settings supplied from outside the program: `<SERVICE>_URL`,
/// `<SERVICE>_AUTH_TYPE`, `<SERVICE>_APIKEY` and friends, or the same keys
/// in a TOML/YAML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceProperties {
    pub url: Option<String>,
    pub auth_type: Option<String>,
    pub apikey: Option<String>,
    pub bearer_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub auth_url: Option<String>,
    pub enable_gzip: Option<bool>,
    pub enable_retries: Option<bool>,
    pub max_retries: Option<u32>,
    /// Maximum retry interval in seconds
    pub retry_interval: Option<u64>,
}

/// Environment prefix for a service name, e.g. `logs_router` -> `LOGS_ROUTER`.
pub fn env_prefix(service_name: &str) -> String {
    service_name.to_uppercase().replace('-', "_")
}

impl ServiceProperties {
    /// Read `<SERVICE>_*` variables from the process environment.
    pub fn from_env(service_name: &str) -> Result<Self, Error> {
        let source = config::Config::builder()
            .add_source(environment(service_name))
            .build()
            .map_err(config_error)?;
        Self::from_config(&source)
    }

    /// Read a properties file, with `<SERVICE>_*` variables taking precedence.
    pub fn from_file(service_name: &str, path: impl AsRef<Path>) -> Result<Self, Error> {
        let source = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment(service_name))
            .build()
            .map_err(config_error)?;
        Self::from_config(&source)
    }

    /// Extract properties from an already-assembled configuration.
    pub fn from_config(source: &config::Config) -> Result<Self, Error> {
        source.clone().try_deserialize().map_err(config_error)
    }

    /// Resolve the configured authentication scheme.
    ///
    /// Without an explicit `auth_type`, the scheme is inferred from which
    /// credentials are present.
    pub fn authenticator(&self) -> Result<Arc<dyn Authenticator>, Error> {
        let auth_type = match self.auth_type.as_deref() {
            Some(name) => AuthType::from_str(name).ok_or_else(|| {
                Error::Configuration(format!("unrecognized authentication type '{}'", name))
            })?,
            None if self.apikey.is_some() => AuthType::Iam,
            None if self.bearer_token.is_some() => AuthType::BearerToken,
            None if self.username.is_some() => AuthType::Basic,
            None => {
                return Err(Error::Configuration(
                    "no authentication type or credentials configured".to_string(),
                ))
            }
        };

        let authenticator: Arc<dyn Authenticator> = match auth_type {
            AuthType::NoAuth => Arc::new(NoAuthAuthenticator),
            AuthType::BearerToken => Arc::new(BearerTokenAuthenticator::new(
                self.bearer_token.clone().unwrap_or_default(),
            )),
            AuthType::Basic => Arc::new(BasicAuthenticator::new(
                self.username.clone().unwrap_or_default(),
                self.password.clone().unwrap_or_default(),
            )),
            AuthType::Iam => Arc::new(IamAuthenticator::with_url(
                self.apikey.clone().unwrap_or_default(),
                self.auth_url.as_deref().unwrap_or(DEFAULT_IAM_URL),
            )?),
        };

        authenticator.validate()?;
        Ok(authenticator)
    }

    /// Build client options from these properties.
    pub fn service_options(&self) -> Result<ServiceOptions, Error> {
        let retry = if self.enable_retries.unwrap_or(false) {
            Some(RetryPolicy::new(
                self.max_retries.unwrap_or(0),
                Duration::from_secs(self.retry_interval.unwrap_or(0)),
            ))
        } else {
            None
        };

        Ok(ServiceOptions {
            url: self.url.clone().filter(|u| !u.is_empty()),
            authenticator: self.authenticator()?,
            timeout: None,
            deadline: None,
            retry,
            gzip: self.enable_gzip.unwrap_or(false),
            headers: Vec::new(),
        })
    }
}

fn environment(service_name: &str) -> config::Environment {
    config::Environment::with_prefix(&env_prefix(service_name)).try_parsing(true)
}

fn config_error(e: config::ConfigError) -> Error {
    Error::Configuration(e.to_string())
}
