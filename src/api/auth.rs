use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

use super::error::Error;

/// Default IAM token endpoint host.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Longest time a cached IAM token is trusted, whatever `expires_in` says.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Supported authentication schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    NoAuth,
    BearerToken,
    Basic,
    Iam,
}

impl AuthType {
    /// Parse the external-configuration spelling (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "noauth" => Some(AuthType::NoAuth),
            "bearertoken" => Some(AuthType::BearerToken),
            "basic" => Some(AuthType::Basic),
            "iam" => Some(AuthType::Iam),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::NoAuth => "noAuth",
            AuthType::BearerToken => "bearerToken",
            AuthType::Basic => "basic",
            AuthType::Iam => "iam",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supplies credentials for outgoing requests.
///
/// Credential contents are never inspected by the client; failures to
/// obtain one surface as [`Error::Authentication`].
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    fn auth_type(&self) -> AuthType;

    /// Check configuration before the first request.
    fn validate(&self) -> Result<(), Error>;

    /// Add credentials to the outgoing request headers.
    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), Error>;
}

/// Sends requests without credentials.
#[derive(Debug, Clone, Default)]
pub struct NoAuthAuthenticator;

#[async_trait]
impl Authenticator for NoAuthAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::NoAuth
    }

    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn authenticate(&self, _headers: &mut HeaderMap) -> Result<(), Error> {
        Ok(())
    }
}

/// Sends a caller-managed bearer token.
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    token: String,
}

impl BearerTokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        BearerTokenAuthenticator {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuthenticator")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::BearerToken
    }

    fn validate(&self) -> Result<(), Error> {
        if self.token.is_empty() {
            return Err(Error::Configuration(
                "the bearer token cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", self.token))?);
        Ok(())
    }
}

/// HTTP basic authentication.
#[derive(Clone)]
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        BasicAuthenticator {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::Basic
    }

    fn validate(&self) -> Result<(), Error> {
        check_credential("username", &self.username)?;
        check_credential("password", &self.password)
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        headers.insert(AUTHORIZATION, header_value(&format!("Basic {}", encoded))?);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Exchanges an API key for IAM access tokens and caches them until 80%
/// of their lifetime has passed.
pub struct IamAuthenticator {
    apikey: String,
    url: String,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl IamAuthenticator {
    pub fn new(apikey: impl Into<String>) -> Result<Self, Error> {
        Self::with_url(apikey, DEFAULT_IAM_URL)
    }

    /// Use a non-default token endpoint host.
    pub fn with_url(apikey: impl Into<String>, url: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(IamAuthenticator {
            apikey: apikey.into(),
            url: url.into(),
            http,
            cached: Mutex::new(None),
        })
    }

    fn cached_token(&self) -> Option<String> {
        self.cached
            .lock()
            .as_ref()
            .filter(|t| Instant::now() < t.refresh_at)
            .map(|t| t.access_token.clone())
    }

    async fn request_token(&self) -> Result<CachedToken, Error> {
        let url = format!("{}/identity/token", self.url.trim_end_matches('/'));
        debug!(url = %url, "Requesting IAM access token");

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", IAM_GRANT_TYPE), ("apikey", self.apikey.as_str())])
            .send()
            .await
            .map_err(|e| Error::Authentication(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Authentication(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let token: IamTokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Authentication(format!("invalid token response: {}", e)))?;

        Ok(CachedToken {
            access_token: token.access_token,
            refresh_at: refresh_deadline(Instant::now(), token.expires_in),
        })
    }
}

/// When a token issued at `now` should be replaced: after 80% of its
/// lifetime, capped at [`MAX_TOKEN_LIFETIME`].
fn refresh_deadline(now: Instant, expires_in: u64) -> Instant {
    let lifetime = Duration::from_secs(expires_in)
        .min(MAX_TOKEN_LIFETIME)
        .mul_f64(0.8);
    now.checked_add(lifetime).unwrap_or(now)
}

impl fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("url", &self.url)
            .field("apikey", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for IamAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::Iam
    }

    fn validate(&self) -> Result<(), Error> {
        check_credential("apikey", &self.apikey)
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        let token = match self.cached_token() {
            Some(token) => token,
            None => {
                let fresh = self.request_token().await?;
                let token = fresh.access_token.clone();
                *self.cached.lock() = Some(fresh);
                token
            }
        };
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        Ok(())
    }
}

fn check_credential(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::Configuration(format!("the {} cannot be empty", field)));
    }
    let wrapped = |c: char| matches!(c, '{' | '}' | '"');
    if value.starts_with(wrapped) || value.ends_with(wrapped) {
        return Err(Error::Configuration(format!(
            "the {} cannot be wrapped in braces or quotes",
            field
        )));
    }
    Ok(())
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| Error::Authentication("credential is not a valid header value".to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}
