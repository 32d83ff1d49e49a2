use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_ENCODING, CONTENT_TYPE,
};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use super::auth::Authenticator;
use super::error::{ApiError, Error};
use super::request::{parse_service_url, RequestBuilder};
use super::response::DetailedResponse;
use super::retry::{is_retryable_error, is_retryable_status, RetryPolicy};
use crate::domain::Validate;
use crate::observability::ClientMetrics;

const USER_AGENT: &str = concat!("platform-router-rust/", env!("CARGO_PKG_VERSION"));
const ANALYTICS_HEADER: &str = "x-ibmcloud-sdk-analytics";
const CORRELATION_HEADER: &str = "x-correlation-id";

/// Construction options shared by both service clients.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Base URL; the service default is used when unset
    pub url: Option<String>,

    pub authenticator: Arc<dyn Authenticator>,

    /// Per-attempt HTTP timeout
    pub timeout: Option<Duration>,

    /// Budget for a whole operation, retries included
    pub deadline: Option<Duration>,

    /// Retries are disabled when unset
    pub retry: Option<RetryPolicy>,

    /// Gzip-compress request bodies
    pub gzip: bool,

    /// Headers sent with every request
    pub headers: Vec<(String, String)>,
}

impl ServiceOptions {
    pub fn new(authenticator: impl Authenticator + 'static) -> Self {
        ServiceOptions {
            url: None,
            authenticator: Arc::new(authenticator),
            timeout: None,
            deadline: None,
            retry: None,
            gzip: false,
            headers: Vec::new(),
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// HTTP plumbing behind a service client.
///
/// Clones share the connection pool, the authenticator and the metrics.
#[derive(Debug, Clone)]
pub struct BaseService {
    service_name: &'static str,
    service_url: String,
    http: reqwest::Client,
    authenticator: Arc<dyn Authenticator>,
    default_headers: HeaderMap,
    retry: Option<RetryPolicy>,
    gzip: bool,
    deadline: Option<Duration>,
    metrics: Arc<ClientMetrics>,
}

impl BaseService {
    pub fn new(
        service_name: &'static str,
        default_url: &str,
        options: ServiceOptions,
    ) -> Result<Self, Error> {
        options.authenticator.validate()?;

        let service_url = options.url.unwrap_or_else(|| default_url.to_string());
        parse_service_url(&service_url)?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(BaseService {
            service_name,
            service_url,
            http: builder.build()?,
            authenticator: options.authenticator,
            default_headers: to_header_map(&options.headers)?,
            retry: options.retry,
            gzip: options.gzip,
            deadline: options.deadline,
            metrics: Arc::new(ClientMetrics::new()),
        })
    }

    pub fn service_name(&self) -> &'static str {
        self.service_name
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Point the client at another URL. An empty URL is accepted here and
    /// reported by the next operation.
    pub fn set_service_url(&mut self, url: impl Into<String>) -> Result<(), Error> {
        let url = url.into();
        if !url.is_empty() {
            parse_service_url(&url)?;
        }
        self.service_url = url;
        Ok(())
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    pub fn set_default_headers(&mut self, headers: &[(String, String)]) -> Result<(), Error> {
        self.default_headers = to_header_map(headers)?;
        Ok(())
    }

    pub fn set_gzip(&mut self, enabled: bool) {
        self.gzip = enabled;
    }

    pub fn gzip_enabled(&self) -> bool {
        self.gzip
    }

    /// Enable retries; zero arguments select the defaults.
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.retry = Some(RetryPolicy::new(max_retries, max_interval));
    }

    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry = Some(policy);
    }

    pub fn disable_retries(&mut self) {
        self.retry = None;
    }

    pub fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// A clone whose operations fail with `DeadlineExceeded` after `deadline`.
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        BaseService {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Run local validation, counting failures.
    pub fn check<V: Validate + ?Sized>(&self, value: &V) -> Result<(), Error> {
        value.validate().map_err(|e| {
            self.metrics.record_failure("validation");
            Error::from(e)
        })
    }

    /// Send one logical operation, applying deadline and retry policy.
    pub async fn execute(&self, request: RequestBuilder) -> Result<DetailedResponse, Error> {
        let start = Instant::now();
        self.metrics.record_operation();

        let correlation_id = Uuid::new_v4();
        let span = info_span!(
            "request",
            service = self.service_name,
            operation = request.operation_id,
            correlation_id = %correlation_id,
        );
        let send = self.send_with_retries(request, correlation_id).instrument(span);

        let result = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, send)
                .await
                .unwrap_or(Err(Error::DeadlineExceeded(deadline))),
            None => send.await,
        };

        self.metrics.record_latency(start);
        if let Err(e) = &result {
            self.metrics.record_failure(e.class());
        }
        result
    }

    async fn send_with_retries(
        &self,
        request: RequestBuilder,
        correlation_id: Uuid,
    ) -> Result<DetailedResponse, Error> {
        let url = request.resolve_url(&self.service_url)?;
        let headers = self.request_headers(&request, correlation_id).await?;
        let body = self.encode_body(request.body.as_deref())?;

        let mut attempt: u32 = 0;
        loop {
            let retry = self
                .retry
                .as_ref()
                .filter(|policy| attempt < policy.max_retries);

            self.metrics.record_attempt(attempt > 0);
            debug!(method = %request.method, url = %url, attempt, "Sending request");

            let mut builder = self
                .http
                .request(request.method.clone(), url.clone())
                .headers(headers.clone());
            if let Some(body) = &body {
                builder = builder.body(body.clone());
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) => match retry {
                    Some(policy) if is_retryable_error(&e) => {
                        let delay = policy.backoff(attempt);
                        warn!(error = %e, attempt, delay_ms = delay.as_millis() as u64, "Request failed, retrying");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    _ => return Err(e.into()),
                },
            };

            let status = response.status();
            if let Some(policy) = retry.filter(|_| is_retryable_status(status)) {
                let delay = policy.delay_for(attempt, response.headers());
                warn!(status = status.as_u16(), attempt, delay_ms = delay.as_millis() as u64, "Retryable status, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let response_headers = response.headers().clone();
            let body = response.bytes().await?.to_vec();

            if status.is_success() {
                debug!(status = status.as_u16(), bytes = body.len(), "Request succeeded");
                return Ok(DetailedResponse {
                    status,
                    headers: response_headers,
                    body,
                });
            }

            let err = ApiError::from_response(status, &response_headers, &body);
            debug!(status = status.as_u16(), trace = ?err.trace, message = %err.message, "Service returned an error");
            return Err(err.into());
        }
    }

    async fn request_headers(
        &self,
        request: &RequestBuilder,
        correlation_id: Uuid,
    ) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            if self.gzip {
                headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
            }
        }

        let analytics = format!(
            "service_name={};service_version=V3;operation_id={}",
            self.service_name, request.operation_id
        );
        headers.insert(ANALYTICS_HEADER, header_value(&analytics)?);
        headers.insert(CORRELATION_HEADER, header_value(&correlation_id.to_string())?);

        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }

        self.authenticator.authenticate(&mut headers).await?;
        Ok(headers)
    }

    fn encode_body(&self, body: Option<&[u8]>) -> Result<Option<Vec<u8>>, Error> {
        let Some(body) = body else {
            return Ok(None);
        };
        if !self.gzip {
            return Ok(Some(body.to_vec()));
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body).map_err(Error::Encode)?;
        encoder.finish().map(Some).map_err(Error::Encode)
    }
}

fn to_header_map(headers: &[(String, String)]) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(header_name(name)?, header_value(value)?);
    }
    Ok(map)
}

fn header_name(name: &str) -> Result<HeaderName, Error> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| Error::Configuration(format!("invalid header name '{}'", name)))
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::Configuration(format!("invalid header value '{}'", value)))
}
