use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::domain::ValidationError;

/// Errors returned by every client operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("service URL is missing")]
    ServiceUrlMissing,

    #[error("invalid service URL '{url}': {reason}")]
    InvalidServiceUrl { url: String, reason: String },

    #[error("service URL for region '{0}' not found")]
    UnknownRegion(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("operation deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] std::io::Error),

    #[error("failed to decode response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP {0} response has no body")]
    EmptyBody(u16),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Server-reported error, if this is one.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of a server-reported or undecodable response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(e) => Some(e.status),
            Error::Decode { status, .. } | Error::EmptyBody(status) => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api().map(|e| e.kind() == ApiErrorKind::NotFound).unwrap_or(false)
    }

    /// Failure class used for metrics and logging.
    pub fn class(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Configuration(_)
            | Error::ServiceUrlMissing
            | Error::InvalidServiceUrl { .. }
            | Error::UnknownRegion(_) => "configuration",
            Error::Authentication(_) => "authentication",
            Error::DeadlineExceeded(_) => "deadline",
            Error::Transport(_) | Error::Encode(_) | Error::Decode { .. } | Error::EmptyBody(_) => {
                "transport"
            }
            Error::Api(_) => "server",
        }
    }
}

/// Classification of a server-reported failure by status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    TooManyRequests,
    Server,
    Other,
}

/// One entry of the structured `errors` array in an error body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub more_info: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorDetail>,

    #[serde(default)]
    trace: Option<String>,

    #[serde(default)]
    error: Option<String>,

    #[serde(default)]
    message: Option<String>,

    #[serde(default, rename = "errorMessage")]
    error_message: Option<String>,
}

/// Non-2xx response from the service.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    /// Server trace id from the body or the `transaction-id` header
    pub trace: Option<String>,
    pub errors: Vec<ErrorDetail>,
}

impl ApiError {
    pub(crate) fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

        let message = parsed
            .errors
            .first()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .or(parsed.message)
            .or(parsed.error_message)
            .or(parsed.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });

        let trace = parsed.trace.or_else(|| {
            ["transaction-id", "x-request-id"]
                .iter()
                .find_map(|h| headers.get(*h).and_then(|v| v.to_str().ok()))
                .map(str::to_string)
        });

        ApiError {
            status: status.as_u16(),
            message,
            trace,
            errors: parsed.errors,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self.status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            429 => ApiErrorKind::TooManyRequests,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Other,
        }
    }

    /// First structured error code, e.g. `target_in_use`.
    pub fn code(&self) -> Option<&str> {
        self.errors.first().map(|e| e.code.as_str())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)?;
        if let Some(trace) = &self.trace {
            write!(f, " (trace: {})", trace)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
