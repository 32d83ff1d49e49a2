use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;

/// Default number of retries when retries are enabled with `0`.
pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Default retry interval cap when retries are enabled with `0`.
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(30);

/// Retry policy for transport-level failures.
///
/// Delay for attempt `n` is `min(initial * multiplier^n, max_interval)`.
/// A `Retry-After` header (seconds) takes precedence, still capped.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_interval: Duration::from_secs(1),
            max_interval: DEFAULT_MAX_RETRY_INTERVAL,
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Zero for either argument selects its default.
    pub fn new(max_retries: u32, max_interval: Duration) -> Self {
        RetryPolicy {
            max_retries: if max_retries == 0 {
                DEFAULT_MAX_RETRIES
            } else {
                max_retries
            },
            max_interval: if max_interval.is_zero() {
                DEFAULT_MAX_RETRY_INTERVAL
            } else {
                max_interval
            },
            ..Default::default()
        }
    }

    pub fn with_initial_interval(mut self, initial: Duration) -> Self {
        self.initial_interval = initial;
        self
    }

    /// Backoff before retry number `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = if self.multiplier.is_finite() && self.multiplier >= 1.0 {
            self.multiplier
        } else {
            1.0
        };
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_interval.as_secs_f64() * multiplier.powi(exponent);
        let max = self.max_interval.as_secs_f64();

        if !secs.is_finite() || secs >= max {
            return self.max_interval;
        }
        Duration::from_secs_f64(secs)
    }

    /// Delay before the next attempt after a retryable response.
    pub fn delay_for(&self, attempt: u32, headers: &HeaderMap) -> Duration {
        parse_retry_after(headers)
            .map(|d| d.min(self.max_interval))
            .unwrap_or_else(|| self.backoff(attempt))
    }
}

/// Status codes worth retrying: 429 and every 5xx except 501.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

/// Transport failures worth retrying. Builder and decode errors are not.
pub fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_zero_selects_defaults() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.max_interval, Duration::from_secs(30));

        let policy = RetryPolicy::new(2, Duration::from_secs(5));
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_growth_and_cap() {
        let policy = RetryPolicy::new(10, Duration::from_secs(5));

        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(5));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_retry_after_header() {
        let policy = RetryPolicy::new(3, Duration::from_secs(10));
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(policy.delay_for(0, &headers), Duration::from_secs(3));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));
        assert_eq!(policy.delay_for(0, &headers), Duration::from_secs(10));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(policy.delay_for(1, &headers), Duration::from_secs(2));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(StatusCode::NOT_IMPLEMENTED));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
    }
}
