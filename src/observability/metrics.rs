use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Request counters shared by every clone of a service client.
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Logical operations started
    pub operations_total: AtomicU64,

    /// HTTP attempts sent, including retries
    pub attempts_total: AtomicU64,
    pub retries_total: AtomicU64,

    /// Failed operations by class
    pub failures_validation: AtomicU64,
    pub failures_transport: AtomicU64,
    pub failures_server: AtomicU64,
    pub failures_deadline: AtomicU64,
    pub failures_other: AtomicU64,

    /// Operation latency buckets
    pub latency_under_50ms: AtomicU64,
    pub latency_50_250ms: AtomicU64,
    pub latency_250ms_1s: AtomicU64,
    pub latency_1_5s: AtomicU64,
    pub latency_over_5s: AtomicU64,
}

impl ClientMetrics {
    pub fn new() -> Self {
        ClientMetrics::default()
    }

    pub fn record_operation(&self) {
        self.operations_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_attempt(&self, retry: bool) {
        self.attempts_total.fetch_add(1, Ordering::Relaxed);
        if retry {
            self.retries_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a failed operation by its error class.
    pub fn record_failure(&self, class: &str) {
        let counter = match class {
            "validation" => &self.failures_validation,
            "transport" => &self.failures_transport,
            "server" => &self.failures_server,
            "deadline" => &self.failures_deadline,
            _ => &self.failures_other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record operation latency.
    pub fn record_latency(&self, start: Instant) {
        let millis = start.elapsed().as_millis() as u64;

        let bucket = if millis < 50 {
            &self.latency_under_50ms
        } else if millis < 250 {
            &self.latency_50_250ms
        } else if millis < 1000 {
            &self.latency_250ms_1s
        } else if millis < 5000 {
            &self.latency_1_5s
        } else {
            &self.latency_over_5s
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus text format.
    pub fn to_prometheus(&self, service: &str) -> String {
        format!(
            r#"# HELP platform_router_operations_total Client operations started
# TYPE platform_router_operations_total counter
platform_router_operations_total{{service="{service}"}} {}

# HELP platform_router_attempts_total HTTP attempts sent
# TYPE platform_router_attempts_total counter
platform_router_attempts_total{{service="{service}"}} {}

# HELP platform_router_retries_total HTTP attempts that were retries
# TYPE platform_router_retries_total counter
platform_router_retries_total{{service="{service}"}} {}

# HELP platform_router_failures_total Failed operations by class
# TYPE platform_router_failures_total counter
platform_router_failures_total{{service="{service}",class="validation"}} {}
platform_router_failures_total{{service="{service}",class="transport"}} {}
platform_router_failures_total{{service="{service}",class="server"}} {}
platform_router_failures_total{{service="{service}",class="deadline"}} {}
platform_router_failures_total{{service="{service}",class="other"}} {}

# HELP platform_router_latency_bucket Operation latency histogram
# TYPE platform_router_latency_bucket counter
platform_router_latency_bucket{{service="{service}",le="0.05"}} {}
platform_router_latency_bucket{{service="{service}",le="0.25"}} {}
platform_router_latency_bucket{{service="{service}",le="1"}} {}
platform_router_latency_bucket{{service="{service}",le="5"}} {}
platform_router_latency_bucket{{service="{service}",le="+Inf"}} {}
"#,
            self.operations_total.load(Ordering::Relaxed),
            self.attempts_total.load(Ordering::Relaxed),
            self.retries_total.load(Ordering::Relaxed),
            self.failures_validation.load(Ordering::Relaxed),
            self.failures_transport.load(Ordering::Relaxed),
            self.failures_server.load(Ordering::Relaxed),
            self.failures_deadline.load(Ordering::Relaxed),
            self.failures_other.load(Ordering::Relaxed),
            self.latency_under_50ms.load(Ordering::Relaxed),
            self.latency_50_250ms.load(Ordering::Relaxed),
            self.latency_250ms_1s.load(Ordering::Relaxed),
            self.latency_1_5s.load(Ordering::Relaxed),
            self.latency_over_5s.load(Ordering::Relaxed),
        )
    }
}
