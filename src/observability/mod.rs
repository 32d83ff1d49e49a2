pub mod metrics;
pub mod tracing;

pub use metrics::ClientMetrics;
pub use tracing::init_tracing;
