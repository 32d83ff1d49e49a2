pub mod api;
pub mod config;
pub mod definitions;
pub mod domain;
pub mod logs_router;
pub mod metrics_router;
pub mod observability;
pub mod rules;

pub use api::{Authenticator, BaseService, Error, ServiceOptions};
pub use config::Config;
pub use domain::{Crn, Validate, ValidationError};
pub use logs_router::LogsRouterClient;
pub use metrics_router::MetricsRouterClient;
pub use rules::{plan_delivery, DeliveryPlan, EventFilter, RoutingRule};
