//! IBM Cloud Metrics Router v3 client.

pub mod models;
pub mod options;
pub mod regions;
pub mod routing;

pub use models::{
    FilterValue, InclusionFilter, Route, RouteCollection, Rule, RulePrototype, Settings, Target,
    TargetCollection, TargetType, Warning, WarningReport,
};
pub use options::{
    CreateRouteOptions, CreateTargetOptions, ReplaceRouteOptions, ReplaceSettingsOptions,
    ReplaceTargetOptions,
};
pub use regions::service_url_for_region;
pub use routing::preview;

use std::time::Duration;
use tracing::{info, warn};

use crate::api::{BaseService, Error, RequestBuilder, ServiceOptions};
use crate::config::external::ServiceProperties;

pub const DEFAULT_SERVICE_URL: &str = "https://au-syd.metrics-router.dev.cloud.ibm.com";
pub const DEFAULT_SERVICE_NAME: &str = "metrics_router";

#[derive(Debug, Clone)]
pub struct MetricsRouterClient {
    service: BaseService,
}

impl MetricsRouterClient {
    pub fn new(options: ServiceOptions) -> Result<Self, Error> {
        Ok(MetricsRouterClient {
            service: BaseService::new(DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_URL, options)?,
        })
    }

    pub fn from_properties(properties: &ServiceProperties) -> Result<Self, Error> {
        Self::new(properties.service_options()?)
    }

    /// Configure from `METRICS_ROUTER_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_properties(&ServiceProperties::from_env(DEFAULT_SERVICE_NAME)?)
    }

    pub fn with_deadline(&self, deadline: Duration) -> Self {
        MetricsRouterClient {
            service: self.service.with_deadline(deadline),
        }
    }

    pub fn service(&self) -> &BaseService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut BaseService {
        &mut self.service
    }

    pub async fn create_target(&self, options: &CreateTargetOptions) -> Result<Target, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::post("/api/v3/targets", "create_target").json(options)?;
        let target: Target = self.service.execute(request).await?.json()?;
        info!(target_id = %target.id, "Created target");
        Ok(target)
    }

    pub async fn list_targets(&self) -> Result<TargetCollection, Error> {
        let request = RequestBuilder::get("/api/v3/targets", "list_targets");
        self.service.execute(request).await?.json()
    }

    pub async fn get_target(&self, id: &str) -> Result<Target, Error> {
        let request =
            RequestBuilder::get("/api/v3/targets/{id}", "get_target").path_param("id", id)?;
        self.service.execute(request).await?.json()
    }

    pub async fn replace_target(&self, options: &ReplaceTargetOptions) -> Result<Target, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::put("/api/v3/targets/{id}", "replace_target")
            .path_param("id", options.id.as_str())?
            .json(options)?;
        self.service.execute(request).await?.json()
    }

    /// Delete a target. A report comes back when routes or the default
    /// targets still reference it; an empty 204 yields `None`.
    pub async fn delete_target(&self, id: &str) -> Result<Option<WarningReport>, Error> {
        let request =
            RequestBuilder::delete("/api/v3/targets/{id}", "delete_target").path_param("id", id)?;
        let report: Option<WarningReport> = self.service.execute(request).await?.json_opt()?;

        if let Some(report) = report.as_ref().filter(|r| !r.is_empty()) {
            for warning in &report.warnings {
                warn!(target_id = id, code = %warning.code, message = %warning.message, "Target deleted with warning");
            }
        } else {
            info!(target_id = id, "Deleted target");
        }
        Ok(report)
    }

    /// Check the target's write credentials against its destination.
    pub async fn validate_target(&self, id: &str) -> Result<Target, Error> {
        let request = RequestBuilder::post("/api/v3/targets/{id}/validate", "validate_target")
            .path_param("id", id)?;
        let target: Target = self.service.execute(request).await?.json()?;
        info!(target_id = id, status = %target.write_status.status, "Validated target");
        Ok(target)
    }

    pub async fn create_route(&self, options: &CreateRouteOptions) -> Result<Route, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::post("/api/v3/routes", "create_route").json(options)?;
        let route: Route = self.service.execute(request).await?.json()?;
        info!(route_id = %route.id, rules = route.rules.len(), "Created route");
        Ok(route)
    }

    pub async fn list_routes(&self) -> Result<RouteCollection, Error> {
        let request = RequestBuilder::get("/api/v3/routes", "list_routes");
        self.service.execute(request).await?.json()
    }

    pub async fn get_route(&self, id: &str) -> Result<Route, Error> {
        let request =
            RequestBuilder::get("/api/v3/routes/{id}", "get_route").path_param("id", id)?;
        self.service.execute(request).await?.json()
    }

    pub async fn replace_route(&self, options: &ReplaceRouteOptions) -> Result<Route, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::put("/api/v3/routes/{id}", "replace_route")
            .path_param("id", options.id.as_str())?
            .json(options)?;
        self.service.execute(request).await?.json()
    }

    pub async fn delete_route(&self, id: &str) -> Result<(), Error> {
        let request =
            RequestBuilder::delete("/api/v3/routes/{id}", "delete_route").path_param("id", id)?;
        self.service.execute(request).await?;
        info!(route_id = id, "Deleted route");
        Ok(())
    }

    pub async fn get_settings(&self) -> Result<Settings, Error> {
        let request = RequestBuilder::get("/api/v3/settings", "get_settings");
        self.service.execute(request).await?.json()
    }

    pub async fn replace_settings(
        &self,
        options: &ReplaceSettingsOptions,
    ) -> Result<Settings, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::put("/api/v3/settings", "replace_settings").json(options)?;
        self.service.execute(request).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NoAuthAuthenticator;

    #[test]
    fn test_defaults() {
        let client = MetricsRouterClient::new(ServiceOptions::new(NoAuthAuthenticator)).unwrap();
        assert_eq!(client.service().service_url(), DEFAULT_SERVICE_URL);
        assert_eq!(client.service().service_name(), "metrics_router");
    }

    #[tokio::test]
    async fn test_missing_id_is_validation_error() {
        let client = MetricsRouterClient::new(ServiceOptions::new(NoAuthAuthenticator)).unwrap();

        assert!(matches!(client.delete_target("").await, Err(Error::Validation(_))));
        assert!(matches!(client.validate_target("").await, Err(Error::Validation(_))));
        assert!(matches!(
            client
                .replace_settings(&ReplaceSettingsOptions::new("", false))
                .await,
            Err(Error::Validation(_))
        ));
    }
}
