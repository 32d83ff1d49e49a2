//! IBM Cloud Logs Router v3 client.

pub mod models;
pub mod options;
pub mod regions;
pub mod routing;

pub use models::{
    AssociatedTarget, AssociationReason, CrnPrototype, Destination, DestinationQueryResult,
    InclusionFilter, MigrationResult, Route, RouteCollection, Rule, RulePrototype, Settings,
    Target, TargetCollection, TargetIdentity, TargetReference, TargetType,
};
pub use options::{
    CreateRouteOptions, CreateTargetOptions, MigrateActionsOptions, QueryDestinationsOptions,
    UpdateRouteOptions, UpdateSettingsOptions, UpdateTargetOptions,
};
pub use regions::service_url_for_region;
pub use routing::preview;

use std::time::Duration;
use tracing::info;

use crate::api::{BaseService, Error, RequestBuilder, ServiceOptions};
use crate::config::external::ServiceProperties;

pub const DEFAULT_SERVICE_URL: &str = "https://api.au-syd.logs-router.cloud.ibm.com/v3";
pub const DEFAULT_SERVICE_NAME: &str = "logs_router";

/// Client for targets, routes, settings and destination queries.
#[derive(Debug, Clone)]
pub struct LogsRouterClient {
    service: BaseService,
}

impl LogsRouterClient {
    pub fn new(options: ServiceOptions) -> Result<Self, Error> {
        Ok(LogsRouterClient {
            service: BaseService::new(DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_URL, options)?,
        })
    }

    pub fn from_properties(properties: &ServiceProperties) -> Result<Self, Error> {
        Self::new(properties.service_options()?)
    }

    /// Configure from `LOGS_ROUTER_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_properties(&ServiceProperties::from_env(DEFAULT_SERVICE_NAME)?)
    }

    /// A clone whose operations give up after `deadline`.
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        LogsRouterClient {
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
        let request = RequestBuilder::post("/targets", "create_target").json(options)?;
        let target: Target = self.service.execute(request).await?.json()?;
        info!(target_id = %target.id, "Created target");
        Ok(target)
    }

    pub async fn list_targets(&self) -> Result<TargetCollection, Error> {
        let request = RequestBuilder::get("/targets", "list_targets");
        self.service.execute(request).await?.json()
    }

    pub async fn get_target(&self, id: &str) -> Result<Target, Error> {
        let request = RequestBuilder::get("/targets/{id}", "get_target").path_param("id", id)?;
        self.service.execute(request).await?.json()
    }

    pub async fn update_target(&self, options: &UpdateTargetOptions) -> Result<Target, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::patch("/targets/{id}", "update_target")
            .path_param("id", options.id.as_str())?
            .json(options)?;
        self.service.execute(request).await?.json()
    }

    pub async fn delete_target(&self, id: &str) -> Result<(), Error> {
        let request =
            RequestBuilder::delete("/targets/{id}", "delete_target").path_param("id", id)?;
        self.service.execute(request).await?;
        info!(target_id = id, "Deleted target");
        Ok(())
    }

    pub async fn create_route(&self, options: &CreateRouteOptions) -> Result<Route, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::post("/routes", "create_route").json(options)?;
        let route: Route = self.service.execute(request).await?.json()?;
        info!(route_id = %route.id, rules = route.rules.len(), "Created route");
        Ok(route)
    }

    pub async fn list_routes(&self) -> Result<RouteCollection, Error> {
        let request = RequestBuilder::get("/routes", "list_routes");
        self.service.execute(request).await?.json()
    }

    pub async fn get_route(&self, id: &str) -> Result<Route, Error> {
        let request = RequestBuilder::get("/routes/{id}", "get_route").path_param("id", id)?;
        self.service.execute(request).await?.json()
    }

    pub async fn update_route(&self, options: &UpdateRouteOptions) -> Result<Route, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::patch("/routes/{id}", "update_route")
            .path_param("id", options.id.as_str())?
            .json(options)?;
        self.service.execute(request).await?.json()
    }

    pub async fn delete_route(&self, id: &str) -> Result<(), Error> {
        let request = RequestBuilder::delete("/routes/{id}", "delete_route").path_param("id", id)?;
        self.service.execute(request).await?;
        info!(route_id = id, "Deleted route");
        Ok(())
    }

    pub async fn get_settings(&self) -> Result<Settings, Error> {
        let request = RequestBuilder::get("/settings", "get_settings");
        self.service.execute(request).await?.json()
    }

    pub async fn update_settings(&self, options: &UpdateSettingsOptions) -> Result<Settings, Error> {
        self.service.check(options)?;
        let request = RequestBuilder::patch("/settings", "update_settings").json(options)?;
        self.service.execute(request).await?.json()
    }

    /// Which targets would receive events from each CRN, and why.
    pub async fn query_destinations(
        &self,
        options: &QueryDestinationsOptions,
    ) -> Result<DestinationQueryResult, Error> {
        self.service.check(options)?;
        let request =
            RequestBuilder::post("/destinations/query", "query_destinations").json(options)?;
        self.service.execute(request).await?.json()
    }

    pub async fn migrate(&self, options: &MigrateActionsOptions) -> Result<MigrationResult, Error> {
        self.service.check(options)?;
        let request =
            RequestBuilder::post("/migrate", "migrate").query("action", options.action.as_str());
        let result: MigrationResult = self.service.execute(request).await?.json()?;
        info!(action = %options.action, api_version = result.api_version, "Migration action applied");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NoAuthAuthenticator;

    #[test]
    fn test_defaults() {
        let client = LogsRouterClient::new(ServiceOptions::new(NoAuthAuthenticator)).unwrap();
        assert_eq!(client.service().service_url(), DEFAULT_SERVICE_URL);
        assert_eq!(client.service().service_name(), "logs_router");
    }

    #[test]
    fn test_region_url() {
        let url = service_url_for_region("us-south").unwrap();
        let client =
            LogsRouterClient::new(ServiceOptions::new(NoAuthAuthenticator).url(url)).unwrap();
        assert_eq!(
            client.service().service_url(),
            "https://api.us-south.logs-router.cloud.ibm.com/v3"
        );
    }

    #[tokio::test]
    async fn test_validation_happens_before_sending() {
        let mut client = LogsRouterClient::new(ServiceOptions::new(NoAuthAuthenticator)).unwrap();
        client.service_mut().set_service_url("").unwrap();

        let err = client
            .create_target(&CreateTargetOptions::new("", "crn:v1:x:public:logs:us-south:a/1:2::"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = client.get_target("").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = client.list_targets().await.unwrap_err();
        assert!(matches!(err, Error::ServiceUrlMissing));
    }
}
