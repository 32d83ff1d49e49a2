//! Request payloads. Updates use PATCH semantics: only fields that are set
//! are sent, and omitted fields keep their current values.

use serde::{Deserialize, Serialize};

use super::models::{CrnPrototype, RulePrototype, TargetIdentity};
use crate::domain::validation::{check_region_permitted, require, validate_name};
use crate::domain::{Crn, Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTargetOptions {
    pub name: String,

    /// CRN of the Cloud Logs instance receiving the logs
    pub destination_crn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
}

impl CreateTargetOptions {
    pub fn new(name: impl Into<String>, destination_crn: impl Into<String>) -> Self {
        CreateTargetOptions {
            name: name.into(),
            destination_crn: destination_crn.into(),
            region: None,
            managed_by: None,
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn managed_by(mut self, managed_by: impl Into<String>) -> Self {
        self.managed_by = Some(managed_by.into());
        self
    }

    /// Early check against `Settings::permitted_target_regions`.
    pub fn check_region(&self, permitted: &[String]) -> Result<(), ValidationError> {
        match &self.region {
            Some(region) => check_region_permitted(region, permitted),
            None => Ok(()),
        }
    }
}

impl Validate for CreateTargetOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name("name", &self.name)?;
        require("destination_crn", &self.destination_crn)?;
        Crn::parse(self.destination_crn.as_str())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTargetOptions {
    #[serde(skip)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_crn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
}

impl UpdateTargetOptions {
    pub fn new(id: impl Into<String>) -> Self {
        UpdateTargetOptions {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl Validate for UpdateTargetOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        require("id", &self.id)?;
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(crn) = &self.destination_crn {
            Crn::parse(crn.as_str())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRouteOptions {
    pub name: String,

    /// Evaluated in order
    pub rules: Vec<RulePrototype>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
}

impl CreateRouteOptions {
    pub fn new(name: impl Into<String>, rules: Vec<RulePrototype>) -> Self {
        CreateRouteOptions {
            name: name.into(),
            rules,
            managed_by: None,
        }
    }
}

impl Validate for CreateRouteOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name("name", &self.name)?;
        self.rules.iter().try_for_each(RulePrototype::check)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRouteOptions {
    #[serde(skip)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Replaces the whole rule list when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RulePrototype>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
}

impl UpdateRouteOptions {
    pub fn new(id: impl Into<String>) -> Self {
        UpdateRouteOptions {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl Validate for UpdateRouteOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        require("id", &self.id)?;
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(rules) = &self.rules {
            rules.iter().try_for_each(RulePrototype::check)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSettingsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_targets: Option<Vec<TargetIdentity>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permitted_target_regions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_metadata_region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_metadata_region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_api_endpoint_only: Option<bool>,
}

impl Validate for UpdateSettingsOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        for target in self.default_targets.iter().flatten() {
            require("default_targets[].id", &target.id)?;
        }
        for region in self.permitted_target_regions.iter().flatten() {
            require("permitted_target_regions[]", region)?;
        }
        if let Some(region) = &self.primary_metadata_region {
            require("primary_metadata_region", region)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDestinationsOptions {
    pub crns: Vec<CrnPrototype>,
}

impl QueryDestinationsOptions {
    pub fn new<I, S>(crns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryDestinationsOptions {
            crns: crns.into_iter().map(CrnPrototype::new).collect(),
        }
    }
}

impl Validate for QueryDestinationsOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.crns.is_empty() {
            return Err(ValidationError::MissingRequiredField("crns"));
        }
        for crn in &self.crns {
            Crn::parse(crn.crn.as_str())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateActionsOptions {
    /// Sent as the `action` query parameter, e.g. `complete`
    pub action: String,
}

impl MigrateActionsOptions {
    pub fn new(action: impl Into<String>) -> Self {
        MigrateActionsOptions {
            action: action.into(),
        }
    }
}

impl Validate for MigrateActionsOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        require("action", &self.action)
    }
}
