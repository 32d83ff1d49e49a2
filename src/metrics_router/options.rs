//! Request payloads. Every write is a full replacement (PUT).

use serde::{Deserialize, Serialize};

use super::models::RulePrototype;
use crate::domain::validation::{check_region_permitted, require, validate_name};
use crate::domain::{Crn, Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTargetOptions {
    pub name: String,

    /// CRN of the Sysdig Monitor instance receiving the metrics
    pub destination_crn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl CreateTargetOptions {
    pub fn new(name: impl Into<String>, destination_crn: impl Into<String>) -> Self {
        CreateTargetOptions {
            name: name.into(),
            destination_crn: destination_crn.into(),
            region: None,
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceTargetOptions {
    #[serde(skip)]
    pub id: String,

    pub name: String,
    pub destination_crn: String,
}

impl ReplaceTargetOptions {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        destination_crn: impl Into<String>,
    ) -> Self {
        ReplaceTargetOptions {
            id: id.into(),
            name: name.into(),
            destination_crn: destination_crn.into(),
        }
    }
}

impl Validate for ReplaceTargetOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        require("id", &self.id)?;
        validate_name("name", &self.name)?;
        require("destination_crn", &self.destination_crn)?;
        Crn::parse(self.destination_crn.as_str())?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRouteOptions {
    pub name: String,
    pub rules: Vec<RulePrototype>,
}

impl CreateRouteOptions {
    pub fn new(name: impl Into<String>, rules: Vec<RulePrototype>) -> Self {
        CreateRouteOptions {
            name: name.into(),
            rules,
        }
    }
}

impl Validate for CreateRouteOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name("name", &self.name)?;
        self.rules.iter().try_for_each(RulePrototype::check)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRouteOptions {
    #[serde(skip)]
    pub id: String,

    pub name: String,
    pub rules: Vec<RulePrototype>,
}

impl ReplaceRouteOptions {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rules: Vec<RulePrototype>) -> Self {
        ReplaceRouteOptions {
            id: id.into(),
            name: name.into(),
            rules,
        }
    }
}

impl Validate for ReplaceRouteOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        require("id", &self.id)?;
        validate_name("name", &self.name)?;
        self.rules.iter().try_for_each(RulePrototype::check)
    }
}

/// Full settings document. Lists left as `None` are omitted from the body;
/// `Some(vec![])` clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceSettingsOptions {
    pub metadata_region_primary: String,
    pub private_api_endpoint_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_targets: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permitted_target_regions: Option<Vec<String>>,
}

impl ReplaceSettingsOptions {
    pub fn new(metadata_region_primary: impl Into<String>, private_api_endpoint_only: bool) -> Self {
        ReplaceSettingsOptions {
            metadata_region_primary: metadata_region_primary.into(),
            private_api_endpoint_only,
            default_targets: None,
            permitted_target_regions: None,
        }
    }

    pub fn default_targets(mut self, ids: Vec<String>) -> Self {
        self.default_targets = Some(ids);
        self
    }

    pub fn permitted_target_regions(mut self, regions: Vec<String>) -> Self {
        self.permitted_target_regions = Some(regions);
        self
    }
}

impl Validate for ReplaceSettingsOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        require("metadata_region_primary", &self.metadata_region_primary)?;
        for id in self.default_targets.iter().flatten() {
            require("default_targets[]", id)?;
        }
        for region in self.permitted_target_regions.iter().flatten() {
            require("permitted_target_regions[]", region)?;
        }
        Ok(())
    }
}
