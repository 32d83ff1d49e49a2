use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{FilterOperand, FilterOperator, RuleAction, ValidationError, WriteStatus};

/// Destination type of a Logs Router target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetType {
    CloudLogs,
    Other(String),
}

impl From<String> for TargetType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "cloud_logs" => TargetType::CloudLogs,
            _ => TargetType::Other(s),
        }
    }
}

impl From<TargetType> for String {
    fn from(t: TargetType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::CloudLogs => write!(f, "cloud_logs"),
            TargetType::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A configured destination for routed logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub crn: String,
    pub destination_crn: String,
    pub target_type: TargetType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    pub write_status: WriteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// `enterprise` or `account`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<i64>,
}

impl Target {
    /// Reference usable in a rule or in the default-targets list.
    pub fn identity(&self) -> TargetIdentity {
        TargetIdentity::new(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCollection {
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Foreign key to a target, as sent in requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetIdentity {
    pub id: String,
}

impl TargetIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        TargetIdentity { id: id.into() }
    }
}

/// Target summary embedded in routes and settings responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReference {
    pub id: String,
    pub crn: String,
    pub name: String,
    pub target_type: TargetType,
}

/// Predicate over one CRN attribute, always carrying an explicit value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionFilter {
    pub operand: FilterOperand,
    pub operator: FilterOperator,
    pub values: Vec<String>,
}

impl InclusionFilter {
    /// Build a filter, checking value cardinality for the operator.
    pub fn new(
        operand: FilterOperand,
        operator: FilterOperator,
        values: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let filter = InclusionFilter {
            operand,
            operator,
            values,
        };
        filter.check()?;
        Ok(filter)
    }

    /// `operand is value`
    pub fn is(operand: FilterOperand, value: impl Into<String>) -> Self {
        InclusionFilter {
            operand,
            operator: FilterOperator::Is,
            values: vec![value.into()],
        }
    }

    /// `operand in values`
    pub fn any_of<I, S>(operand: FilterOperand, values: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            operand,
            FilterOperator::In,
            values.into_iter().map(Into::into).collect(),
        )
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        self.operand.check()?;
        self.operator
            .check_cardinality(&self.operand, self.values.len())
    }
}

/// Rule as submitted on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePrototype {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,

    pub targets: Vec<TargetIdentity>,
    pub inclusion_filters: Vec<InclusionFilter>,
}

impl RulePrototype {
    pub fn send(targets: Vec<TargetIdentity>, inclusion_filters: Vec<InclusionFilter>) -> Self {
        RulePrototype {
            action: Some(RuleAction::Send),
            targets,
            inclusion_filters,
        }
    }

    pub fn drop_matching(inclusion_filters: Vec<InclusionFilter>) -> Self {
        RulePrototype {
            action: Some(RuleAction::Drop),
            targets: Vec::new(),
            inclusion_filters,
        }
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        for target in &self.targets {
            crate::domain::validation::require("rules[].targets[].id", &target.id)?;
        }
        self.inclusion_filters.iter().try_for_each(InclusionFilter::check)
    }
}

/// Rule as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,

    #[serde(default)]
    pub targets: Vec<TargetReference>,

    #[serde(default)]
    pub inclusion_filters: Vec<InclusionFilter>,
}

impl Rule {
    /// Prototype carrying the same action, target ids and filters.
    pub fn to_prototype(&self) -> RulePrototype {
        RulePrototype {
            action: self.action,
            targets: self
                .targets
                .iter()
                .map(|t| TargetIdentity::new(&t.id))
                .collect(),
            inclusion_filters: self.inclusion_filters.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub crn: String,

    #[serde(default)]
    pub rules: Vec<Rule>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,

    /// Informational only; updates do not require it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCollection {
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// Account-wide routing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Targets receiving events no route rule matched
    #[serde(default)]
    pub default_targets: Vec<TargetReference>,

    #[serde(default)]
    pub permitted_target_regions: Vec<String>,

    pub primary_metadata_region: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_metadata_region: Option<String>,

    pub private_api_endpoint_only: bool,

    pub api_version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// CRN submitted to a destination query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrnPrototype {
    pub crn: String,
}

impl CrnPrototype {
    pub fn new(crn: impl Into<String>) -> Self {
        CrnPrototype { crn: crn.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationReason {
    #[serde(rename = "type")]
    pub reason_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
}

/// A target that would receive events from a queried CRN, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedTarget {
    pub id: String,
    pub crn: String,
    pub name: String,

    #[serde(default)]
    pub association_reasons: Vec<AssociationReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub crn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// `send` or `drop`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default)]
    pub associated_targets: Vec<AssociatedTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

/// Destinations keyed by the queried CRN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationQueryResult {
    #[serde(default)]
    pub destinations: BTreeMap<String, Vec<Destination>>,
}

/// Result of a migration action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationResult {
    pub api_version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
