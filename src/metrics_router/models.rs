use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::validation::require;
use crate::domain::{FilterOperand, FilterOperator, ValidationError, WriteStatus};

/// Destination type of a Metrics Router target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetType {
    SysdigMonitor,
    Other(String),
}

impl From<String> for TargetType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "sysdig_monitor" => TargetType::SysdigMonitor,
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
            TargetType::SysdigMonitor => write!(f, "sysdig_monitor"),
            TargetType::Other(s) => write!(f, "{}", s),
        }
    }
}

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
    pub api_version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCollection {
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// The `value` of a Metrics Router filter: a bare scalar or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FilterValue {
    pub fn as_slice(&self) -> &[String] {
        match self {
            FilterValue::Single(value) => std::slice::from_ref(value),
            FilterValue::Multiple(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Multiple(values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionFilter {
    pub operand: FilterOperand,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl InclusionFilter {
    pub fn new(
        operand: FilterOperand,
        operator: FilterOperator,
        value: FilterValue,
    ) -> Result<Self, ValidationError> {
        let filter = InclusionFilter {
            operand,
            operator,
            value,
        };
        filter.check()?;
        Ok(filter)
    }

    pub fn is(operand: FilterOperand, value: impl Into<String>) -> Self {
        InclusionFilter {
            operand,
            operator: FilterOperator::Is,
            value: FilterValue::Single(value.into()),
        }
    }

    pub fn any_of<I, S>(operand: FilterOperand, values: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            operand,
            FilterOperator::In,
            FilterValue::Multiple(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        self.operand.check()?;
        self.operator.check_cardinality(&self.operand, self.value.len())
    }
}

/// Rule as sent and as returned. The first matching rule in a route wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub target_ids: Vec<String>,

    #[serde(default)]
    pub inclusion_filters: Vec<InclusionFilter>,
}

pub type RulePrototype = Rule;

impl Rule {
    pub fn new(target_ids: Vec<String>, inclusion_filters: Vec<InclusionFilter>) -> Self {
        Rule {
            target_ids,
            inclusion_filters,
        }
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        for id in &self.target_ids {
            require("rules[].target_ids[]", id)?;
        }
        self.inclusion_filters.iter().try_for_each(InclusionFilter::check)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub crn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(default)]
    pub rules: Vec<Rule>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub api_version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCollection {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Target ids receiving metrics no route rule matched
    #[serde(default)]
    pub default_targets: Vec<String>,

    #[serde(default)]
    pub permitted_target_regions: Vec<String>,

    pub metadata_region_primary: String,
    pub private_api_endpoint_only: bool,
    pub api_version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

/// Returned by a target delete that left dangling references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,

    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl WarningReport {
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
