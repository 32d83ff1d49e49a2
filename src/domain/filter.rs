use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::ValidationError;

/// Upper bound on the values of an `in` filter.
pub const MAX_FILTER_VALUES: usize = 20;

/// CRN-derived attribute an inclusion filter is evaluated against.
///
/// Operands the client does not know decode as `Other` so a listing with a
/// newer operand still parses. They are rejected on requests and never
/// match during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperand {
    Location,
    Resource,
    ResourceType,
    ServiceInstance,
    ServiceName,
    Other(String),
}

impl FilterOperand {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "location" => Some(FilterOperand::Location),
            "resource" => Some(FilterOperand::Resource),
            "resource_type" => Some(FilterOperand::ResourceType),
            "service_instance" => Some(FilterOperand::ServiceInstance),
            "service_name" => Some(FilterOperand::ServiceName),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterOperand::Location => "location",
            FilterOperand::Resource => "resource",
            FilterOperand::ResourceType => "resource_type",
            FilterOperand::ServiceInstance => "service_instance",
            FilterOperand::ServiceName => "service_name",
            FilterOperand::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FilterOperand::Other(_))
    }

    /// Reject operands the service is not documented to accept.
    pub fn check(&self) -> Result<(), ValidationError> {
        match self {
            FilterOperand::Other(found) => Err(ValidationError::UnsupportedOperand {
                found: found.clone(),
            }),
            _ => Ok(()),
        }
    }
}

impl From<String> for FilterOperand {
    fn from(s: String) -> Self {
        match s.as_str() {
            "location" => FilterOperand::Location,
            "resource" => FilterOperand::Resource,
            "resource_type" => FilterOperand::ResourceType,
            "service_instance" => FilterOperand::ServiceInstance,
            "service_name" => FilterOperand::ServiceName,
            _ => FilterOperand::Other(s),
        }
    }
}

impl From<FilterOperand> for String {
    fn from(operand: FilterOperand) -> Self {
        match operand {
            FilterOperand::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FilterOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusion filter comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    /// Exactly one acceptable value
    Is,
    /// Between one and twenty acceptable values
    In,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Is => "is",
            FilterOperator::In => "in",
        }
    }

    /// Check the number of values supplied for this operator.
    pub fn check_cardinality(
        &self,
        operand: &FilterOperand,
        count: usize,
    ) -> Result<(), ValidationError> {
        let (ok, expected) = match self {
            FilterOperator::Is => (count == 1, "exactly 1"),
            FilterOperator::In => ((1..=MAX_FILTER_VALUES).contains(&count), "1 to 20"),
        };
        if ok {
            return Ok(());
        }
        Err(ValidationError::InvalidFilterCardinality {
            operand: operand.to_string(),
            operator: self.to_string(),
            expected,
            actual: count,
        })
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a matching Logs Router rule does with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    #[default]
    Send,
    Drop,
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAction::Send => write!(f, "send"),
            RuleAction::Drop => write!(f, "drop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_serialization() {
        let json = serde_json::to_string(&FilterOperand::ServiceInstance).unwrap();
        assert_eq!(json, "\"service_instance\"");

        let parsed: FilterOperand = serde_json::from_str("\"resource_type\"").unwrap();
        assert_eq!(parsed, FilterOperand::ResourceType);
        assert_eq!(FilterOperand::from_str("LOCATION"), Some(FilterOperand::Location));
        assert_eq!(FilterOperand::from_str("region"), None);
    }

    #[test]
    fn test_unknown_operand_decodes_as_other() {
        let parsed: FilterOperand = serde_json::from_str("\"resource_group\"").unwrap();
        assert_eq!(parsed, FilterOperand::Other("resource_group".to_string()));
        assert!(!parsed.is_known());
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"resource_group\"");

        assert!(matches!(
            parsed.check(),
            Err(ValidationError::UnsupportedOperand { found }) if found == "resource_group"
        ));
        assert!(FilterOperand::Location.check().is_ok());
    }

    #[test]
    fn test_is_cardinality() {
        let op = FilterOperator::Is;
        assert!(op.check_cardinality(&FilterOperand::Location, 1).is_ok());
        assert!(op.check_cardinality(&FilterOperand::Location, 0).is_err());
        assert!(op.check_cardinality(&FilterOperand::Location, 2).is_err());
    }

    #[test]
    fn test_in_cardinality() {
        let op = FilterOperator::In;
        assert!(op.check_cardinality(&FilterOperand::ServiceName, 1).is_ok());
        assert!(op.check_cardinality(&FilterOperand::ServiceName, 20).is_ok());

        let err = op
            .check_cardinality(&FilterOperand::ServiceName, 21)
            .unwrap_err();
        assert!(err.to_string().contains("1 to 20"));
        assert!(op.check_cardinality(&FilterOperand::ServiceName, 0).is_err());
    }

    #[test]
    fn test_rule_action_default() {
        assert_eq!(RuleAction::default(), RuleAction::Send);
        let parsed: RuleAction = serde_json::from_str("\"drop\"").unwrap();
        assert_eq!(parsed, RuleAction::Drop);
    }
}
