use crate::domain::{Crn, FilterOperand, FilterOperator, RuleAction};
use std::fmt::Debug;

/// A single inclusion filter, evaluated against one CRN attribute.
///
/// Both services describe the same predicate with different wire shapes;
/// implementors only expose the value set.
pub trait EventFilter: Send + Sync + Debug {
    fn operand(&self) -> &FilterOperand;

    fn operator(&self) -> FilterOperator;

    /// Acceptable values for the operand.
    fn values(&self) -> &[String];

    /// Whether `value` satisfies this filter.
    fn accepts(&self, value: &str) -> bool {
        match self.operator() {
            FilterOperator::Is => self.values().first().is_some_and(|v| v == value),
            FilterOperator::In => self.values().iter().any(|v| v == value),
        }
    }

    /// Whether the CRN's attribute for this operand is accepted. A CRN with
    /// an empty segment never matches, nor does an unknown operand.
    fn matches(&self, crn: &Crn) -> bool {
        crn.attribute(self.operand())
            .is_some_and(|value| self.accepts(value))
    }
}

/// A routing rule: AND-ed filters plus the targets that receive matches.
pub trait RoutingRule: Send + Sync + Debug {
    type Filter: EventFilter;

    fn filters(&self) -> &[Self::Filter];

    /// Target ids in declaration order, duplicates included.
    fn target_ids(&self) -> Vec<&str>;

    fn action(&self) -> RuleAction;

    /// All filters match. A rule without filters matches every CRN.
    fn matches(&self, crn: &Crn) -> bool {
        self.filters().iter().all(|f| f.matches(crn))
    }
}

/// An ordered rule list as stored on a route.
pub trait RouteDefinition: Send + Sync + Debug {
    type Rule: RoutingRule;

    fn id(&self) -> &str;

    fn rules(&self) -> &[Self::Rule];

    /// First rule whose filters all match, with its position.
    fn first_match(&self, crn: &Crn) -> Option<(usize, &Self::Rule)> {
        self.rules().iter().enumerate().find(|(_, r)| r.matches(crn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestFilter {
        operand: FilterOperand,
        operator: FilterOperator,
        values: Vec<String>,
    }

    impl EventFilter for TestFilter {
        fn operand(&self) -> &FilterOperand {
            &self.operand
        }

        fn operator(&self) -> FilterOperator {
            self.operator
        }

        fn values(&self) -> &[String] {
            &self.values
        }
    }

    fn crn() -> Crn {
        Crn::parse("crn:v1:bluemix:public:cloud-object-storage:us-south:a/0be5ad401ae913d8ff665d92680664ed:1a0ec336-f391-4091-a6fb-5e084a4c56f4::").unwrap()
    }

    #[test]
    fn test_is_filter() {
        let filter = TestFilter {
            operand: FilterOperand::Location,
            operator: FilterOperator::Is,
            values: vec!["us-south".to_string()],
        };
        assert!(filter.matches(&crn()));
        assert!(!filter.accepts("eu-de"));
    }

    #[test]
    fn test_in_filter() {
        let filter = TestFilter {
            operand: FilterOperand::ServiceName,
            operator: FilterOperator::In,
            values: vec!["kms".to_string(), "cloud-object-storage".to_string()],
        };
        assert!(filter.matches(&crn()));
    }

    #[test]
    fn test_unknown_operand_never_matches() {
        let filter = TestFilter {
            operand: FilterOperand::Other("resource_group".to_string()),
            operator: FilterOperator::In,
            values: vec!["us-south".to_string(), "default".to_string()],
        };
        assert!(!filter.matches(&crn()));
    }

    #[test]
    fn test_empty_segment_never_matches() {
        let filter = TestFilter {
            operand: FilterOperand::ResourceType,
            operator: FilterOperator::Is,
            values: vec![String::new()],
        };
        assert!(!filter.matches(&crn()));
    }
}
