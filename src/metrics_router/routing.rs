use super::models::{InclusionFilter, Route, Rule, Settings};
use crate::domain::{Crn, FilterOperand, FilterOperator, RuleAction};
use crate::rules::{plan_delivery, DeliveryPlan, EventFilter, RouteDefinition, RoutingRule};

impl EventFilter for InclusionFilter {
    fn operand(&self) -> &FilterOperand {
        &self.operand
    }

    fn operator(&self) -> FilterOperator {
        self.operator
    }

    fn values(&self) -> &[String] {
        self.value.as_slice()
    }
}

impl RoutingRule for Rule {
    type Filter = InclusionFilter;

    fn filters(&self) -> &[InclusionFilter] {
        &self.inclusion_filters
    }

    fn target_ids(&self) -> Vec<&str> {
        self.target_ids.iter().map(String::as_str).collect()
    }

    /// Metrics Router rules always send.
    fn action(&self) -> RuleAction {
        RuleAction::Send
    }
}

impl RouteDefinition for Route {
    type Rule = Rule;

    fn id(&self) -> &str {
        &self.id
    }

    fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Where the Metrics Router would deliver metrics from `crn`.
pub fn preview(routes: &[Route], settings: &Settings, crn: &Crn) -> DeliveryPlan {
    plan_delivery(routes, settings.default_targets.as_slice(), crn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, rules: Vec<Rule>) -> Route {
        Route {
            id: id.to_string(),
            name: id.to_string(),
            crn: String::new(),
            version: Some(0),
            rules,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            api_version: 3,
            message: None,
        }
    }

    fn settings(defaults: &[&str]) -> Settings {
        Settings {
            default_targets: defaults.iter().map(|s| s.to_string()).collect(),
            permitted_target_regions: vec![],
            metadata_region_primary: "us-south".to_string(),
            private_api_endpoint_only: false,
            api_version: 3,
            message: None,
        }
    }

    fn crn(location: &str) -> Crn {
        Crn::parse(format!(
            "crn:v1:bluemix:public:sysdig-monitor:{}:a/0be5ad401ae913d8ff665d92680664ed:22222222::",
            location
        ))
        .unwrap()
    }

    #[test]
    fn test_scalar_and_list_values_evaluate_alike() {
        let scalar = Rule::new(
            vec!["t1".into()],
            vec![InclusionFilter::is(FilterOperand::Location, "us-east")],
        );
        let list = Rule::new(
            vec!["t2".into()],
            vec![InclusionFilter::any_of(FilterOperand::Location, ["eu-de", "us-east"]).unwrap()],
        );

        let east = crn("us-east");
        assert!(scalar.matches(&east));
        assert!(list.matches(&east));
        assert!(!scalar.matches(&crn("eu-de")));
        assert!(list.matches(&crn("eu-de")));
    }

    #[test]
    fn test_first_rule_wins_once_per_target() {
        let routes = vec![route(
            "r1",
            vec![
                Rule::new(
                    vec!["t1".into(), "t1".into(), "t2".into()],
                    vec![InclusionFilter::is(FilterOperand::Location, "us-east")],
                ),
                Rule::new(vec!["t3".into()], vec![]),
            ],
        )];

        let plan = preview(&routes, &settings(&["d1"]), &crn("us-east"));
        assert_eq!(plan.targets.to_vec(), vec!["t1", "t2"]);

        let plan = preview(&routes, &settings(&["d1"]), &crn("eu-gb"));
        assert_eq!(plan.targets.to_vec(), vec!["t3"]);
        assert_eq!(plan.matched[0].rule_index, 1);
    }

    #[test]
    fn test_defaults_for_unmatched() {
        let routes = vec![route(
            "r1",
            vec![Rule::new(
                vec!["t1".into()],
                vec![InclusionFilter::is(FilterOperand::Location, "us-east")],
            )],
        )];

        let plan = preview(&routes, &settings(&["d1"]), &crn("au-syd"));
        assert!(plan.used_defaults);
        assert_eq!(plan.targets.to_vec(), vec!["d1"]);
    }
}
