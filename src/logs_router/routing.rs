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
        &self.values
    }
}

impl RoutingRule for Rule {
    type Filter = InclusionFilter;

    fn filters(&self) -> &[InclusionFilter] {
        &self.inclusion_filters
    }

    fn target_ids(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.id.as_str()).collect()
    }

    fn action(&self) -> RuleAction {
        self.action.unwrap_or_default()
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

/// Where the Logs Router would deliver events from `crn`.
pub fn preview(routes: &[Route], settings: &Settings, crn: &Crn) -> DeliveryPlan {
    let defaults: Vec<&str> = settings
        .default_targets
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    plan_delivery(routes, &defaults, crn)
}
