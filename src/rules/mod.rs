pub mod traits;

pub use traits::{EventFilter, RouteDefinition, RoutingRule};

use serde::Serialize;
use smallvec::SmallVec;

use crate::domain::{Crn, RuleAction};

/// The rule that decided a route's outcome for one CRN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    pub route_id: String,
    pub rule_index: usize,
    pub action: RuleAction,
}

/// Where an event with a given CRN would be delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryPlan {
    /// Target ids, each listed once, in first-seen order
    pub targets: SmallVec<[String; 4]>,

    /// One entry per route with a matching rule
    pub matched: Vec<RuleMatch>,

    /// No rule in any route matched, so the default targets apply
    pub used_defaults: bool,
}

impl DeliveryPlan {
    fn add_target(&mut self, id: &str) {
        if !self.targets.iter().any(|t| t == id) {
            self.targets.push(id.to_string());
        }
    }

    /// Every matching rule dropped the event and no defaults applied.
    pub fn is_dropped(&self) -> bool {
        self.targets.is_empty() && !self.used_defaults
    }
}

/// Compute the delivery plan for `crn`.
///
/// In each route the first rule whose filters all match decides: `send`
/// contributes its targets, `drop` contributes nothing. Targets are unioned
/// across routes. When no route has a matching rule, `default_targets` are
/// used instead.
pub fn plan_delivery<R, S>(routes: &[R], default_targets: &[S], crn: &Crn) -> DeliveryPlan
where
    R: RouteDefinition,
    S: AsRef<str>,
{
    let mut plan = DeliveryPlan::default();

    for route in routes {
        let Some((index, rule)) = route.first_match(crn) else {
            continue;
        };

        let action = rule.action();
        plan.matched.push(RuleMatch {
            route_id: route.id().to_string(),
            rule_index: index,
            action,
        });

        if action == RuleAction::Send {
            for id in rule.target_ids() {
                plan.add_target(id);
            }
        }
    }

    if plan.matched.is_empty() {
        plan.used_defaults = true;
        for id in default_targets {
            plan.add_target(id.as_ref());
        }
    }

    plan
}
