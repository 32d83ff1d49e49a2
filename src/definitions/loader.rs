use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::domain::{Validate, ValidationError};

/// Errors that can occur while loading a definition file.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Load a route, target or settings definition from a YAML file and run
/// its local validation.
pub fn load_definition<T>(path: impl AsRef<Path>) -> Result<T, DefinitionError>
where
    T: DeserializeOwned + Validate,
{
    let content = fs::read_to_string(path)?;
    parse_definition(&content)
}

/// Parse and validate a definition held in memory.
pub fn parse_definition<T>(content: &str) -> Result<T, DefinitionError>
where
    T: DeserializeOwned + Validate,
{
    let definition: T = serde_yaml::from_str(content)?;
    definition.validate()?;
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FilterOperand, FilterOperator, RuleAction};
    use crate::logs_router::{CreateRouteOptions, UpdateSettingsOptions};
    use crate::metrics_router::{FilterValue, ReplaceSettingsOptions};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_logs_route() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
name: us-south-audit
rules:
  - action: send
    targets:
      - id: c3af557f-fb0e-4476-85c3-0889e7fe7bc4
    inclusion_filters:
      - operand: location
        operator: is
        values: [us-south]
  - action: drop
    targets: []
    inclusion_filters:
      - operand: service_name
        operator: in
        values: [kms, iam-identity]
"#
        )
        .unwrap();

        let route: CreateRouteOptions = load_definition(file.path()).unwrap();

        assert_eq!(route.name, "us-south-audit");
        assert_eq!(route.rules.len(), 2);
        assert_eq!(route.rules[1].action, Some(RuleAction::Drop));
        assert_eq!(route.rules[1].inclusion_filters[0].operator, FilterOperator::In);
    }

    #[test]
    fn test_load_metrics_settings() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
metadata_region_primary: us-south
private_api_endpoint_only: false
default_targets: [c3af557f-fb0e-4476-85c3-0889e7fe7bc4]
"#
        )
        .unwrap();

        let settings: ReplaceSettingsOptions = load_definition(file.path()).unwrap();
        assert_eq!(settings.metadata_region_primary, "us-south");
        assert_eq!(settings.default_targets.unwrap().len(), 1);
        assert!(settings.permitted_target_regions.is_none());
    }

    #[test]
    fn test_scalar_filter_value() {
        let route: crate::metrics_router::CreateRouteOptions = parse_definition(
            r#"
name: east
rules:
  - target_ids: [t1]
    inclusion_filters:
      - operand: location
        operator: is
        value: us-east
"#,
        )
        .unwrap();

        let filter = &route.rules[0].inclusion_filters[0];
        assert_eq!(filter.operand, FilterOperand::Location);
        assert_eq!(filter.value, FilterValue::Single("us-east".to_string()));
    }

    #[test]
    fn test_validation_failure() {
        let result: Result<CreateRouteOptions, _> = parse_definition(
            r#"
name: "bad/name"
rules: []
"#,
        );
        assert!(matches!(result, Err(DefinitionError::Validation(_))));
        assert!(result.unwrap_err().to_string().contains("invalid character"));
    }

    #[test]
    fn test_malformed_yaml() {
        let result: Result<UpdateSettingsOptions, _> =
            parse_definition("private_api_endpoint_only: [not, a, bool]");
        assert!(matches!(result, Err(DefinitionError::Yaml(_))));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<CreateRouteOptions, _> = load_definition("/nonexistent/route.yaml");
        assert!(matches!(result, Err(DefinitionError::Io(_))));
    }
}
