use thiserror::Error;

/// Maximum length of a route or target name.
pub const MAX_NAME_LEN: usize = 1000;

/// Local validation failures, raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("{field} is {actual} characters long, maximum is {max}")]
    NameTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} contains invalid character {found:?}")]
    InvalidCharacters { field: &'static str, found: char },

    #[error("invalid CRN '{crn}': {reason}")]
    InvalidCrn { crn: String, reason: &'static str },

    #[error("unsupported inclusion filter operand '{found}'")]
    UnsupportedOperand { found: String },

    #[error("inclusion filter on {operand} with operator '{operator}' accepts {expected} values, got {actual}")]
    InvalidFilterCardinality {
        operand: String,
        operator: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("region '{region}' is not in the permitted target regions [{permitted}]")]
    RegionNotPermitted { region: String, permitted: String },
}

/// Client-side checks run on every request payload before transmission.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Reject empty or whitespace-only values for a required field.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField(field));
    }
    Ok(())
}

/// Check a route or target name: required, at most [`MAX_NAME_LEN`]
/// characters, drawn from `[A-Za-z0-9 \-._:]`.
pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    require(field, name)?;

    let actual = name.chars().count();
    if actual > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            field,
            max: MAX_NAME_LEN,
            actual,
        });
    }

    if let Some(found) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(ValidationError::InvalidCharacters { field, found });
    }

    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '.' | '_' | ':')
}

/// Check a target region against the account's permitted regions.
///
/// An empty permitted list leaves regions unconstrained.
pub fn check_region_permitted(region: &str, permitted: &[String]) -> Result<(), ValidationError> {
    if permitted.is_empty() || permitted.iter().any(|r| r == region) {
        return Ok(());
    }
    Err(ValidationError::RegionNotPermitted {
        region: region.to_string(),
        permitted: permitted.join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_boundary() {
        let exact = "a".repeat(MAX_NAME_LEN);
        assert!(validate_name("name", &exact).is_ok());

        let over = "a".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_name("name", &over),
            Err(ValidationError::NameTooLong {
                field: "name",
                max: 1000,
                actual: 1001
            })
        );
    }

    #[test]
    fn test_name_charset() {
        assert!(validate_name("name", "my-route_01.prod: eu").is_ok());

        let err = validate_name("name", "my/route").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidCharacters {
                field: "name",
                found: '/'
            }
        );

        assert!(validate_name("name", "route\u{e9}").is_err());
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(
            validate_name("name", "  "),
            Err(ValidationError::MissingRequiredField("name"))
        );
    }

    #[test]
    fn test_region_permitted() {
        let permitted = vec!["us-south".to_string(), "eu-de".to_string()];
        assert!(check_region_permitted("eu-de", &permitted).is_ok());
        assert!(check_region_permitted("jp-tok", &[]).is_ok());

        let err = check_region_permitted("jp-tok", &permitted).unwrap_err();
        assert!(err.to_string().contains("us-south, eu-de"));
    }
}
