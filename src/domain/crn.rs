use serde::{Deserialize, Serialize};
use std::fmt;

use super::filter::FilterOperand;
use super::validation::ValidationError;

const SEGMENTS: usize = 10;

/// Cloud Resource Name.
///
/// `crn:version:cname:ctype:service-name:location:scope:service-instance:resource-type:resource`
///
/// Only the layout is checked; segment contents are opaque. Trailing
/// segments may be empty, as in a service-instance CRN ending in `::`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crn(String);

impl Crn {
    pub fn parse(crn: impl Into<String>) -> Result<Self, ValidationError> {
        let crn = crn.into();
        let segments: Vec<&str> = crn.splitn(SEGMENTS, ':').collect();

        let reason = if segments.len() < SEGMENTS {
            Some("expected 10 colon-separated segments")
        } else if segments[0] != "crn" {
            Some("must start with 'crn:'")
        } else if segments[1].is_empty() {
            Some("missing version segment")
        } else if segments[4].is_empty() {
            Some("missing service-name segment")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ValidationError::InvalidCrn { crn, reason }),
            None => Ok(Crn(crn)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segment(&self, index: usize) -> &str {
        self.0.splitn(SEGMENTS, ':').nth(index).unwrap_or("")
    }

    pub fn service_name(&self) -> &str {
        self.segment(4)
    }

    pub fn location(&self) -> &str {
        self.segment(5)
    }

    /// Account scope, e.g. `a/0be5ad401ae913d8ff665d92680664ed`.
    pub fn scope(&self) -> &str {
        self.segment(6)
    }

    pub fn service_instance(&self) -> &str {
        self.segment(7)
    }

    pub fn resource_type(&self) -> &str {
        self.segment(8)
    }

    pub fn resource(&self) -> &str {
        self.segment(9)
    }

    /// Attribute an inclusion filter compares against. Empty segments and
    /// unknown operands yield `None` so they never match.
    pub fn attribute(&self, operand: &FilterOperand) -> Option<&str> {
        let value = match operand {
            FilterOperand::Location => self.location(),
            FilterOperand::Resource => self.resource(),
            FilterOperand::ResourceType => self.resource_type(),
            FilterOperand::ServiceInstance => self.service_instance(),
            FilterOperand::ServiceName => self.service_name(),
            FilterOperand::Other(_) => return None,
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

impl TryFrom<String> for Crn {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Crn::parse(value)
    }
}

impl From<Crn> for String {
    fn from(crn: Crn) -> Self {
        crn.0
    }
}

impl fmt::Display for Crn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANCE_CRN: &str = "crn:v1:bluemix:public:logs:us-south:a/0be5ad401ae913d8ff665d92680664ed:22222222-2222-2222-2222-222222222222::";

    #[test]
    fn test_parse_instance_crn() {
        let crn = Crn::parse(INSTANCE_CRN).unwrap();
        assert_eq!(crn.service_name(), "logs");
        assert_eq!(crn.location(), "us-south");
        assert_eq!(crn.scope(), "a/0be5ad401ae913d8ff665d92680664ed");
        assert_eq!(
            crn.service_instance(),
            "22222222-2222-2222-2222-222222222222"
        );
        assert_eq!(crn.attribute(&FilterOperand::ResourceType), None);
        assert_eq!(crn.attribute(&FilterOperand::Resource), None);
        assert_eq!(
            crn.attribute(&FilterOperand::Other("resource_group".to_string())),
            None
        );
    }

    #[test]
    fn test_resource_keeps_colons() {
        let crn = Crn::parse("crn:v1:bluemix:public:cos:eu-de:a/abc:inst:bucket:my:bucket").unwrap();
        assert_eq!(crn.resource_type(), "bucket");
        assert_eq!(crn.resource(), "my:bucket");
    }

    #[test]
    fn test_invalid_crns() {
        assert!(Crn::parse("").is_err());
        assert!(Crn::parse("crn:v1:bluemix:public").is_err());

        let err = Crn::parse("urn:v1:bluemix:public:logs:us-south:a/1:2::").unwrap_err();
        assert!(err.to_string().contains("must start with 'crn:'"));

        assert!(Crn::parse("crn:v1:bluemix:public::us-south:a/1:2::").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let crn = Crn::parse(INSTANCE_CRN).unwrap();
        let json = serde_json::to_string(&crn).unwrap();
        assert_eq!(json, format!("\"{}\"", INSTANCE_CRN));

        let parsed: Result<Crn, _> = serde_json::from_str("\"not-a-crn\"");
        assert!(parsed.is_err());
    }
}
