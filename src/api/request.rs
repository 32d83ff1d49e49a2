use reqwest::{Method, Url};
use serde::Serialize;

use super::error::Error;
use crate::domain::ValidationError;

/// A single service call before it is bound to a base URL.
///
/// Paths are templates such as `/targets/{id}`; every `{name}` segment is
/// filled from [`RequestBuilder::path_param`] and percent-encoded as one
/// segment.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) method: Method,
    pub(crate) operation_id: &'static str,
    template: &'static str,
    path_params: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
    pub(crate) body: Option<Vec<u8>>,
}

impl RequestBuilder {
    pub fn new(method: Method, template: &'static str, operation_id: &'static str) -> Self {
        RequestBuilder {
            method,
            operation_id,
            template,
            path_params: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(template: &'static str, operation_id: &'static str) -> Self {
        Self::new(Method::GET, template, operation_id)
    }

    pub fn post(template: &'static str, operation_id: &'static str) -> Self {
        Self::new(Method::POST, template, operation_id)
    }

    pub fn put(template: &'static str, operation_id: &'static str) -> Self {
        Self::new(Method::PUT, template, operation_id)
    }

    pub fn patch(template: &'static str, operation_id: &'static str) -> Self {
        Self::new(Method::PATCH, template, operation_id)
    }

    pub fn delete(template: &'static str, operation_id: &'static str) -> Self {
        Self::new(Method::DELETE, template, operation_id)
    }

    /// Bind a path parameter. Empty values are rejected.
    pub fn path_param(
        mut self,
        name: &'static str,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::MissingRequiredField(name));
        }
        self.path_params.push((name, value));
        Ok(self)
    }

    pub fn query(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        let bytes = serde_json::to_vec(body).map_err(|e| Error::Encode(e.into()))?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Resolve the template against `base`, keeping any path the base
    /// already carries (e.g. `/v3`).
    pub fn resolve_url(&self, base: &str) -> Result<Url, Error> {
        if base.is_empty() {
            return Err(Error::ServiceUrlMissing);
        }

        let mut url = parse_service_url(base)?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| Error::InvalidServiceUrl {
                url: base.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?;
            segments.pop_if_empty();

            for segment in self.template.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = self
                            .path_params
                            .iter()
                            .find(|(n, _)| *n == name)
                            .map(|(_, v)| v.as_str())
                            .ok_or(ValidationError::MissingRequiredField(
                                self.param_name(name),
                            ))?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    fn param_name(&self, name: &str) -> &'static str {
        self.template
            .split('/')
            .filter_map(|s| s.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .find(|s| *s == name)
            .unwrap_or("path parameter")
    }
}

/// Parse and sanity-check a service URL.
pub fn parse_service_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidServiceUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidServiceUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_base_path() {
        let req = RequestBuilder::get("/targets/{id}", "get_target")
            .path_param("id", "f7dcfae6")
            .unwrap();
        let url = req
            .resolve_url("https://api.eu-de.logs-router.cloud.ibm.com/v3")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.eu-de.logs-router.cloud.ibm.com/v3/targets/f7dcfae6"
        );
    }

    #[test]
    fn test_path_param_is_encoded() {
        let req = RequestBuilder::delete("/routes/{id}", "delete_route")
            .path_param("id", "a b/c")
            .unwrap();
        let url = req.resolve_url("http://127.0.0.1:8080/").unwrap();

        assert_eq!(url.path(), "/routes/a%20b%2Fc");
    }

    #[test]
    fn test_query_params() {
        let req = RequestBuilder::post("/migrate", "migrate").query("action", "complete");
        let url = req.resolve_url("http://localhost/v3").unwrap();

        assert_eq!(url.path(), "/v3/migrate");
        assert_eq!(url.query(), Some("action=complete"));
    }

    #[test]
    fn test_empty_path_param_rejected() {
        let err = RequestBuilder::get("/targets/{id}", "get_target")
            .path_param("id", "")
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField("id"));
    }

    #[test]
    fn test_unbound_path_param_rejected() {
        let req = RequestBuilder::get("/targets/{id}", "get_target");
        let err = req.resolve_url("http://localhost").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingRequiredField("id"))
        ));
    }

    #[test]
    fn test_bad_service_urls() {
        let req = RequestBuilder::get("/settings", "get_settings");
        assert!(matches!(req.resolve_url(""), Err(Error::ServiceUrlMissing)));
        assert!(matches!(
            req.resolve_url("{BAD_URL_STRING"),
            Err(Error::InvalidServiceUrl { .. })
        ));
        assert!(parse_service_url("ftp://example.com").is_err());
    }
}
