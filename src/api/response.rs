use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::error::Error;

/// A successful (2xx) response with its raw body.
#[derive(Debug, Clone)]
pub struct DetailedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl DetailedResponse {
    /// Decode a body that must be present.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.json_opt()?
            .ok_or(Error::EmptyBody(self.status.as_u16()))
    }

    /// Decode a body that may be legitimately absent, as on 204.
    pub fn json_opt<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&self.body)
            .map(Some)
            .map_err(|source| Error::Decode {
                status: self.status.as_u16(),
                source,
            })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
