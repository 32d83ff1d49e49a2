use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last known outcome of the service writing to a target's destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteStatus {
    /// `success` or `failed`
    pub status: String,

    /// When the most recent failure happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<DateTime<Utc>>,

    /// Reason reported for the most recent failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_last_failure: Option<String>,
}

impl WriteStatus {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_status_deserialize() {
        let status: WriteStatus = serde_json::from_str(
            r#"{"status": "failed", "last_failure": "2021-05-18T20:15:12.353Z", "reason_for_last_failure": "Provided API key could not be found"}"#,
        )
        .unwrap();

        assert!(!status.is_success());
        assert_eq!(
            status.last_failure.unwrap().to_rfc3339(),
            "2021-05-18T20:15:12.353+00:00"
        );
    }

    #[test]
    fn test_write_status_minimal() {
        let status: WriteStatus = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(status.is_success());
        assert_eq!(serde_json::to_string(&status).unwrap(), r#"{"status":"success"}"#);
    }
}
