//! Build log records and DTOs.
//!
//! A build log tracks one execution attempt of an external CI job, keyed by
//! the caller-supplied `build_id`.

use fwhub_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::document::fixed_timestamp;

/// A stored build log, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildLog {
    pub id: RecordId,
    pub build_id: String,
    #[serde(rename = "type")]
    pub build_type: String,
    pub status: String,
    #[serde(with = "fixed_timestamp")]
    pub start_time: Timestamp,
    #[serde(default, with = "fixed_timestamp::option")]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub jenkins_job: Option<String>,
    #[serde(default)]
    pub output_log: Option<String>,
}

/// DTO for creating a build log. Serializes directly into the stored
/// document (the store assigns the id).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBuildLog {
    #[validate(length(min = 1, max = 255, message = "build_id must be 1-255 characters"))]
    pub build_id: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub build_type: String,
    #[validate(length(min = 1, message = "status must not be empty"))]
    pub status: String,
    #[serde(with = "fixed_timestamp")]
    pub start_time: Timestamp,
    #[serde(default, with = "fixed_timestamp::option")]
    pub end_time: Option<Timestamp>,
    pub config: Map<String, Value>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub jenkins_job: Option<String>,
    #[serde(default)]
    pub output_log: Option<String>,
}

/// DTO for a partial build log update. Absent or null fields are left
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBuildLog {
    #[serde(default)]
    #[validate(length(min = 1, message = "status must not be empty"))]
    pub status: Option<String>,
    #[serde(default, with = "fixed_timestamp::option")]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub output_log: Option<String>,
}

/// Exact-match filter for listing build logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildLogFilter {
    pub status: Option<String>,
    pub build_type: Option<String>,
}

/// Query parameters for `GET /build-logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildLogListQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub build_type: Option<String>,
}

impl BuildLogListQuery {
    pub fn filter(&self) -> BuildLogFilter {
        BuildLogFilter {
            status: self.status.clone(),
            build_type: self.build_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use validator::Validate;

    use super::*;

    #[test]
    fn create_dto_reads_wire_type_field() {
        let dto: CreateBuildLog = serde_json::from_value(json!({
            "build_id": "b1",
            "type": "OS Making",
            "status": "running",
            "start_time": "2024-05-01T08:00:00Z",
            "config": {"osType": "linux"}
        }))
        .unwrap();

        assert_eq!(dto.build_type, "OS Making");
        assert!(dto.end_time.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn create_dto_requires_config() {
        let result = serde_json::from_value::<CreateBuildLog>(json!({
            "build_id": "b1",
            "type": "OS Making",
            "status": "running",
            "start_time": "2024-05-01T08:00:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_build_id_fails_validation() {
        let dto: CreateBuildLog = serde_json::from_value(json!({
            "build_id": "",
            "type": "OS Making",
            "status": "running",
            "start_time": "2024-05-01T08:00:00Z",
            "config": {}
        }))
        .unwrap();

        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("build_id"));
    }

    #[test]
    fn update_dto_allows_empty_body() {
        let dto: UpdateBuildLog = serde_json::from_value(json!({})).unwrap();
        assert!(dto.status.is_none() && dto.end_time.is_none() && dto.output_log.is_none());
        assert!(dto.validate().is_ok());
    }
}
