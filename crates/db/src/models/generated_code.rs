//! Generated code records and DTOs.
//!
//! Generated code entries are append-only snippets kept in a collection
//! bounded to the most recent [`GENERATED_CODE_CAPACITY`] entries.
//!
//! [`GENERATED_CODE_CAPACITY`]: fwhub_core::retention::GENERATED_CODE_CAPACITY

use fwhub_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::document::fixed_timestamp;

/// A stored generated code entry, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub id: RecordId,
    pub language: String,
    #[serde(rename = "type")]
    pub code_type: String,
    pub code: String,
    pub description: String,
    #[serde(with = "fixed_timestamp")]
    pub created_at: Timestamp,
}

/// DTO for creating a generated code entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGeneratedCode {
    #[validate(length(min = 1, message = "language must not be empty"))]
    pub language: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub code_type: String,
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub code: String,
    pub description: String,
    /// Defaults to the time of insertion.
    #[serde(default, with = "fixed_timestamp::option")]
    pub created_at: Option<Timestamp>,
}

/// The stored form of a new entry, with `created_at` resolved.
#[derive(Debug, Clone, Serialize)]
pub struct NewGeneratedCode {
    pub language: String,
    #[serde(rename = "type")]
    pub code_type: String,
    pub code: String,
    pub description: String,
    #[serde(with = "fixed_timestamp")]
    pub created_at: Timestamp,
}

impl CreateGeneratedCode {
    pub fn into_new(self, now: Timestamp) -> NewGeneratedCode {
        NewGeneratedCode {
            language: self.language,
            code_type: self.code_type,
            code: self.code,
            description: self.description,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

/// Query parameters for `GET /generated-code`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedCodeListQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn created_at_defaults_to_now() {
        let dto: CreateGeneratedCode = serde_json::from_value(json!({
            "language": "rust",
            "type": "function",
            "code": "fn main() {}",
            "description": "entry point"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        assert_eq!(dto.into_new(now).created_at, now);
    }

    #[test]
    fn supplied_created_at_is_kept() {
        let dto: CreateGeneratedCode = serde_json::from_value(json!({
            "language": "rust",
            "type": "function",
            "code": "fn main() {}",
            "description": "",
            "created_at": "2023-01-01T00:00:00Z"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        assert_eq!(
            dto.into_new(now).created_at,
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
        );
    }
}
