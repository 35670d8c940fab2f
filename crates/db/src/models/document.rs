//! Mapping between typed records and stored documents.
//!
//! Timestamps are written as fixed-width RFC 3339 strings (UTC, microsecond
//! precision, `Z` suffix) so that byte-wise ordering of the stored text is
//! chronological ordering on every backend.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::store::{Collection, Document, StoreError, StoreResult};

/// Serialize a record into a document.
pub fn to_document<T: Serialize>(record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        )))),
    }
}

/// Deserialize a stored document into a record.
pub fn from_document<T: DeserializeOwned>(collection: Collection, doc: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(doc)).map_err(|e| StoreError::Corrupt {
        collection: collection.name(),
        detail: e.to_string(),
    })
}

/// `serde(with = ...)` module for fixed-width UTC timestamps.
///
/// Deserialization is lenient: any RFC 3339 timestamp is accepted, and a
/// timestamp without an offset is read as UTC.
pub mod fixed_timestamp {
    use chrono::{NaiveDateTime, SecondsFormat, Utc};
    use fwhub_core::types::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &Timestamp) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn parse(raw: &str) -> Result<Timestamp, chrono::ParseError> {
        match raw.parse::<chrono::DateTime<chrono::FixedOffset>>() {
            Ok(ts) => Ok(ts.with_timezone(&Utc)),
            Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc()),
        }
    }

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use fwhub_core::types::Timestamp;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<Timestamp>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => super::serialize(ts, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Timestamp>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::fixed_timestamp::{format, parse};

    #[test]
    fn format_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let fractional = whole + chrono::Duration::milliseconds(250);

        assert_eq!(format(&whole), "2024-05-01T08:00:00.000000Z");
        assert_eq!(format(&fractional), "2024-05-01T08:00:00.250000Z");
        assert!(format(&whole) < format(&fractional));
    }

    #[test]
    fn parse_accepts_offsets_and_naive_times() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        assert_eq!(parse("2024-05-01T08:00:00Z").unwrap(), expected);
        assert_eq!(parse("2024-05-01T10:00:00+02:00").unwrap(), expected);
        assert_eq!(parse("2024-05-01T08:00:00").unwrap(), expected);
        assert!(parse("yesterday").is_err());
    }
}
