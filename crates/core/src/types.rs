/// Records are keyed by opaque, store-assigned string identifiers.
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
