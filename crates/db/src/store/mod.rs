//! Document storage backends.
//!
//! Records are persisted as JSON documents in named collections behind the
//! [`DocumentStore`] trait. Two implementations exist:
//!
//! - [`MemoryStore`](memory::MemoryStore): volatile, in-process, no unique
//!   indexes.
//! - [`PgDocumentStore`](postgres::PgDocumentStore): durable, PostgreSQL
//!   JSONB, enforces unique `build_id` on build logs.
//!
//! Which one is used is decided once at startup by
//! [`open_store`](crate::open_store); callers only ever see the trait.

pub mod memory;
pub mod postgres;

use std::cmp::Ordering;

use async_trait::async_trait;
use fwhub_core::retention::Retention;
use fwhub_core::types::RecordId;
use serde_json::{Map, Value};

/// A stored record: a JSON object with an `id` field.
pub type Document = Map<String, Value>;

/// Field every document carries its identifier in.
pub const ID_FIELD: &str = "id";

/// The collections this service persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    BuildLogs,
    GeneratedCode,
}

impl Collection {
    pub const fn name(self) -> &'static str {
        match self {
            Self::BuildLogs => "build_logs",
            Self::GeneratedCode => "generated_code",
        }
    }
}

/// Which backend is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Volatile,
    Durable,
}

impl StorageKind {
    /// Label reported by the health endpoint.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Volatile => "in-memory",
            Self::Durable => "postgres",
        }
    }
}

/// Exact-match conjunction over top-level document fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Document,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.to_string(), value.into());
        self
    }

    /// Require `field` to equal `value` when a value is given.
    pub fn eq_opt(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }

    /// The conditions as a JSON object (used for JSONB containment).
    pub fn as_document(&self) -> &Document {
        &self.conditions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn descending(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    pub const fn ascending(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }
}

/// Sort and window applied to a `find`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// `None` keeps insertion order.
    pub sort: Option<SortSpec>,
    pub skip: u64,
    /// `None` means no limit.
    pub limit: Option<u64>,
}

/// Result of a capacity-bounded insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    pub id: RecordId,
    /// Number of oldest documents removed to make room.
    pub evicted: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique index rejected the write. Only the durable backend raises this.
    #[error("Duplicate key in {collection}: {detail}")]
    DuplicateKey {
        collection: &'static str,
        detail: String,
    },

    /// A stored document does not match the record shape.
    #[error("Corrupt document in {collection}: {detail}")]
    Corrupt {
        collection: &'static str,
        detail: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage contract shared by the volatile and durable backends.
///
/// Every method is a single step from the caller's point of view; in
/// particular [`insert_bounded`](Self::insert_bounded) is atomic with
/// respect to other writers on the same collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn kind(&self) -> StorageKind;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Persist `doc`, assigning an id if it has none, and return the id.
    async fn insert(&self, collection: Collection, doc: Document) -> StoreResult<RecordId>;

    /// Evict the oldest documents per `retention`, then insert `doc`, as one
    /// atomic step. The collection never holds more than
    /// `retention.capacity` documents afterwards.
    async fn insert_bounded(
        &self,
        collection: Collection,
        doc: Document,
        retention: Retention,
    ) -> StoreResult<InsertOutcome>;

    /// Matching documents, sorted, then windowed by skip/limit. A snapshot,
    /// not a live cursor.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// First matching document in insertion order.
    async fn find_one(&self, collection: Collection, filter: &Filter)
        -> StoreResult<Option<Document>>;

    /// Shallow-merge `patch` into the first matching document. Null fields
    /// and the id field in `patch` are ignored. Returns whether a document
    /// matched.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Document,
    ) -> StoreResult<bool>;

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<bool>;

    /// Returns the number of documents removed.
    async fn delete_many(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    /// Release backend resources on shutdown.
    async fn close(&self) {}
}

/// Make sure `doc` carries an id, generating a UUIDv7 if it has none.
pub(crate) fn assign_id(doc: &mut Document) -> RecordId {
    match doc.get(ID_FIELD).and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            let id = uuid::Uuid::now_v7().to_string();
            doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    }
}

/// Drop fields an update must never apply.
pub(crate) fn sanitize_patch(mut patch: Document) -> Document {
    patch.remove(ID_FIELD);
    patch.retain(|_, value| !value.is_null());
    patch
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Order two (possibly missing) field values.
///
/// Missing sorts as null; null < bool < number < string; strings compare
/// byte-wise.
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
