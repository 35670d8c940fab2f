//! Repository for the `generated_code` collection.
//!
//! The collection is bounded: inserting beyond
//! [`GENERATED_CODE_CAPACITY`] evicts the entries with the oldest
//! `created_at` in the same atomic step.

use chrono::Utc;
use fwhub_core::retention::{Retention, GENERATED_CODE_CAPACITY};

use crate::models::document::{from_document, to_document};
use crate::models::generated_code::{CreateGeneratedCode, GeneratedCode};
use crate::store::{
    Collection, DocumentStore, Filter, FindOptions, InsertOutcome, SortSpec, StoreResult,
    ID_FIELD,
};

const COLLECTION: Collection = Collection::GeneratedCode;

/// Default page size for generated code listing.
pub const DEFAULT_LIMIT: u64 = GENERATED_CODE_CAPACITY as u64;

const RETENTION: Retention = Retention::new(GENERATED_CODE_CAPACITY, "created_at");

fn by_id(id: &str) -> Filter {
    Filter::all().eq(ID_FIELD, id)
}

/// Provides create/list/delete for generated code entries.
pub struct GeneratedCodeRepo;

impl GeneratedCodeRepo {
    /// Save a new entry, evicting the oldest entries beyond capacity.
    pub async fn create(
        store: &dyn DocumentStore,
        input: CreateGeneratedCode,
    ) -> StoreResult<InsertOutcome> {
        let doc = to_document(&input.into_new(Utc::now()))?;
        let outcome = store.insert_bounded(COLLECTION, doc, RETENTION).await?;
        if outcome.evicted > 0 {
            tracing::info!(
                evicted = outcome.evicted,
                capacity = GENERATED_CODE_CAPACITY,
                "Evicted oldest generated code entries"
            );
        }
        Ok(outcome)
    }

    /// List entries, newest `created_at` first.
    pub async fn list(
        store: &dyn DocumentStore,
        skip: Option<u64>,
        limit: Option<u64>,
    ) -> StoreResult<Vec<GeneratedCode>> {
        let options = FindOptions {
            sort: Some(SortSpec::descending("created_at")),
            skip: skip.unwrap_or(0),
            limit: Some(super::clamp_limit(limit, DEFAULT_LIMIT)),
        };
        store
            .find(COLLECTION, &Filter::all(), options)
            .await?
            .into_iter()
            .map(|doc| from_document(COLLECTION, doc))
            .collect()
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: &str,
    ) -> StoreResult<Option<GeneratedCode>> {
        store
            .find_one(COLLECTION, &by_id(id))
            .await?
            .map(|doc| from_document(COLLECTION, doc))
            .transpose()
    }

    /// Delete one entry by id. Returns `true` if an entry was removed.
    pub async fn delete(store: &dyn DocumentStore, id: &str) -> StoreResult<bool> {
        store.delete_one(COLLECTION, &by_id(id)).await
    }

    /// Delete every entry, returning how many were removed.
    pub async fn delete_all(store: &dyn DocumentStore) -> StoreResult<u64> {
        store.delete_many(COLLECTION, &Filter::all()).await
    }

    pub async fn count(store: &dyn DocumentStore) -> StoreResult<u64> {
        store.count(COLLECTION, &Filter::all()).await
    }
}
