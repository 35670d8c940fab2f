//! Repository for the `build_logs` collection.

use fwhub_core::types::RecordId;

use crate::models::build_log::{BuildLog, BuildLogFilter, CreateBuildLog, UpdateBuildLog};
use crate::models::document::{from_document, to_document};
use crate::store::{Collection, DocumentStore, Filter, FindOptions, SortSpec, StoreResult};

const COLLECTION: Collection = Collection::BuildLogs;

/// Default page size for build log listing.
pub const DEFAULT_LIMIT: u64 = 100;

/// Newest first.
const SORT: SortSpec = SortSpec::descending("start_time");

fn by_build_id(build_id: &str) -> Filter {
    Filter::all().eq("build_id", build_id)
}

/// Provides CRUD operations for build logs. Build logs are addressed by
/// their caller-supplied `build_id`, not the store id.
pub struct BuildLogRepo;

impl BuildLogRepo {
    /// Insert a new build log, returning its store id.
    ///
    /// The durable backend rejects a second log with the same `build_id`
    /// with [`StoreError::DuplicateKey`](crate::store::StoreError::DuplicateKey);
    /// the volatile backend accepts it.
    pub async fn create(store: &dyn DocumentStore, input: &CreateBuildLog) -> StoreResult<RecordId> {
        store.insert(COLLECTION, to_document(input)?).await
    }

    /// List build logs, newest `start_time` first, with optional exact-match
    /// filters on status and type.
    pub async fn list(
        store: &dyn DocumentStore,
        filter: &BuildLogFilter,
        skip: Option<u64>,
        limit: Option<u64>,
    ) -> StoreResult<Vec<BuildLog>> {
        let filter = Filter::all()
            .eq_opt("status", filter.status.as_deref())
            .eq_opt("type", filter.build_type.as_deref());
        let options = FindOptions {
            sort: Some(SORT),
            skip: skip.unwrap_or(0),
            limit: Some(super::clamp_limit(limit, DEFAULT_LIMIT)),
        };
        store
            .find(COLLECTION, &filter, options)
            .await?
            .into_iter()
            .map(|doc| from_document(COLLECTION, doc))
            .collect()
    }

    /// Find a build log by `build_id`. With duplicates in the volatile
    /// store, the earliest inserted wins.
    pub async fn find_by_build_id(
        store: &dyn DocumentStore,
        build_id: &str,
    ) -> StoreResult<Option<BuildLog>> {
        store
            .find_one(COLLECTION, &by_build_id(build_id))
            .await?
            .map(|doc| from_document(COLLECTION, doc))
            .transpose()
    }

    /// Apply the supplied fields of `input`. Returns `false` if no log has
    /// this `build_id`. An empty update on an existing log succeeds.
    pub async fn update(
        store: &dyn DocumentStore,
        build_id: &str,
        input: &UpdateBuildLog,
    ) -> StoreResult<bool> {
        store
            .update_one(COLLECTION, &by_build_id(build_id), to_document(input)?)
            .await
    }

    /// Delete one build log. Returns `true` if a log was removed.
    pub async fn delete(store: &dyn DocumentStore, build_id: &str) -> StoreResult<bool> {
        store.delete_one(COLLECTION, &by_build_id(build_id)).await
    }

    /// Delete every build log, returning how many were removed.
    pub async fn delete_all(store: &dyn DocumentStore) -> StoreResult<u64> {
        store.delete_many(COLLECTION, &Filter::all()).await
    }

    /// Count build logs matching optional status and type filters.
    pub async fn count(
        store: &dyn DocumentStore,
        status: Option<&str>,
        build_type: Option<&str>,
    ) -> StoreResult<u64> {
        let filter = Filter::all()
            .eq_opt("status", status)
            .eq_opt("type", build_type);
        store.count(COLLECTION, &filter).await
    }
}
