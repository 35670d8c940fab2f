//! Volatile in-process document store.
//!
//! All collections sit behind one `RwLock`, and every operation completes
//! under a single lock acquisition. That makes the bounded insert's
//! count/evict/insert sequence atomic. Unique indexes are not enforced:
//! inserting two build logs with the same `build_id` succeeds here, unlike
//! the durable backend.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use fwhub_core::retention::Retention;
use fwhub_core::types::RecordId;
use tokio::sync::RwLock;

use super::{
    assign_id, compare_values, sanitize_patch, Collection, Document, DocumentStore, Filter,
    FindOptions, InsertOutcome, SortDirection, StorageKind, StoreResult,
};

/// Documents per collection, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Indices of the `n` oldest documents by `field` ascending; ties go to the
/// earlier insert.
fn oldest_indices(docs: &[Document], field: &str, n: usize) -> HashSet<usize> {
    let mut order: Vec<usize> = (0..docs.len()).collect();
    order.sort_by(|&a, &b| compare_values(docs[a].get(field), docs[b].get(field)));
    order.into_iter().take(n).collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Volatile
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, collection: Collection, mut doc: Document) -> StoreResult<RecordId> {
        let id = assign_id(&mut doc);
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc);
        Ok(id)
    }

    async fn insert_bounded(
        &self,
        collection: Collection,
        mut doc: Document,
        retention: Retention,
    ) -> StoreResult<InsertOutcome> {
        let id = assign_id(&mut doc);
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        let evict = retention.evictions_before_insert(docs.len());
        if evict > 0 {
            let doomed = oldest_indices(docs, retention.order_by, evict);
            let mut index = 0;
            docs.retain(|_| {
                let keep = !doomed.contains(&index);
                index += 1;
                keep
            });
            tracing::debug!(
                collection = collection.name(),
                evicted = evict,
                "Evicted oldest documents to stay within capacity"
            );
        }
        docs.push(doc);

        Ok(InsertOutcome {
            id,
            evicted: evict as u64,
        })
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Document> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();
        drop(collections);

        if let Some(sort) = options.sort {
            // Stable sort: ties keep insertion order.
            matched.sort_by(|a, b| {
                let ord = compare_values(a.get(sort.field), b.get(sort.field));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Document,
    ) -> StoreResult<bool> {
        let patch = sanitize_patch(patch);
        let mut collections = self.collections.write().await;
        let Some(target) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)))
        else {
            return Ok(false);
        };
        target.extend(patch);
        Ok(true)
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        Ok((before - docs.len()) as u64)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map_or(0, |docs| docs.iter().filter(|d| filter.matches(d)).count()) as u64)
    }
}
