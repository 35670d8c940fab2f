//! Durable document store on PostgreSQL JSONB.
//!
//! All collections share the `documents` table. Filters use JSONB
//! containment, sorting uses the field's text form under the `C` collation
//! (timestamps are written fixed-width, so byte order is time order). The
//! partial unique index `uq_documents_build_logs_build_id` rejects duplicate
//! build ids.

use async_trait::async_trait;
use fwhub_core::retention::Retention;
use fwhub_core::types::RecordId;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};

use super::{
    assign_id, sanitize_patch, Collection, Document, DocumentStore, Filter, FindOptions,
    InsertOutcome, SortDirection, SortSpec, StorageKind, StoreError, StoreResult,
};

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `ORDER BY` clause for an optional sort. Null values sort lowest, matching
/// the volatile backend; insertion order breaks ties.
fn order_clause(sort: Option<SortSpec>) -> String {
    match sort {
        None => "ORDER BY seq ASC".to_string(),
        Some(spec) => {
            let (dir, nulls) = match spec.direction {
                SortDirection::Ascending => ("ASC", "NULLS FIRST"),
                SortDirection::Descending => ("DESC", "NULLS LAST"),
            };
            format!("ORDER BY (body ->> '{}') COLLATE \"C\" {dir} {nulls}, seq ASC", spec.field)
        }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Turn a unique violation into [`StoreError::DuplicateKey`].
fn classify_write_error(collection: Collection, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return StoreError::DuplicateKey {
                collection: collection.name(),
                detail: format!("unique constraint {constraint} violated"),
            };
        }
    }
    StoreError::Database(err)
}

async fn insert_row<'e, E>(
    executor: E,
    collection: Collection,
    id: &str,
    doc: &Document,
) -> StoreResult<()>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
        .bind(collection.name())
        .bind(id)
        .bind(Json(doc))
        .execute(executor)
        .await
        .map_err(|e| classify_write_error(collection, e))?;
    Ok(())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Durable
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, collection: Collection, mut doc: Document) -> StoreResult<RecordId> {
        let id = assign_id(&mut doc);
        insert_row(&self.pool, collection, &id, &doc).await?;
        Ok(id)
    }

    async fn insert_bounded(
        &self,
        collection: Collection,
        mut doc: Document,
        retention: Retention,
    ) -> StoreResult<InsertOutcome> {
        let id = assign_id(&mut doc);
        let mut tx = self.pool.begin().await?;

        // Serialise bounded inserts per collection until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(collection.name())
            .execute(&mut *tx)
            .await?;

        let current: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
                .bind(collection.name())
                .fetch_one(&mut *tx)
                .await?;

        let evict = retention.evictions_before_insert(usize::try_from(current).unwrap_or(0));
        let mut evicted = 0;
        if evict > 0 {
            let query = format!(
                "DELETE FROM documents WHERE collection = $1 AND id IN ( \
                     SELECT id FROM documents WHERE collection = $1 \
                     {} LIMIT $2 \
                 )",
                order_clause(Some(SortSpec::ascending(retention.order_by)))
            );
            evicted = sqlx::query(&query)
                .bind(collection.name())
                .bind(i64::try_from(evict).unwrap_or(i64::MAX))
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(
                collection = collection.name(),
                evicted,
                "Evicted oldest documents to stay within capacity"
            );
        }

        insert_row(&mut *tx, collection, &id, &doc).await?;
        tx.commit().await?;

        Ok(InsertOutcome { id, evicted })
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let query = format!(
            "SELECT body FROM documents \
             WHERE collection = $1 AND body @> $2 \
             {} OFFSET $3 LIMIT $4",
            order_clause(options.sort)
        );
        let rows = sqlx::query_scalar::<_, Json<Document>>(&query)
            .bind(collection.name())
            .bind(Json(filter.as_document()))
            .bind(to_i64(options.skip))
            .bind(options.limit.map(to_i64))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let row = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents \
             WHERE collection = $1 AND body @> $2 \
             ORDER BY seq ASC LIMIT 1",
        )
        .bind(collection.name())
        .bind(Json(filter.as_document()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Document,
    ) -> StoreResult<bool> {
        let patch = sanitize_patch(patch);
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3 \
             WHERE collection = $1 AND id = ( \
                 SELECT id FROM documents \
                 WHERE collection = $1 AND body @> $2 \
                 ORDER BY seq ASC LIMIT 1 \
             )",
        )
        .bind(collection.name())
        .bind(Json(filter.as_document()))
        .bind(Json(&patch))
        .execute(&self.pool)
        .await
        .map_err(|e| classify_write_error(collection, e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM documents \
             WHERE collection = $1 AND id = ( \
                 SELECT id FROM documents \
                 WHERE collection = $1 AND body @> $2 \
                 ORDER BY seq ASC LIMIT 1 \
             )",
        )
        .bind(collection.name())
        .bind(Json(filter.as_document()))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND body @> $2")
            .bind(collection.name())
            .bind(Json(filter.as_document()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM documents WHERE collection = $1 AND body @> $2",
        )
        .bind(collection.name())
        .bind(Json(filter.as_document()))
        .fetch_one(&self.pool)
        .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_clause_without_sort_uses_insertion_order() {
        assert_eq!(order_clause(None), "ORDER BY seq ASC");
    }

    #[test]
    fn order_clause_descending_puts_nulls_last() {
        assert_eq!(
            order_clause(Some(SortSpec::descending("start_time"))),
            "ORDER BY (body ->> 'start_time') COLLATE \"C\" DESC NULLS LAST, seq ASC"
        );
    }
}
