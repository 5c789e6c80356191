use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::modules::records::{
    DocumentFilter, DocumentRecord, DocumentStore, NewDocument, RecordResult, RecordStoreError,
    SortOrder,
};

const DOCUMENT_COLUMNS: &str = "id, user_id, document_name, document_type, file_path, \
     file_size, status, created_at, extracted_text";

/// Postgres-backed [`DocumentStore`] over the `documents` table
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_within_quota(
        &self,
        doc: NewDocument,
        limit: i64,
    ) -> RecordResult<DocumentRecord> {
        let mut tx = self.pool.begin().await?;

        // Serializes inserts per owner until commit, so count + insert is atomic
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(&doc.user_id)
            .execute(&mut *tx)
            .await?;

        let current: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE user_id = $1")
            .bind(&doc.user_id)
            .fetch_one(&mut *tx)
            .await?;

        if current >= limit {
            tx.rollback().await?;
            debug!(
                "Refused insert for user {}: {} of {} documents stored",
                doc.user_id, current, limit
            );
            return Err(RecordStoreError::QuotaExceeded { current, limit });
        }

        let query = format!(
            r#"
            INSERT INTO documents (user_id, document_name, document_type, file_path, file_size, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        );

        let record: DocumentRecord = sqlx::query_as(&query)
            .bind(&doc.user_id)
            .bind(&doc.document_name)
            .bind(&doc.document_type)
            .bind(&doc.file_path)
            .bind(doc.file_size)
            .bind(&doc.status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Document record inserted: id={}, user={}, path={}",
            record.id, record.user_id, record.file_path
        );

        Ok(record)
    }

    async fn select_all(
        &self,
        filter: &DocumentFilter,
        order: Option<SortOrder>,
    ) -> RecordResult<Vec<DocumentRecord>> {
        let where_clause = if filter.user_id.is_some() {
            "WHERE user_id = $1"
        } else {
            ""
        };
        let order_clause = order
            .map(|o| format!("ORDER BY created_at {}", o.as_sql()))
            .unwrap_or_default();

        let query = format!(
            "SELECT {} FROM documents {} {}",
            DOCUMENT_COLUMNS, where_clause, order_clause
        );

        let mut q = sqlx::query_as::<_, DocumentRecord>(&query);
        if let Some(ref user_id) = filter.user_id {
            q = q.bind(user_id);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn count_for_owner(&self, user_id: &str) -> RecordResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> RecordResult<Option<DocumentRecord>> {
        let query = format!("SELECT {} FROM documents WHERE id = $1", DOCUMENT_COLUMNS);

        let record = sqlx::query_as::<_, DocumentRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn delete_by_id(&self, id: Uuid) -> RecordResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RecordStoreError::NotFound(id));
        }

        info!("Document record deleted: id={}", id);
        Ok(())
    }
}
