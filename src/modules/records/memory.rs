//! In-memory [`DocumentStore`] used by tests, with failure injection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::records::{
    DocumentFilter, DocumentRecord, DocumentStore, NewDocument, RecordResult, RecordStoreError,
    SortOrder,
};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    rows: Mutex<Vec<DocumentRecord>>,
    inserts: AtomicUsize,
    fail_insert_after: Mutex<Option<usize>>,
    fail_delete: Mutex<bool>,
    fail_select: Mutex<bool>,
    stale_count: Mutex<Option<i64>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` inserts succeed, then fail every following one
    pub fn fail_inserts_after(&self, n: usize) {
        *self.fail_insert_after.lock().unwrap() = Some(n);
    }

    pub fn fail_deletes(&self) {
        *self.fail_delete.lock().unwrap() = true;
    }

    pub fn fail_selects(&self) {
        *self.fail_select.lock().unwrap() = true;
    }

    /// Report `n` from `count_for_owner`, as if a concurrent upload landed
    /// after the caller's pre-check
    pub fn report_stale_count(&self, n: i64) {
        *self.stale_count.lock().unwrap() = Some(n);
    }

    /// Insert a row directly, bypassing the quota guard
    pub fn seed(
        &self,
        user_id: &str,
        document_name: &str,
        document_type: &str,
        created_at: DateTime<Utc>,
    ) -> DocumentRecord {
        let record = DocumentRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            document_name: document_name.to_string(),
            document_type: document_type.to_string(),
            file_path: format!(
                "{}/{}-{}",
                user_id,
                created_at.timestamp_millis(),
                document_name
            ),
            file_size: 1024,
            status: "success".to_string(),
            created_at,
            extracted_text: None,
        };
        self.rows.lock().unwrap().push(record.clone());
        record
    }

    pub fn set_extracted_text(&self, id: Uuid, text: &str) {
        if let Some(row) = self.rows.lock().unwrap().iter_mut().find(|r| r.id == id) {
            row.extracted_text = Some(text.to_string());
        }
    }

    pub fn all(&self) -> Vec<DocumentRecord> {
        self.rows.lock().unwrap().clone()
    }
}

fn injected() -> RecordStoreError {
    RecordStoreError::Backend(sqlx::Error::Protocol("injected failure".to_string()))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_within_quota(
        &self,
        doc: NewDocument,
        limit: i64,
    ) -> RecordResult<DocumentRecord> {
        let attempt = self.inserts.fetch_add(1, Ordering::SeqCst);
        if let Some(n) = *self.fail_insert_after.lock().unwrap() {
            if attempt >= n {
                return Err(injected());
            }
        }

        let mut rows = self.rows.lock().unwrap();
        let current = rows.iter().filter(|r| r.user_id == doc.user_id).count() as i64;
        if current >= limit {
            return Err(RecordStoreError::QuotaExceeded { current, limit });
        }

        let record = DocumentRecord {
            id: Uuid::new_v4(),
            user_id: doc.user_id,
            document_name: doc.document_name,
            document_type: doc.document_type,
            file_path: doc.file_path,
            file_size: doc.file_size,
            status: doc.status,
            created_at: Utc::now(),
            extracted_text: None,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn select_all(
        &self,
        filter: &DocumentFilter,
        order: Option<SortOrder>,
    ) -> RecordResult<Vec<DocumentRecord>> {
        if *self.fail_select.lock().unwrap() {
            return Err(injected());
        }

        let mut rows: Vec<DocumentRecord> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| match filter.user_id {
                Some(ref user_id) => &r.user_id == user_id,
                None => true,
            })
            .cloned()
            .collect();

        match order {
            Some(SortOrder::Asc) => rows.sort_by_key(|r| r.created_at),
            Some(SortOrder::Desc) => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            None => {}
        }

        Ok(rows)
    }

    async fn count_for_owner(&self, user_id: &str) -> RecordResult<i64> {
        if *self.fail_select.lock().unwrap() {
            return Err(injected());
        }
        if let Some(n) = *self.stale_count.lock().unwrap() {
            return Ok(n);
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .count() as i64)
    }

    async fn find_by_id(&self, id: Uuid) -> RecordResult<Option<DocumentRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> RecordResult<()> {
        if *self.fail_delete.lock().unwrap() {
            return Err(injected());
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(RecordStoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_doc(user_id: &str, name: &str) -> NewDocument {
        NewDocument {
            user_id: user_id.to_string(),
            document_name: name.to_string(),
            document_type: "resume".to_string(),
            file_path: format!("{}/1-{}", user_id, name),
            file_size: 10,
            status: "success".to_string(),
        }
    }

    #[tokio::test]
    async fn test_guarded_insert_counts_per_owner() {
        let store = InMemoryDocumentStore::new();
        store.insert_within_quota(new_doc("a", "1"), 1).await.unwrap();
        store.insert_within_quota(new_doc("b", "1"), 1).await.unwrap();

        let err = store
            .insert_within_quota(new_doc("a", "2"), 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RecordStoreError::QuotaExceeded {
                current: 1,
                limit: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_select_all_orders_by_created_at() {
        let store = InMemoryDocumentStore::new();
        let now = Utc::now();
        store.seed("a", "old.pdf", "resume", now - chrono::Duration::hours(2));
        store.seed("a", "new.pdf", "resume", now);
        store.seed("b", "other.pdf", "resume", now);

        let filter = DocumentFilter::owned_by("a");
        let desc = store.select_all(&filter, Some(SortOrder::Desc)).await.unwrap();
        assert_eq!(desc[0].document_name, "new.pdf");

        let asc = store.select_all(&filter, Some(SortOrder::Asc)).await.unwrap();
        assert_eq!(asc[0].document_name, "old.pdf");
        assert_eq!(asc.len(), 2);
    }
}
