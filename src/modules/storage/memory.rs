//! In-memory [`ObjectStorage`] used by tests, with failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::modules::storage::{ObjectStorage, StorageError, StorageResult};

#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    puts: AtomicUsize,
    fail_put_after: Mutex<Option<usize>>,
    fail_get: Mutex<bool>,
    fail_delete: Mutex<bool>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` uploads succeed, then fail every following one
    pub fn fail_puts_after(&self, n: usize) {
        *self.fail_put_after.lock().unwrap() = Some(n);
    }

    pub fn fail_gets(&self) {
        *self.fail_get.lock().unwrap() = true;
    }

    pub fn fail_deletes(&self) {
        *self.fail_delete.lock().unwrap() = true;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn insert(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        let attempt = self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = *self.fail_put_after.lock().unwrap() {
            if attempt >= limit {
                return Err(StorageError::UploadFailed(format!("'{}': injected", key)));
            }
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>> {
        if *self.fail_get.lock().unwrap() {
            return Err(StorageError::DownloadFailed(format!("'{}': injected", key)));
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn signed_url(&self, key: &str, ttl_secs: u32) -> StorageResult<String> {
        if !self.contains(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(format!("memory://documents/{}?expires={}", key, ttl_secs))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        if *self.fail_delete.lock().unwrap() {
            return Err(StorageError::DeleteFailed(format!("'{}': injected", key)));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
