//! In-memory asset store for tests and local development.
//!
//! Records every call and supports forced failures so saga compensation
//! paths can be exercised without external infrastructure.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use folio_core::asset_policy::AssetKind;
use uuid::Uuid;

use crate::{AssetStore, StorageError, StoredObject};

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<String, usize>,
    upload_calls: u64,
    delete_calls: Vec<String>,
}

/// An in-memory [`AssetStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent delete fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of blobs currently held.
    pub fn object_count(&self) -> usize {
        self.inner.lock().unwrap().objects.len()
    }

    /// Whether a blob with this key is currently held.
    pub fn contains(&self, storage_key: &str) -> bool {
        self.inner.lock().unwrap().objects.contains_key(storage_key)
    }

    /// Total number of upload calls observed.
    pub fn upload_attempts(&self) -> u64 {
        self.inner.lock().unwrap().upload_calls
    }

    /// Keys passed to delete, in call order (including failed attempts).
    pub fn delete_attempts(&self) -> Vec<String> {
        self.inner.lock().unwrap().delete_calls.clone()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    fn provider(&self) -> &'static str {
        "memory"
    }

    async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
        _kind: AssetKind,
    ) -> Result<StoredObject, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.upload_calls += 1;

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Upload("forced upload failure".into()));
        }

        let key = format!("{folder}/{}-{file_name}", Uuid::new_v4());
        inner.objects.insert(key.clone(), data.len());
        Ok(StoredObject {
            url: format!("memory://{key}"),
            storage_key: key,
        })
    }

    async fn delete(&self, storage_key: &str, _kind: AssetKind) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.delete_calls.push(storage_key.to_string());

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Delete("forced delete failure".into()));
        }

        // Unknown keys are a no-op, matching the idempotence contract.
        inner.objects.remove(storage_key);
        Ok(())
    }
}
