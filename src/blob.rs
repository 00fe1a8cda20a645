use crate::Result;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::debug;
use uuid::Uuid;

/// Locally held binary results, addressed by handle.
///
/// Every stored blob is owned by exactly one [`BlobHandle`]; dropping the
/// handle releases the blob.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    blobs: Arc<Mutex<HashMap<Uuid, StoredBlob>>>,
}

#[derive(Debug)]
struct StoredBlob {
    content_type: String,
    data: Arc<[u8]>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, content_type: impl Into<String>, data: Vec<u8>) -> BlobHandle {
        let id = Uuid::new_v4();
        let content_type = content_type.into();
        debug!("Creating blob {} ({}, {} bytes)", id, content_type, data.len());

        self.lock().insert(
            id,
            StoredBlob {
                content_type,
                data: data.into(),
            },
        );

        BlobHandle {
            id,
            store: self.clone(),
        }
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn release(&self, id: &Uuid) {
        if self.lock().remove(id).is_some() {
            debug!("Released blob {}", id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, StoredBlob>> {
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Owned reference to a blob in a [`BlobStore`].
#[derive(Debug)]
pub struct BlobHandle {
    id: Uuid,
    store: BlobStore,
}

impl BlobHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Object-URL style name for the blob, stable for the handle's lifetime.
    pub fn url(&self) -> String {
        format!("blob:inference-hub/{}", self.id)
    }

    pub fn content_type(&self) -> Option<String> {
        self.store
            .lock()
            .get(&self.id)
            .map(|blob| blob.content_type.clone())
    }

    pub fn data(&self) -> Option<Arc<[u8]>> {
        self.store.lock().get(&self.id).map(|blob| blob.data.clone())
    }

    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self
            .data()
            .ok_or_else(|| crate::Error::blob(format!("Blob {} is no longer available", self.id)))?;
        tokio::fs::write(path, &data[..]).await?;
        Ok(())
    }
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        self.store.release(&self.id);
    }
}
