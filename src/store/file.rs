//! Metadata store persisted to a JSON file
//!
//! Records live in memory and the whole set is rewritten atomically after
//! every successful write.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::errors::{KanflowError, Result, StoreError};
use crate::fs;
use crate::schemas::WorkflowMetadata;

use super::{Batch, MemoryStore, MetadataStore, Patch, StoreEvent, StoreResult};

/// Metadata store backed by `.kanflow/metadata.json`
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records: Vec<WorkflowMetadata> = match fs::read_json(&path) {
            Ok(records) => records,
            Err(KanflowError::FileNotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        tracing::debug!(path = %path.display(), records = records.len(), "opened metadata store");
        Ok(JsonFileStore {
            path,
            inner: MemoryStore::with_records(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> StoreResult<()> {
        let records = self.inner.snapshot().await;
        fs::write_json(&self.path, &records).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to persist metadata");
            StoreError::Unavailable(e.to_string())
        })
    }
}

#[async_trait]
impl MetadataStore for JsonFileStore {
    async fn get(&self, document_id: &str) -> StoreResult<Option<WorkflowMetadata>> {
        self.inner.get(document_id).await
    }

    async fn list(&self) -> StoreResult<Vec<WorkflowMetadata>> {
        self.inner.list().await
    }

    async fn list_by_document_ids(&self, document_ids: &[String]) -> StoreResult<Vec<WorkflowMetadata>> {
        self.inner.list_by_document_ids(document_ids).await
    }

    async fn create_if_not_exists(&self, record: WorkflowMetadata) -> StoreResult<WorkflowMetadata> {
        let stored = self.inner.create_if_not_exists(record).await?;
        self.persist().await?;
        Ok(stored)
    }

    async fn patch_if_revision(
        &self,
        document_id: &str,
        revision: &str,
        patch: Patch,
    ) -> StoreResult<WorkflowMetadata> {
        let stored = self.inner.patch_if_revision(document_id, revision, patch).await?;
        self.persist().await?;
        Ok(stored)
    }

    async fn delete_if_revision(&self, document_id: &str, revision: &str) -> StoreResult<()> {
        self.inner.delete_if_revision(document_id, revision).await?;
        self.persist().await
    }

    async fn commit(&self, batch: Batch) -> StoreResult<usize> {
        let count = self.inner.commit(batch).await?;
        self.persist().await?;
        Ok(count)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.subscribe()
    }
}
