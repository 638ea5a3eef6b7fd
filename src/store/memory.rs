//! In-memory metadata store
//!
//! Issues monotonically increasing revision tokens and applies batches to a
//! scratch copy before swapping it in, so a failed batch leaves no trace.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::errors::StoreError;
use crate::schemas::WorkflowMetadata;

use super::{Batch, ChangeKind, MetadataStore, Operation, Patch, StoreEvent, StoreResult};

const REVISION_PREFIX: &str = "rev-";
const EVENT_CAPACITY: usize = 256;

struct Inner {
    /// Keyed by content document id
    records: BTreeMap<String, WorkflowMetadata>,
    last_revision: u64,
    fail_next: Option<StoreError>,
}

impl Inner {
    fn issue_revision(&mut self) -> String {
        self.last_revision += 1;
        format!("{}{}", REVISION_PREFIX, self.last_revision)
    }

    fn take_failure(&mut self) -> StoreResult<()> {
        match self.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn stamp(&mut self, mut record: WorkflowMetadata) -> WorkflowMetadata {
        record.revision = self.issue_revision();
        record.updated_at = chrono::Utc::now().to_rfc3339();
        record
    }

    /// The stored record, if its revision matches `expected` when one is given
    fn current(&self, document_id: &str, expected: Option<String>) -> StoreResult<WorkflowMetadata> {
        let current = self
            .records
            .get(document_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))?;
        match expected {
            Some(expected) if expected != current.revision => Err(StoreError::RevisionMismatch {
                id: current.id,
                expected,
                actual: current.revision,
            }),
            _ => Ok(current),
        }
    }

    fn apply(&mut self, operation: Operation) -> StoreResult<StoreEvent> {
        match operation {
            Operation::Create(record) => {
                if self.records.contains_key(&record.document_id) {
                    return Err(StoreError::AlreadyExists(record.id));
                }
                let record = self.stamp(record);
                self.records.insert(record.document_id.clone(), record.clone());
                Ok(StoreEvent {
                    kind: ChangeKind::Created,
                    document_id: record.document_id.clone(),
                    record: Some(record),
                })
            }
            Operation::Patch {
                document_id,
                revision,
                patch,
            } => {
                let current = self.current(&document_id, revision)?;
                let record = self.stamp(patch.apply_to(current));
                self.records.insert(document_id.clone(), record.clone());
                Ok(StoreEvent {
                    kind: ChangeKind::Updated,
                    document_id,
                    record: Some(record),
                })
            }
            Operation::Delete {
                document_id,
                revision,
            } => {
                self.current(&document_id, revision)?;
                self.records.remove(&document_id);
                Ok(StoreEvent {
                    kind: ChangeKind::Deleted,
                    document_id,
                    record: None,
                })
            }
        }
    }
}

/// Metadata store held entirely in memory
pub struct MemoryStore {
    inner: RwLock<Inner>,
    events: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore::with_records(Vec::new())
    }

    /// Create a store seeded with records. Records without a revision get one.
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = WorkflowMetadata>,
    {
        let mut inner = Inner {
            records: BTreeMap::new(),
            last_revision: 0,
            fail_next: None,
        };

        let records: Vec<WorkflowMetadata> = records.into_iter().collect();
        inner.last_revision = records
            .iter()
            .filter_map(|r| r.revision.strip_prefix(REVISION_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        for mut record in records {
            if record.revision.is_empty() {
                record.revision = inner.issue_revision();
            }
            inner.records.insert(record.document_id.clone(), record);
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        MemoryStore {
            inner: RwLock::new(inner),
            events,
        }
    }

    /// Make the next write fail with `error`, as a flaky backend would
    pub async fn fail_next_write(&self, error: StoreError) {
        self.inner.write().await.fail_next = Some(error);
    }

    /// Copy of every record, in document id order
    pub async fn snapshot(&self) -> Vec<WorkflowMetadata> {
        self.inner.read().await.records.values().cloned().collect()
    }

    fn publish(&self, events: Vec<StoreEvent>) {
        for event in events {
            // No subscribers is not an error
            let _ = self.events.send(event);
        }
    }

    async fn write(&self, operation: Operation) -> StoreResult<WorkflowMetadata> {
        let event = {
            let mut inner = self.inner.write().await;
            inner.take_failure()?;
            inner.apply(operation)?
        };
        let record = event.record.clone();
        self.publish(vec![event]);
        record.ok_or_else(|| StoreError::Unavailable("write returned no record".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_by_rank(records: &mut [WorkflowMetadata]) {
    records.sort_by(|a, b| {
        a.order_rank
            .cmp(&b.order_rank)
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn get(&self, document_id: &str) -> StoreResult<Option<WorkflowMetadata>> {
        Ok(self.inner.read().await.records.get(document_id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<WorkflowMetadata>> {
        let mut records = self.snapshot().await;
        sort_by_rank(&mut records);
        Ok(records)
    }

    async fn list_by_document_ids(&self, document_ids: &[String]) -> StoreResult<Vec<WorkflowMetadata>> {
        let inner = self.inner.read().await;
        let mut records: Vec<WorkflowMetadata> = document_ids
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect();
        sort_by_rank(&mut records);
        Ok(records)
    }

    async fn create_if_not_exists(&self, record: WorkflowMetadata) -> StoreResult<WorkflowMetadata> {
        if let Some(existing) = self.get(&record.document_id).await? {
            return Ok(existing);
        }
        match self.write(Operation::Create(record.clone())).await {
            // Lost a race with another creator: report the winner
            Err(StoreError::AlreadyExists(_)) => self
                .get(&record.document_id)
                .await?
                .ok_or_else(|| StoreError::NotFound(record.document_id)),
            other => other,
        }
    }

    async fn patch_if_revision(
        &self,
        document_id: &str,
        revision: &str,
        patch: Patch,
    ) -> StoreResult<WorkflowMetadata> {
        self.write(Operation::Patch {
            document_id: document_id.to_string(),
            revision: Some(revision.to_string()),
            patch,
        })
        .await
    }

    async fn delete_if_revision(&self, document_id: &str, revision: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.take_failure()?;
        let event = inner.apply(Operation::Delete {
            document_id: document_id.to_string(),
            revision: Some(revision.to_string()),
        })?;
        drop(inner);
        self.publish(vec![event]);
        Ok(())
    }

    async fn commit(&self, batch: Batch) -> StoreResult<usize> {
        let count = batch.len();
        let events = {
            let mut inner = self.inner.write().await;
            inner.take_failure()?;

            let mut scratch = Inner {
                records: inner.records.clone(),
                last_revision: inner.last_revision,
                fail_next: None,
            };
            let events = batch
                .operations
                .into_iter()
                .map(|op| scratch.apply(op))
                .collect::<StoreResult<Vec<StoreEvent>>>()?;

            inner.records = scratch.records;
            inner.last_revision = scratch.last_revision;
            events
        };
        self.publish(events);
        Ok(count)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
