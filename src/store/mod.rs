//! Metadata store interface
//!
//! The store owns persistence and revision tokens. The engine only decides
//! what to write; every write it issues is either a create-if-absent or a
//! patch guarded by the revision the caller last read.

mod file;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::errors::StoreError;
use crate::schemas::WorkflowMetadata;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Store result type
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Field changes applied by a patch; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_rank: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
}

impl Patch {
    pub fn new() -> Self {
        Patch::default()
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn order_rank(mut self, order_rank: impl Into<String>) -> Self {
        self.order_rank = Some(order_rank.into());
        self
    }

    pub fn assignees(mut self, assignees: Vec<String>) -> Self {
        self.assignees = Some(assignees);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.order_rank.is_none() && self.assignees.is_none()
    }

    /// Apply the changes to a record copy
    pub fn apply_to(&self, mut record: WorkflowMetadata) -> WorkflowMetadata {
        if let Some(state) = &self.state {
            record.state = state.clone();
        }
        if let Some(order_rank) = &self.order_rank {
            record.order_rank = Some(order_rank.clone());
        }
        if let Some(assignees) = &self.assignees {
            record.assignees = assignees.clone();
        }
        record
    }
}

/// One operation inside an atomic batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a record; fails the batch if it exists
    Create(WorkflowMetadata),
    /// Patch a record, guarded by `revision` when given
    Patch {
        document_id: String,
        revision: Option<String>,
        patch: Patch,
    },
    /// Delete a record, guarded by `revision` when given; fails the batch if it is absent
    Delete {
        document_id: String,
        revision: Option<String>,
    },
}

impl Operation {
    pub fn document_id(&self) -> &str {
        match self {
            Operation::Create(record) => &record.document_id,
            Operation::Patch { document_id, .. } | Operation::Delete { document_id, .. } => document_id,
        }
    }
}

/// A list of operations applied all-or-nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub operations: Vec<Operation>,
}

impl Batch {
    pub fn new() -> Self {
        Batch::default()
    }

    pub fn create(mut self, record: WorkflowMetadata) -> Self {
        self.operations.push(Operation::Create(record));
        self
    }

    pub fn patch(mut self, document_id: impl Into<String>, revision: Option<String>, patch: Patch) -> Self {
        self.operations.push(Operation::Patch {
            document_id: document_id.into(),
            revision,
            patch,
        });
        self
    }

    pub fn delete(mut self, document_id: impl Into<String>, revision: Option<String>) -> Self {
        self.operations.push(Operation::Delete {
            document_id: document_id.into(),
            revision,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Kind of change announced to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A committed change, delivered to every subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub kind: ChangeKind,
    pub document_id: String,
    /// The record after the change; `None` for deletions
    pub record: Option<WorkflowMetadata>,
}

impl StoreEvent {
    /// Whether the event concerns one of the tracked documents
    pub fn concerns(&self, tracked: &[String]) -> bool {
        tracked.iter().any(|id| *id == self.document_id)
    }
}

/// Persistence collaborator for workflow metadata
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Point read by content document id
    async fn get(&self, document_id: &str) -> StoreResult<Option<WorkflowMetadata>>;

    /// Every record, ordered by rank with unranked records first
    async fn list(&self) -> StoreResult<Vec<WorkflowMetadata>>;

    /// Records for the given content document ids
    async fn list_by_document_ids(&self, document_ids: &[String]) -> StoreResult<Vec<WorkflowMetadata>>;

    /// Create a record unless one exists; returns whichever record is stored
    async fn create_if_not_exists(&self, record: WorkflowMetadata) -> StoreResult<WorkflowMetadata>;

    /// Patch a record only if its revision still equals `revision`
    async fn patch_if_revision(
        &self,
        document_id: &str,
        revision: &str,
        patch: Patch,
    ) -> StoreResult<WorkflowMetadata>;

    /// Remove a record only if its revision still equals `revision`
    async fn delete_if_revision(&self, document_id: &str, revision: &str) -> StoreResult<()>;

    /// Apply a batch atomically; returns the number of operations applied
    async fn commit(&self, batch: Batch) -> StoreResult<usize>;

    /// Listen for committed changes
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}
