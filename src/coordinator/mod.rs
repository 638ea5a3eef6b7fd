//! Move Coordinator
//!
//! Executes board changes against a [`MetadataStore`]: drag-and-drop moves
//! with a provisional projection and rollback, explicit state transitions,
//! entering and leaving the workflow, and assignee changes. Every write is a
//! create-if-absent or a revision-guarded patch; the coordinator holds no
//! state between calls beyond the board definition.

mod lifecycle;
mod moves;
mod projection;

use crate::domain::find_state;
use crate::errors::{KanflowError, Result};
use crate::schemas::{State, WorkflowMetadata};
use crate::store::MetadataStore;

pub use lifecycle::state_changed_message;
pub use moves::{MoveOutcome, MoveRequest};
pub use projection::{ColumnEntry, Projection};

/// Runs workflow operations for one board against one store
pub struct MoveCoordinator<S> {
    store: S,
    states: Vec<State>,
}

impl<S: MetadataStore> MoveCoordinator<S> {
    pub fn new(store: S, states: Vec<State>) -> Self {
        MoveCoordinator { store, states }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    fn target_state(&self, id: &str) -> Result<&State> {
        find_state(&self.states, id)
            .ok_or_else(|| KanflowError::NotFound(format!("Could not find target state {}", id)))
    }

    async fn require_record(&self, document_id: &str) -> Result<WorkflowMetadata> {
        self.store.get(document_id).await?.ok_or_else(|| {
            KanflowError::NotFound(format!("Document {} is not in the workflow", document_id))
        })
    }
}
