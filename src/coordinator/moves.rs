//! Drag-and-drop moves with optimistic projection and rollback

use crate::domain::{apply_state_transition, TransitionResult};
use crate::errors::{KanflowError, Result};
use crate::rank::{allocate_for_insert, parse_column};
use crate::schemas::{Actor, ValidationSummary};
use crate::store::{MetadataStore, Patch};

use super::projection::{ColumnEntry, Projection};
use super::MoveCoordinator;

/// A single drop of a card onto a column position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub document_id: String,
    pub source_state: String,
    /// Position in the source column before the drag
    pub source_index: usize,
    pub destination_state: String,
    /// Position in the destination column, counted without the dragged card
    pub destination_index: usize,
    /// Destination column in rank order, without the dragged card
    pub destination_column: Vec<ColumnEntry>,
}

impl MoveRequest {
    /// Describe dropping `document_id` at `destination_index` of
    /// `destination_state`, as seen in `projection`
    pub fn from_projection(
        projection: &Projection,
        document_id: &str,
        destination_state: &str,
        destination_index: usize,
    ) -> Result<Self> {
        let record = projection.get(document_id).ok_or_else(dragged_missing)?;
        Ok(MoveRequest {
            document_id: document_id.to_string(),
            source_state: record.state.clone(),
            source_index: projection.index_in_column(document_id).unwrap_or(0),
            destination_state: destination_state.to_string(),
            destination_index,
            destination_column: projection.column_snapshot(destination_state, document_id),
        })
    }
}

fn dragged_missing() -> KanflowError {
    KanflowError::NotFound("Could not find dragged document in data".to_string())
}

/// A move the store accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub document_id: String,
    pub new_state: String,
    pub state_title: String,
    pub rank: String,
    /// True when the card stayed in its column
    pub reordered: bool,
}

impl MoveOutcome {
    pub fn message(&self) -> String {
        if self.reordered {
            format!("Reordered in \"{}\"", self.state_title)
        } else {
            format!("Moved to \"{}\"", self.state_title)
        }
    }
}

impl<S: MetadataStore> MoveCoordinator<S> {
    /// Execute one drag-and-drop move.
    ///
    /// Returns `Ok(None)` for a drop onto the card's own position. A move to
    /// another column must pass every transition gate. The projection shows
    /// the move before the store answers; on any store failure it is rolled
    /// back and `MoveFailed` names the destination state.
    pub async fn request_move(
        &self,
        projection: &mut Projection,
        request: MoveRequest,
        actor: &Actor,
        validation: &ValidationSummary,
    ) -> Result<Option<MoveOutcome>> {
        let destination = self.target_state(&request.destination_state)?;
        let current = projection
            .get(&request.document_id)
            .cloned()
            .ok_or_else(dragged_missing)?;

        if current.state != request.source_state {
            tracing::warn!(
                document = %current.document_id,
                projected = %current.state,
                requested = %request.source_state,
                "move source differs from projection"
            );
        }

        let reordered = current.state == destination.id;
        if reordered && request.source_index == request.destination_index {
            tracing::debug!(document = %current.document_id, "drop on own position ignored");
            return Ok(None);
        }

        if !reordered {
            if let TransitionResult::Error { error } =
                apply_state_transition(&self.states, actor, &current, &destination.id, validation)
            {
                return Err(KanflowError::denied(error));
            }
        }

        let column = parse_column(
            request
                .destination_column
                .iter()
                .map(|entry| entry.order_rank.as_deref()),
        );
        let rank = allocate_for_insert(&column, request.destination_index)?.to_string();

        projection.apply_provisional(
            current
                .clone()
                .with_state(destination.id.clone())
                .with_rank(Some(rank.clone())),
        );

        let patch = Patch::new()
            .state(destination.id.clone())
            .order_rank(rank.clone());
        match self
            .store
            .patch_if_revision(&current.document_id, &current.revision, patch)
            .await
        {
            Ok(stored) => {
                projection.confirm(stored);
                tracing::info!(
                    document = %current.document_id,
                    state = %destination.id,
                    %rank,
                    "move committed"
                );
                Ok(Some(MoveOutcome {
                    document_id: current.document_id,
                    new_state: destination.id.clone(),
                    state_title: destination.title.clone(),
                    rank,
                    reordered,
                }))
            }
            Err(cause) => {
                projection.rollback(&current.document_id);
                tracing::warn!(
                    document = %current.document_id,
                    state = %destination.id,
                    error = %cause,
                    "move rolled back"
                );
                Err(KanflowError::MoveFailed {
                    state_title: destination.title.clone(),
                    cause,
                })
            }
        }
    }
}
