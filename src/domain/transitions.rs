//! State transition logic
//!
//! Pure functions for applying state transitions to metadata records.

use crate::schemas::{Actor, State, ValidationSummary, WorkflowMetadata};

use super::states::{find_state, is_terminal_state};
use super::validation::{can_transition, TransitionDecision};

/// Label shown when a document may leave the workflow
pub const COMPLETION_ALLOWED: &str = "Removes the document from the Workflow process";

/// Reason given when completion is attempted before the last state
pub const COMPLETION_DENIED: &str = "Cannot remove from workflow until in the last state";

/// Result of a state transition attempt
#[derive(Debug)]
pub enum TransitionResult {
    /// Successful transition with the record to write
    Success {
        /// The record with the target state; rank and assignees unchanged
        next: WorkflowMetadata,
        /// The gate decision that allowed it
        decision: TransitionDecision,
    },
    /// Refused transition
    Error {
        /// Description of why the transition was refused
        error: String,
    },
}

impl TransitionResult {
    /// Check if the transition was successful
    pub fn is_success(&self) -> bool {
        matches!(self, TransitionResult::Success { .. })
    }

    /// Check if the transition failed
    pub fn is_error(&self) -> bool {
        matches!(self, TransitionResult::Error { .. })
    }

    /// Get the next record if the transition was successful
    pub fn metadata(self) -> Option<WorkflowMetadata> {
        match self {
            TransitionResult::Success { next, .. } => Some(next),
            TransitionResult::Error { .. } => None,
        }
    }

    /// Get the error message if the transition failed
    pub fn error(self) -> Option<String> {
        match self {
            TransitionResult::Success { .. } => None,
            TransitionResult::Error { error } => Some(error),
        }
    }
}

/// Pure function that checks and applies a state change to a record.
///
/// This function:
/// - Never mutates the input record
/// - Resolves both states against the board
/// - Runs every transition gate before applying
/// - Keeps the record's rank, assignees and revision so the write stays guarded
pub fn apply_state_transition(
    states: &[State],
    actor: &Actor,
    metadata: &WorkflowMetadata,
    target_id: &str,
    validation: &ValidationSummary,
) -> TransitionResult {
    let Some(target) = find_state(states, target_id) else {
        return TransitionResult::Error {
            error: format!("Could not find target state {}", target_id),
        };
    };

    let Some(current) = find_state(states, &metadata.state) else {
        return TransitionResult::Error {
            error: format!("Document is in undefined state \"{}\"", metadata.state),
        };
    };

    if current.id == target.id {
        return TransitionResult::Error {
            error: format!("Document is already in \"{}\"", target.title),
        };
    }

    let decision = can_transition(
        states,
        actor,
        current,
        target,
        &metadata.assignees,
        validation,
    );
    if !decision.allowed {
        return TransitionResult::Error {
            error: decision.reason,
        };
    }

    let next = metadata.clone().with_state(target.id.clone());
    TransitionResult::Success { next, decision }
}

/// Whether a record may be removed from the workflow: only from the last state.
pub fn check_completion(states: &[State], metadata: &WorkflowMetadata) -> Result<&'static str, &'static str> {
    if is_terminal_state(states, &metadata.state) {
        Ok(COMPLETION_ALLOWED)
    } else {
        Err(COMPLETION_DENIED)
    }
}
