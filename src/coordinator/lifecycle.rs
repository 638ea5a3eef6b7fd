//! Entering and leaving the workflow, explicit transitions, assignees

use crate::domain::{
    apply_state_transition, check_completion, find_state, first_state, TransitionResult,
};
use crate::errors::{KanflowError, Result};
use crate::rank::{parse_column, Rank};
use crate::schemas::{Actor, User, ValidationSummary, WorkflowMetadata};
use crate::store::{MetadataStore, Patch};

use super::MoveCoordinator;

/// Confirmation shown after an explicit state change
pub fn state_changed_message(state_title: &str) -> String {
    format!("Document state now \"{}\"", state_title)
}

fn resolve_user<'a>(users: &'a [User], user_id: &str) -> Result<&'a User> {
    users
        .iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| KanflowError::NotFound("Could not find User".to_string()))
}

impl<S: MetadataStore> MoveCoordinator<S> {
    /// Put a document on the board, at the top of the first column.
    ///
    /// Returns the stored record; a document already on the board is left
    /// as it is.
    pub async fn begin(&self, document_id: &str) -> Result<WorkflowMetadata> {
        if let Some(existing) = self.store.get(document_id).await? {
            tracing::debug!(document = %document_id, state = %existing.state, "already in workflow");
            return Ok(existing);
        }

        let first = first_state(&self.states)
            .ok_or_else(|| KanflowError::ConfigError("No States defined in plugin config".to_string()))?;

        let records = self.store.list().await?;
        let lowest = parse_column(
            records
                .iter()
                .filter(|r| r.state == first.id)
                .map(|r| r.order_rank.as_deref()),
        )
        .into_iter()
        .flatten()
        .min();
        let rank = match lowest {
            Some(lowest) => lowest.prev()?,
            None => Rank::min().next()?,
        };

        let record = WorkflowMetadata::new(document_id, first.id.clone(), Some(rank.to_string()));
        let stored = self.store.create_if_not_exists(record).await?;
        tracing::info!(document = %document_id, state = %stored.state, "workflow started");
        Ok(stored)
    }

    /// Take a document off the board. Only allowed from the last state.
    pub async fn complete(&self, document_id: &str) -> Result<WorkflowMetadata> {
        let record = self.require_record(document_id).await?;
        check_completion(&self.states, &record).map_err(KanflowError::denied)?;

        self.store
            .delete_if_revision(document_id, &record.revision)
            .await?;
        tracing::info!(document = %document_id, "workflow completed");
        Ok(record)
    }

    /// Change a document's state outside drag-and-drop, keeping its rank
    pub async fn apply_transition(
        &self,
        actor: &Actor,
        document_id: &str,
        target_id: &str,
        validation: &ValidationSummary,
    ) -> Result<WorkflowMetadata> {
        self.target_state(target_id)?;
        let record = self.require_record(document_id).await?;

        let next = match apply_state_transition(&self.states, actor, &record, target_id, validation) {
            TransitionResult::Success { next, .. } => next,
            TransitionResult::Error { error } => return Err(KanflowError::denied(error)),
        };

        let stored = self
            .store
            .patch_if_revision(document_id, &record.revision, Patch::new().state(next.state))
            .await?;
        tracing::info!(document = %document_id, state = %stored.state, "state changed");
        Ok(stored)
    }

    /// Title of the state a record is in, for messages
    pub fn state_title(&self, state_id: &str) -> String {
        find_state(&self.states, state_id)
            .map(|s| s.title.clone())
            .unwrap_or_else(|| state_id.to_string())
    }

    /// Assign a known user. Assigning twice changes nothing.
    pub async fn add_assignee(
        &self,
        document_id: &str,
        user_id: &str,
        users: &[User],
    ) -> Result<WorkflowMetadata> {
        let user = resolve_user(users, user_id)?;
        let record = self.require_record(document_id).await?;
        if record.is_assigned(&user.id) {
            return Ok(record);
        }

        let mut assignees = record.assignees.clone();
        assignees.push(user.id.clone());
        self.write_assignees(&record, assignees).await
    }

    /// Unassign a known user. Unassigning someone not assigned changes nothing.
    pub async fn remove_assignee(
        &self,
        document_id: &str,
        user_id: &str,
        users: &[User],
    ) -> Result<WorkflowMetadata> {
        let user = resolve_user(users, user_id)?;
        let record = self.require_record(document_id).await?;
        if !record.is_assigned(&user.id) {
            return Ok(record);
        }

        let assignees = record
            .assignees
            .iter()
            .filter(|a| **a != user.id)
            .cloned()
            .collect();
        self.write_assignees(&record, assignees).await
    }

    pub async fn clear_assignees(&self, document_id: &str) -> Result<WorkflowMetadata> {
        let record = self.require_record(document_id).await?;
        if record.assignees.is_empty() {
            return Ok(record);
        }
        self.write_assignees(&record, Vec::new()).await
    }

    async fn write_assignees(
        &self,
        record: &WorkflowMetadata,
        assignees: Vec<String>,
    ) -> Result<WorkflowMetadata> {
        let stored = self
            .store
            .patch_if_revision(&record.document_id, &record.revision, Patch::new().assignees(assignees))
            .await?;
        tracing::info!(document = %stored.document_id, assignees = ?stored.assignees, "assignees updated");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast;

    use crate::errors::StoreError;
    use crate::schemas::default_states;
    use crate::store::{Batch, MemoryStore, StoreEvent, StoreResult};

    fn coordinator(records: Vec<WorkflowMetadata>) -> MoveCoordinator<MemoryStore> {
        MoveCoordinator::new(MemoryStore::with_records(records), default_states())
    }

    fn users() -> Vec<User> {
        vec![
            User::new("u1", "Ada").with_roles(["administrator"]),
            User::new("u2", "Grace").with_roles(["editor"]),
        ]
    }

    #[tokio::test]
    async fn test_begin_on_empty_board() {
        let coordinator = coordinator(Vec::new());
        let record = coordinator.begin("a").await.unwrap();
        assert_eq!(record.id, "workflow-metadata.a");
        assert_eq!(record.state, "inReview");
        assert_eq!(record.order_rank.as_deref(), Some("0|100000:"));
    }

    #[tokio::test]
    async fn test_begin_places_above_existing_cards() {
        let coordinator = coordinator(vec![
            WorkflowMetadata::new("x", "inReview", Some("0|200000:".into())),
            WorkflowMetadata::new("y", "inReview", Some("0|300000:".into())),
            WorkflowMetadata::new("z", "approved", Some("0|000100:".into())),
        ]);
        let record = coordinator.begin("a").await.unwrap();
        let rank = record.order_rank.unwrap();
        assert!(rank.as_str() < "0|200000:");
        assert!(rank.as_str() > "0|000100:");
    }

    #[tokio::test]
    async fn test_begin_twice_returns_existing() {
        let coordinator = coordinator(Vec::new());
        let first = coordinator.begin("a").await.unwrap();
        let second = coordinator.begin("a").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(coordinator.store().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_complete_only_from_last_state() {
        let coordinator = coordinator(vec![
            WorkflowMetadata::new("a", "inReview", None),
            WorkflowMetadata::new("b", "approved", None),
        ]);

        let err = coordinator.complete("a").await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot remove from workflow until in the last state");
        assert!(coordinator.store().get("a").await.unwrap().is_some());

        let removed = coordinator.complete("b").await.unwrap();
        assert_eq!(removed.state, "approved");
        assert!(coordinator.store().get("b").await.unwrap().is_none());

        assert_eq!(coordinator.complete("b").await.unwrap_err().code(), "NOT_FOUND");
    }

    /// Hands out the record it read, then lets another writer demote it
    struct DemotedAfterRead {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl MetadataStore for DemotedAfterRead {
        async fn get(&self, document_id: &str) -> StoreResult<Option<WorkflowMetadata>> {
            let read = self.inner.get(document_id).await?;
            if let Some(record) = &read {
                self.inner
                    .patch_if_revision(document_id, &record.revision, Patch::new().state("inReview"))
                    .await?;
            }
            Ok(read)
        }

        async fn list(&self) -> StoreResult<Vec<WorkflowMetadata>> {
            self.inner.list().await
        }

        async fn list_by_document_ids(&self, document_ids: &[String]) -> StoreResult<Vec<WorkflowMetadata>> {
            self.inner.list_by_document_ids(document_ids).await
        }

        async fn create_if_not_exists(&self, record: WorkflowMetadata) -> StoreResult<WorkflowMetadata> {
            self.inner.create_if_not_exists(record).await
        }

        async fn patch_if_revision(
            &self,
            document_id: &str,
            revision: &str,
            patch: Patch,
        ) -> StoreResult<WorkflowMetadata> {
            self.inner.patch_if_revision(document_id, revision, patch).await
        }

        async fn delete_if_revision(&self, document_id: &str, revision: &str) -> StoreResult<()> {
            self.inner.delete_if_revision(document_id, revision).await
        }

        async fn commit(&self, batch: Batch) -> StoreResult<usize> {
            self.inner.commit(batch).await
        }

        fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
            self.inner.subscribe()
        }
    }

    #[tokio::test]
    async fn test_complete_refuses_record_changed_since_read() {
        let store = DemotedAfterRead {
            inner: MemoryStore::with_records(vec![WorkflowMetadata::new("b", "approved", None)]),
        };
        let coordinator = MoveCoordinator::new(store, default_states());

        let err = coordinator.complete("b").await.unwrap_err();
        assert!(err.is_conflict());

        let kept = coordinator.store().inner.get("b").await.unwrap().unwrap();
        assert_eq!(kept.state, "inReview");
    }

    #[tokio::test]
    async fn test_apply_transition_keeps_rank() {
        let coordinator = coordinator(vec![
            WorkflowMetadata::new("a", "inReview", Some("0|100000:".into())).with_assignees(["u1"]),
        ]);
        let admin = users()[0].as_actor();

        let stored = coordinator
            .apply_transition(&admin, "a", "approved", &ValidationSummary::clean())
            .await
            .unwrap();
        assert_eq!(stored.state, "approved");
        assert_eq!(stored.order_rank.as_deref(), Some("0|100000:"));
        assert_eq!(
            state_changed_message(&coordinator.state_title(&stored.state)),
            "Document state now \"Approved\""
        );
    }

    #[tokio::test]
    async fn test_apply_transition_denied() {
        let coordinator = coordinator(vec![WorkflowMetadata::new("a", "inReview", None)]);
        let admin = users()[0].as_actor();

        let err = coordinator
            .apply_transition(&admin, "a", "approved", &ValidationSummary::clean())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "You must be assigned to the document to Promote State to \"Approved\""
        );

        let err = coordinator
            .apply_transition(&admin, "a", "archived", &ValidationSummary::clean())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_assignee_changes() {
        let coordinator = coordinator(vec![WorkflowMetadata::new("a", "inReview", None)]);
        let users = users();

        let record = coordinator.add_assignee("a", "u1", &users).await.unwrap();
        assert_eq!(record.assignees, vec!["u1".to_string()]);

        // idempotent: no second write
        let again = coordinator.add_assignee("a", "u1", &users).await.unwrap();
        assert_eq!(again.revision, record.revision);

        let record = coordinator.add_assignee("a", "u2", &users).await.unwrap();
        assert_eq!(record.assignees, vec!["u1".to_string(), "u2".to_string()]);

        let record = coordinator.remove_assignee("a", "u1", &users).await.unwrap();
        assert_eq!(record.assignees, vec!["u2".to_string()]);

        let record = coordinator.clear_assignees("a").await.unwrap();
        assert!(record.assignees.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let coordinator = coordinator(vec![WorkflowMetadata::new("a", "inReview", None)]);
        let err = coordinator.add_assignee("a", "u7", &users()).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: Could not find User");
        let err = coordinator.remove_assignee("a", "u7", &users()).await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_assignee_write_surfaces_conflict() {
        let coordinator = coordinator(vec![WorkflowMetadata::new("a", "inReview", None)]);
        coordinator
            .store()
            .fail_next_write(StoreError::RevisionMismatch {
                id: "workflow-metadata.a".into(),
                expected: "rev-1".into(),
                actual: "rev-2".into(),
            })
            .await;
        let err = coordinator.add_assignee("a", "u1", &users()).await.unwrap_err();
        assert!(err.is_conflict());
    }
}
