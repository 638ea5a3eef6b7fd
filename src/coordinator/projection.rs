//! Caller-owned view of the board
//!
//! A move is rendered here first, tagged provisional, and later either
//! confirmed with the stored record or rolled back to the last record the
//! store acknowledged.

use std::collections::{BTreeMap, HashMap};

use crate::schemas::WorkflowMetadata;
use crate::store::{ChangeKind, StoreEvent};

/// One card of a column snapshot, in rank order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    pub document_id: String,
    pub order_rank: Option<String>,
}

/// Board records as the caller currently displays them
#[derive(Debug, Clone, Default)]
pub struct Projection {
    records: BTreeMap<String, WorkflowMetadata>,
    /// Last acknowledged record for every document with a provisional change
    known_good: HashMap<String, WorkflowMetadata>,
}

impl Projection {
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = WorkflowMetadata>,
    {
        Projection {
            records: records
                .into_iter()
                .map(|r| (r.document_id.clone(), r))
                .collect(),
            known_good: HashMap::new(),
        }
    }

    pub fn get(&self, document_id: &str) -> Option<&WorkflowMetadata> {
        self.records.get(document_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &WorkflowMetadata> {
        self.records.values()
    }

    /// Whether the document shows a change the store has not acknowledged
    pub fn is_provisional(&self, document_id: &str) -> bool {
        self.known_good.contains_key(document_id)
    }

    /// Show `record` immediately, remembering the acknowledged version.
    ///
    /// A second provisional change on the same document keeps the first
    /// acknowledged version as the rollback target.
    pub fn apply_provisional(&mut self, record: WorkflowMetadata) {
        let document_id = record.document_id.clone();
        if let Some(previous) = self.records.insert(document_id.clone(), record) {
            self.known_good.entry(document_id).or_insert(previous);
        }
    }

    /// Replace the provisional record with the stored one
    pub fn confirm(&mut self, stored: WorkflowMetadata) {
        self.known_good.remove(&stored.document_id);
        self.records.insert(stored.document_id.clone(), stored);
    }

    /// Restore the last acknowledged record. Returns false if nothing was pending.
    pub fn rollback(&mut self, document_id: &str) -> bool {
        match self.known_good.remove(document_id) {
            Some(previous) => {
                self.records.insert(document_id.to_string(), previous);
                true
            }
            None => false,
        }
    }

    /// Fold a committed store change into the view.
    ///
    /// While a document is provisional the change only refreshes its
    /// rollback target, so the pending move stays visible.
    pub fn sync(&mut self, event: &StoreEvent) {
        match (event.kind, &event.record) {
            (ChangeKind::Deleted, _) => {
                self.records.remove(&event.document_id);
                self.known_good.remove(&event.document_id);
            }
            (_, Some(record)) => {
                if let Some(good) = self.known_good.get_mut(&event.document_id) {
                    *good = record.clone();
                } else {
                    self.records.insert(event.document_id.clone(), record.clone());
                }
            }
            (_, None) => {}
        }
    }

    /// Records in `state`, unranked first, then by rank
    pub fn column(&self, state: &str) -> Vec<&WorkflowMetadata> {
        let mut column: Vec<&WorkflowMetadata> =
            self.records.values().filter(|r| r.state == state).collect();
        column.sort_by(|a, b| {
            a.order_rank
                .cmp(&b.order_rank)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        column
    }

    /// Snapshot of `state` for a move, leaving out the dragged document
    pub fn column_snapshot(&self, state: &str, excluding: &str) -> Vec<ColumnEntry> {
        self.column(state)
            .into_iter()
            .filter(|r| r.document_id != excluding)
            .map(|r| ColumnEntry {
                document_id: r.document_id.clone(),
                order_rank: r.order_rank.clone(),
            })
            .collect()
    }

    /// Position of a document within its own column
    pub fn index_in_column(&self, document_id: &str) -> Option<usize> {
        let record = self.get(document_id)?;
        self.column(&record.state)
            .iter()
            .position(|r| r.document_id == document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, state: &str, rank: &str) -> WorkflowMetadata {
        WorkflowMetadata::new(id, state, Some(rank.to_string())).with_revision("rev-1")
    }

    fn board() -> Projection {
        Projection::new(vec![
            record("b", "inReview", "0|200000:"),
            record("a", "inReview", "0|100000:"),
            record("c", "approved", "0|100000:"),
        ])
    }

    #[test]
    fn test_column_is_rank_ordered() {
        let projection = board();
        let ids: Vec<&str> = projection
            .column("inReview")
            .iter()
            .map(|r| r.document_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(projection.index_in_column("b"), Some(1));
        assert_eq!(projection.column_snapshot("inReview", "a").len(), 1);
    }

    #[test]
    fn test_rollback_restores_acknowledged_record() {
        let mut projection = board();
        let original = projection.get("a").cloned().unwrap();

        projection.apply_provisional(original.clone().with_state("approved"));
        assert!(projection.is_provisional("a"));
        assert_eq!(projection.get("a").unwrap().state, "approved");

        // a second pending change keeps the first rollback target
        projection.apply_provisional(original.clone().with_state("changesRequested"));
        assert!(projection.rollback("a"));
        assert_eq!(projection.get("a"), Some(&original));
        assert!(!projection.is_provisional("a"));
        assert!(!projection.rollback("a"));
    }

    #[test]
    fn test_confirm_clears_provisional_flag() {
        let mut projection = board();
        let moved = projection.get("a").cloned().unwrap().with_state("approved");
        projection.apply_provisional(moved.clone());
        projection.confirm(moved.clone().with_revision("rev-2"));
        assert!(!projection.is_provisional("a"));
        assert_eq!(projection.get("a").unwrap().revision, "rev-2");
    }

    #[test]
    fn test_sync_refreshes_rollback_target_while_pending() {
        let mut projection = board();
        let original = projection.get("a").cloned().unwrap();
        projection.apply_provisional(original.clone().with_state("approved"));

        let newer = original.clone().with_assignees(["u1"]).with_revision("rev-9");
        projection.sync(&StoreEvent {
            kind: ChangeKind::Updated,
            document_id: "a".into(),
            record: Some(newer.clone()),
        });
        assert_eq!(projection.get("a").unwrap().state, "approved");

        projection.rollback("a");
        assert_eq!(projection.get("a"), Some(&newer));
    }

    #[test]
    fn test_sync_applies_deletions() {
        let mut projection = board();
        projection.sync(&StoreEvent {
            kind: ChangeKind::Deleted,
            document_id: "c".into(),
            record: None,
        });
        assert!(projection.get("c").is_none());
        assert_eq!(projection.len(), 2);
    }
}
