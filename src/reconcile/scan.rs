//! Detection of invariant violations across all metadata records

use std::collections::{HashMap, HashSet};

use crate::domain::find_state;
use crate::rank::Rank;
use crate::schemas::{State, User, WorkflowMetadata};

use super::report::{ViolationCategory, ViolationReport};

/// True when a record has no rank, or one that does not parse
pub(super) fn lacks_rank(record: &WorkflowMetadata) -> bool {
    record
        .order_rank
        .as_deref()
        .map_or(true, |rank| Rank::parse(rank).is_err())
}

/// Whether an assignee id resolves to a project user
pub(super) fn is_known_user(users: &[User], id: &str) -> bool {
    users.iter().any(|u| u.id == id)
}

/// Check every record and list offending document ids per category.
///
/// Detection never writes. The assignee check is skipped when
/// `known_users` is empty and the orphan check when
/// `known_document_ids` is empty, since either means the provider gave
/// nothing to compare against.
pub fn scan(
    records: &[WorkflowMetadata],
    states: &[State],
    known_users: &[User],
    known_document_ids: &[String],
) -> ViolationReport {
    let mut report = ViolationReport::default();

    let mut rank_counts: HashMap<&str, usize> = HashMap::new();
    for rank in records.iter().filter_map(|r| r.order_rank.as_deref()) {
        if !rank.is_empty() {
            *rank_counts.entry(rank).or_default() += 1;
        }
    }
    let existing: HashSet<&str> = known_document_ids.iter().map(String::as_str).collect();

    for record in records {
        let id = &record.document_id;

        if find_state(states, &record.state).is_none() {
            report.get_mut(ViolationCategory::UndefinedState).push(id.clone());
        }

        if !known_users.is_empty()
            && record.assignees.iter().any(|a| !is_known_user(known_users, a))
        {
            report.get_mut(ViolationCategory::InvalidAssignees).push(id.clone());
        }

        // A shared string is a duplicate even when it does not parse
        match record.order_rank.as_deref() {
            Some(rank) if rank_counts.get(rank).copied().unwrap_or(0) > 1 => {
                report.get_mut(ViolationCategory::DuplicateRank).push(id.clone());
            }
            _ if lacks_rank(record) => {
                report.get_mut(ViolationCategory::MissingRank).push(id.clone());
            }
            _ => {}
        }

        if !existing.is_empty() && !existing.contains(id.as_str()) {
            report.get_mut(ViolationCategory::OrphanedMetadata).push(id.clone());
        }
    }

    for (category, ids) in report.found() {
        tracing::warn!(%category, count = ids.len(), "workflow metadata violations found");
    }
    report
}
