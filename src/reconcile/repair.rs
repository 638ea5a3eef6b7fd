//! Planned repairs, one atomic batch per category

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::{find_state, first_state};
use crate::errors::{KanflowError, Result};
use crate::rank::{default_spread_end, generate_spread, parse_column, Rank};
use crate::schemas::{State, User, WorkflowMetadata};
use crate::store::{Batch, MetadataStore, Patch};

use super::report::{ViolationCategory, ViolationReport};
use super::scan::{is_known_user, lacks_rank, scan};

/// `count` fresh ranks strictly inside `lower..upper`
fn spread_inside(count: usize, lower: Option<Rank>, upper: Option<Rank>) -> Result<Vec<Rank>> {
    let mut ranks = generate_spread(count + 2, lower, upper)?;
    ranks.pop();
    ranks.remove(0);
    Ok(ranks)
}

/// Records named in `document_ids`, in rank order
fn targets<'r>(records: &'r [WorkflowMetadata], document_ids: &[String]) -> Vec<&'r WorkflowMetadata> {
    let wanted: HashSet<&str> = document_ids.iter().map(String::as_str).collect();
    let mut targets: Vec<&WorkflowMetadata> = records
        .iter()
        .filter(|r| wanted.contains(r.document_id.as_str()))
        .collect();
    targets.sort_by(|a, b| {
        a.order_rank
            .cmp(&b.order_rank)
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
    targets
}

fn rank_patch(batch: Batch, record: &WorkflowMetadata, rank: &Rank) -> Batch {
    batch.patch(
        record.document_id.clone(),
        Some(record.revision.clone()),
        Patch::new().order_rank(rank.to_string()),
    )
}

/// Build the repair batch for one category.
///
/// `records` is every record on the board, used for rank bounds; only the
/// records named in `document_ids` are changed, and only if they still
/// violate the category. Patches are guarded by each record's revision.
pub fn plan(
    category: ViolationCategory,
    records: &[WorkflowMetadata],
    document_ids: &[String],
    states: &[State],
    users: &[User],
) -> Result<Batch> {
    let targets = targets(records, document_ids);
    let mut batch = Batch::new();

    match category {
        ViolationCategory::UndefinedState => {
            let first = first_state(states).ok_or_else(|| {
                KanflowError::ConfigError("No States defined in plugin config".to_string())
            })?;
            for record in targets.into_iter().filter(|r| find_state(states, &r.state).is_none()) {
                batch = batch.patch(
                    record.document_id.clone(),
                    Some(record.revision.clone()),
                    Patch::new().state(first.id.clone()),
                );
            }
        }

        ViolationCategory::InvalidAssignees => {
            if users.is_empty() {
                tracing::warn!("no project users known, leaving assignees alone");
                return Ok(batch);
            }
            for record in targets {
                let valid: Vec<String> = record
                    .assignees
                    .iter()
                    .filter(|a| is_known_user(users, a))
                    .cloned()
                    .collect();
                if valid.len() != record.assignees.len() {
                    batch = batch.patch(
                        record.document_id.clone(),
                        Some(record.revision.clone()),
                        Patch::new().assignees(valid),
                    );
                }
            }
        }

        ViolationCategory::MissingRank => {
            let unranked: Vec<&WorkflowMetadata> =
                targets.into_iter().filter(|r| lacks_rank(r)).collect();
            if unranked.is_empty() {
                return Ok(batch);
            }

            let existing: BTreeSet<Rank> = parse_column(records.iter().map(|r| r.order_rank.as_deref()))
                .into_iter()
                .flatten()
                .collect();
            let mut lowest = existing.iter().cloned();
            let (lower, upper) = match (lowest.next(), lowest.next()) {
                (Some(first), Some(second)) => (Some(first), Some(second)),
                // Stay clear of the only rank in use
                (Some(only), None) => {
                    let end = default_spread_end()?;
                    if only < end {
                        (Some(only), Some(end))
                    } else {
                        (Some(Rank::min()), Some(only))
                    }
                }
                _ => (None, None),
            };
            let ranks = spread_inside(unranked.len(), lower, upper)?;
            for (record, rank) in unranked.into_iter().zip(ranks.iter()) {
                batch = rank_patch(batch, record, rank);
            }
        }

        ViolationCategory::DuplicateRank => {
            let mut groups: BTreeMap<&str, Vec<&WorkflowMetadata>> = BTreeMap::new();
            for record in targets {
                if let Some(rank) = record.order_rank.as_deref().filter(|r| !r.is_empty()) {
                    groups.entry(rank).or_default().push(record);
                }
            }

            // Each group is re-spread just above its shared value, below the
            // next rank in use; later groups see the ranks handed out so far.
            // A group with no room above (at the maximum) goes just below it.
            let mut taken: BTreeSet<Rank> =
                parse_column(records.iter().map(|r| r.order_rank.as_deref()))
                    .into_iter()
                    .flatten()
                    .collect();
            for (shared, members) in groups {
                let below = taken
                    .iter()
                    .filter(|r| r.to_string().as_str() <= shared)
                    .next_back()
                    .cloned();
                let above = taken.iter().find(|r| r.to_string().as_str() > shared).cloned();
                let (lower, upper) = match (below, above) {
                    (below, Some(above)) => (below.unwrap_or_else(Rank::min), above),
                    (Some(below), None) if below < Rank::max() => (below, Rank::max()),
                    (Some(top), None) => {
                        let under = taken.range(..&top).next_back().cloned();
                        (under.unwrap_or_else(Rank::min), top)
                    }
                    (None, None) => (Rank::min(), Rank::max()),
                };

                let ranks = spread_inside(members.len(), Some(lower), Some(upper))?;
                for (record, rank) in members.into_iter().zip(ranks.iter()) {
                    batch = rank_patch(batch, record, rank);
                }
                taken.extend(ranks);
            }
        }

        ViolationCategory::OrphanedMetadata => {
            for record in targets {
                batch = batch.delete(record.document_id.clone(), Some(record.revision.clone()));
            }
        }
    }

    Ok(batch)
}

/// Build a batch giving `document_ids` fresh evenly spread ranks across the
/// default range, keeping their current relative order
pub fn plan_reset_order(records: &[WorkflowMetadata], document_ids: &[String]) -> Result<Batch> {
    let targets = targets(records, document_ids);
    let ranks = generate_spread(targets.len(), None, None)?;
    Ok(targets
        .into_iter()
        .zip(ranks.iter())
        .fold(Batch::new(), |batch, (record, rank)| rank_patch(batch, record, rank)))
}

/// Detects and repairs violations for one board
pub struct Reconciler<'a, S> {
    store: &'a S,
    states: &'a [State],
    users: &'a [User],
}

impl<'a, S: MetadataStore> Reconciler<'a, S> {
    pub fn new(store: &'a S, states: &'a [State], users: &'a [User]) -> Self {
        Reconciler {
            store,
            states,
            users,
        }
    }

    /// Scan every stored record
    pub async fn scan(&self, known_document_ids: &[String]) -> Result<ViolationReport> {
        let records = self.store.list().await?;
        Ok(scan(&records, self.states, self.users, known_document_ids))
    }

    /// Repair `document_ids` for one category as a single atomic batch.
    ///
    /// Returns how many records were changed; ids that no longer violate the
    /// category are skipped.
    pub async fn apply(&self, category: ViolationCategory, document_ids: &[String]) -> Result<usize> {
        if document_ids.is_empty() {
            return Ok(0);
        }
        let records = self.store.list().await?;
        let batch = plan(category, &records, document_ids, self.states, self.users)?;
        let count = self.commit(batch).await?;
        tracing::info!(%category, count, "{}", category.done_message(count));
        Ok(count)
    }

    /// Re-spread `document_ids` over the default rank range
    pub async fn reset_order(&self, document_ids: &[String]) -> Result<usize> {
        if document_ids.is_empty() {
            return Ok(0);
        }
        let records = self.store.list().await?;
        let batch = plan_reset_order(&records, document_ids)?;
        let count = self.commit(batch).await?;
        tracing::info!(count, "order reset");
        Ok(count)
    }

    async fn commit(&self, batch: Batch) -> Result<usize> {
        if batch.is_empty() {
            tracing::debug!("nothing to repair");
            return Ok(0);
        }
        Ok(self.store.commit(batch).await?)
    }
}
