//! Violation categories and the scan report

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::KanflowError;

/// A kind of invariant violation the Reconciler can detect and repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationCategory {
    /// State id not declared on the board
    UndefinedState,
    /// Assignee ids that match no project user
    InvalidAssignees,
    /// No rank at all
    MissingRank,
    /// Rank shared with another record
    DuplicateRank,
    /// Metadata whose content document is gone
    OrphanedMetadata,
}

impl ViolationCategory {
    pub const ALL: [ViolationCategory; 5] = [
        ViolationCategory::UndefinedState,
        ViolationCategory::InvalidAssignees,
        ViolationCategory::MissingRank,
        ViolationCategory::DuplicateRank,
        ViolationCategory::OrphanedMetadata,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViolationCategory::UndefinedState => "undefinedState",
            ViolationCategory::InvalidAssignees => "invalidAssignees",
            ViolationCategory::MissingRank => "missingRank",
            ViolationCategory::DuplicateRank => "duplicateRank",
            ViolationCategory::OrphanedMetadata => "orphanedMetadata",
        }
    }

    /// Label for the repair of `count` documents
    pub fn fix_label(self, count: usize) -> String {
        let documents = if count == 1 {
            "1 Document".to_string()
        } else {
            format!("{} Documents", count)
        };
        match self {
            ViolationCategory::UndefinedState if count == 1 => "Correct 1 Document State".to_string(),
            ViolationCategory::UndefinedState => format!("Correct {} Document States", count),
            ViolationCategory::InvalidAssignees => format!("Remove Invalid Users from {}", documents),
            ViolationCategory::MissingRank => format!("Set Order for {}", documents),
            ViolationCategory::DuplicateRank => format!("Set Unique Order for {}", documents),
            ViolationCategory::OrphanedMetadata => "Cleanup orphaned metadata".to_string(),
        }
    }

    /// Confirmation after `count` documents were repaired
    pub fn done_message(self, count: usize) -> String {
        match self {
            ViolationCategory::MissingRank | ViolationCategory::DuplicateRank if count == 1 => {
                "Added order to 1 Document".to_string()
            }
            ViolationCategory::MissingRank | ViolationCategory::DuplicateRank => {
                format!("Added order to {} Documents", count)
            }
            ViolationCategory::OrphanedMetadata => {
                format!("Removed {} orphaned metadata documents", count)
            }
            _ if count == 1 => "Corrected 1 Document".to_string(),
            _ => format!("Corrected {} Documents", count),
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationCategory {
    type Err = KanflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViolationCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| KanflowError::NotFound(format!("Unknown violation category {}", s)))
    }
}

/// Document ids per violation category; a document may appear in several
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationReport {
    pub undefined_state: Vec<String>,
    pub invalid_assignees: Vec<String>,
    pub missing_rank: Vec<String>,
    pub duplicate_rank: Vec<String>,
    pub orphaned_metadata: Vec<String>,
}

impl ViolationReport {
    pub fn get(&self, category: ViolationCategory) -> &[String] {
        match category {
            ViolationCategory::UndefinedState => &self.undefined_state,
            ViolationCategory::InvalidAssignees => &self.invalid_assignees,
            ViolationCategory::MissingRank => &self.missing_rank,
            ViolationCategory::DuplicateRank => &self.duplicate_rank,
            ViolationCategory::OrphanedMetadata => &self.orphaned_metadata,
        }
    }

    pub(super) fn get_mut(&mut self, category: ViolationCategory) -> &mut Vec<String> {
        match category {
            ViolationCategory::UndefinedState => &mut self.undefined_state,
            ViolationCategory::InvalidAssignees => &mut self.invalid_assignees,
            ViolationCategory::MissingRank => &mut self.missing_rank,
            ViolationCategory::DuplicateRank => &mut self.duplicate_rank,
            ViolationCategory::OrphanedMetadata => &mut self.orphaned_metadata,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Sum of the category lists
    pub fn total(&self) -> usize {
        ViolationCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// Categories with at least one document, in declaration order
    pub fn found(&self) -> impl Iterator<Item = (ViolationCategory, &[String])> {
        ViolationCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
            .filter(|(_, ids)| !ids.is_empty())
    }
}
