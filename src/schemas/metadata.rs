//! Workflow metadata schema - one record per workflowed document

use serde::{Deserialize, Serialize};

/// Prefix joining a content document id to its metadata record id
pub const METADATA_ID_PREFIX: &str = "workflow-metadata.";

/// Derive the metadata record id for a content document
pub fn metadata_id(document_id: &str) -> String {
    format!("{}{}", METADATA_ID_PREFIX, document_id)
}

/// Recover the content document id from a metadata record id
pub fn document_id_from_metadata_id(id: &str) -> Option<&str> {
    id.strip_prefix(METADATA_ID_PREFIX).filter(|rest| !rest.is_empty())
}

/// Per-document workflow position: state, rank within the state, assignees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    /// Record id, always `metadata_id(document_id)`
    pub id: String,

    /// The content document this record tracks
    pub document_id: String,

    /// Current state id
    pub state: String,

    /// Sort key within the state column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_rank: Option<String>,

    /// Assigned user ids in display order
    #[serde(default)]
    pub assignees: Vec<String>,

    /// Opaque revision token issued by the store
    #[serde(default)]
    pub revision: String,

    /// ISO 8601 timestamp of the last write
    #[serde(default)]
    pub updated_at: String,
}

impl WorkflowMetadata {
    /// Create an unsaved record; the store assigns the revision
    pub fn new(document_id: impl Into<String>, state: impl Into<String>, order_rank: Option<String>) -> Self {
        let document_id = document_id.into();
        WorkflowMetadata {
            id: metadata_id(&document_id),
            document_id,
            state: state.into(),
            order_rank,
            assignees: Vec::new(),
            revision: String::new(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_rank(mut self, order_rank: Option<String>) -> Self {
        self.order_rank = order_rank;
        self
    }

    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn is_assigned(&self, user_id: &str) -> bool {
        self.assignees.iter().any(|a| a == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_id_round_trip() {
        assert_eq!(metadata_id("article-1"), "workflow-metadata.article-1");
        assert_eq!(
            document_id_from_metadata_id("workflow-metadata.article-1"),
            Some("article-1")
        );
        assert_eq!(document_id_from_metadata_id("article-1"), None);
        assert_eq!(document_id_from_metadata_id("workflow-metadata."), None);
    }

    #[test]
    fn test_new_record_derives_id() {
        let record = WorkflowMetadata::new("doc", "inReview", Some("0|100000:".into()));
        assert_eq!(record.id, "workflow-metadata.doc");
        assert!(record.assignees.is_empty());
        assert!(record.revision.is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let record = WorkflowMetadata::new("doc", "inReview", None).with_assignees(["u1"]);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"documentId\":\"doc\""));
        assert!(!json.contains("orderRank"));

        let parsed: WorkflowMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert!(parsed.is_assigned("u1"));
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: WorkflowMetadata = serde_json::from_str(
            r#"{"id": "workflow-metadata.x", "documentId": "x", "state": "gone"}"#,
        )
        .unwrap();
        assert!(parsed.order_rank.is_none());
        assert!(parsed.assignees.is_empty());
    }
}
