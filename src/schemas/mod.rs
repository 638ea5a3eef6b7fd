//! Schema types for kanflow
//!
//! Field names serialise in camelCase to stay compatible with the records
//! the document store already holds.

mod actor;
mod config;
mod metadata;
mod state;
mod validation;

pub use actor::{Actor, User};
pub use config::{default_states, WorkflowConfig};
pub use metadata::{document_id_from_metadata_id, metadata_id, WorkflowMetadata, METADATA_ID_PREFIX};
pub use state::{State, StateColor};
pub use validation::{FindingLevel, ValidationFinding, ValidationStatus, ValidationSummary};
