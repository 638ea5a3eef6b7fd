//! Kanflow - an editorial Kanban workflow over a document store
//!
//! This library provides the core functionality for the kanflow CLI, including:
//! - Schema definitions for states, workflow metadata, users and validation
//! - Lexicographic ranks that order documents within a column
//! - The transition gates (role, transition, assignment, validation)
//! - The move coordinator with optimistic updates and rollback
//! - The reconciler that detects and repairs broken metadata
//! - Metadata stores with revision-guarded writes

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod rank;
pub mod reconcile;
pub mod schemas;
pub mod store;

// Re-export commonly used types
pub use coordinator::{MoveCoordinator, MoveOutcome, MoveRequest, Projection};
pub use errors::{KanflowError, Result, StoreError};
pub use rank::Rank;
pub use reconcile::{Reconciler, ViolationCategory, ViolationReport};
pub use schemas::{Actor, State, User, ValidationSummary, WorkflowConfig, WorkflowMetadata};
pub use store::{JsonFileStore, MemoryStore, MetadataStore};
