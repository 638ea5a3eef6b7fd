//! Reconciler
//!
//! Batch detection and opt-in repair of metadata that breaks the board's
//! invariants: undeclared states, unknown assignees, missing or duplicate
//! ranks and metadata for documents that no longer exist. Scanning never
//! writes; each repair is one atomic batch for one category.

mod repair;
mod report;
mod scan;

pub use repair::{plan, plan_reset_order, Reconciler};
pub use report::{ViolationCategory, ViolationReport};
pub use scan::scan;
