//! Assign, unassign and clear-assignees commands

use std::path::Path;

use crate::cli::BoardContext;
use crate::errors::Result;
use crate::schemas::WorkflowMetadata;

fn print_assignees(record: &WorkflowMetadata) {
    if record.assignees.is_empty() {
        println!("\"{}\" has no assignees", record.document_id);
    } else {
        println!(
            "\"{}\" assigned to {}",
            record.document_id,
            record.assignees.join(", ")
        );
    }
}

/// Add `user` to the document's assignees
pub async fn assign(cwd: Option<&Path>, document: &str, user: &str) -> Result<()> {
    let context = BoardContext::open(cwd)?;
    let record = context
        .coordinator()?
        .add_assignee(document, user, &context.users)
        .await?;
    print_assignees(&record);
    Ok(())
}

/// Remove `user` from the document's assignees
pub async fn unassign(cwd: Option<&Path>, document: &str, user: &str) -> Result<()> {
    let context = BoardContext::open(cwd)?;
    let record = context
        .coordinator()?
        .remove_assignee(document, user, &context.users)
        .await?;
    print_assignees(&record);
    Ok(())
}

/// Remove every assignee from the document
pub async fn clear(cwd: Option<&Path>, document: &str) -> Result<()> {
    let context = BoardContext::open(cwd)?;
    let record = context.coordinator()?.clear_assignees(document).await?;
    print_assignees(&record);
    Ok(())
}
