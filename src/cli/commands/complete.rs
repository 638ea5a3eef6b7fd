//! Complete command - Take a finished document off the board

use std::path::Path;

use crate::cli::BoardContext;
use crate::errors::Result;

/// Remove a document in the last state from the workflow
pub async fn run(cwd: Option<&Path>, document: &str) -> Result<()> {
    let context = BoardContext::open(cwd)?;
    let coordinator = context.coordinator()?;

    let record = coordinator.complete(document).await?;
    println!(
        "\"{}\" completed from \"{}\"",
        record.document_id,
        coordinator.state_title(&record.state)
    );
    Ok(())
}
