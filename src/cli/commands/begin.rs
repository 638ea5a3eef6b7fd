//! Begin command - Put a document on the board

use std::path::Path;

use crate::cli::BoardContext;
use crate::errors::Result;

/// Start the workflow for a document in the first state
pub async fn run(cwd: Option<&Path>, document: &str) -> Result<()> {
    let context = BoardContext::open(cwd)?;
    let coordinator = context.coordinator()?;

    let record = coordinator.begin(document).await?;
    println!(
        "\"{}\" is in \"{}\"",
        record.document_id,
        coordinator.state_title(&record.state)
    );
    Ok(())
}
