//! Transition command - Change a document's state without moving it

use std::path::Path;

use crate::cli::BoardContext;
use crate::coordinator::state_changed_message;
use crate::errors::Result;

/// Transition `document` to state `to` as `actor_id`
pub async fn run(cwd: Option<&Path>, document: &str, to: &str, actor_id: &str) -> Result<()> {
    let context = BoardContext::open(cwd)?;
    let actor = context.actor(actor_id)?;
    let coordinator = context.coordinator()?;
    let validation = context.validation_for(document)?;

    let record = coordinator
        .apply_transition(&actor, document, to, &validation)
        .await?;
    println!("{}", state_changed_message(&coordinator.state_title(&record.state)));
    Ok(())
}
