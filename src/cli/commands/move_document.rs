//! Move command - Drag a document to a column position

use std::path::Path;

use crate::cli::BoardContext;
use crate::coordinator::MoveRequest;
use crate::domain::{drop_targets, find_state};
use crate::errors::{KanflowError, Result};
use crate::schemas::{Actor, State};

/// Hint listing the columns a denied drag could have landed in
fn drop_hint(states: &[State], current: &State, actor: &Actor, assignees: &[String]) -> String {
    let targets: Vec<&str> = drop_targets(states, current, actor, assignees)
        .into_iter()
        .map(|s| s.title.as_str())
        .collect();
    if targets.is_empty() {
        format!("No column accepts this document from \"{}\"", current.title)
    } else {
        format!("Columns open from \"{}\": {}", current.title, targets.join(", "))
    }
}

/// Move `document` to `index` of column `to` (the end when omitted) as `actor_id`
pub async fn run(
    cwd: Option<&Path>,
    document: &str,
    to: &str,
    index: Option<usize>,
    actor_id: &str,
) -> Result<()> {
    let context = BoardContext::open(cwd)?;
    let actor = context.actor(actor_id)?;
    let coordinator = context.coordinator()?;
    let mut projection = context.projection(coordinator.store()).await?;

    let index = index.unwrap_or_else(|| projection.column_snapshot(to, document).len());
    let request = MoveRequest::from_projection(&projection, document, to, index)?;
    let hint = match (
        find_state(coordinator.states(), &request.source_state),
        projection.get(document),
    ) {
        (Some(current), Some(record)) => Some(drop_hint(
            coordinator.states(),
            current,
            &actor,
            &record.assignees,
        )),
        _ => None,
    };

    let validation = context.validation_for(document)?;
    match coordinator
        .request_move(&mut projection, request, &actor, &validation)
        .await
    {
        Ok(Some(outcome)) => println!("{}", outcome.message()),
        Ok(None) => println!("\"{}\" is already there", document),
        Err(e @ KanflowError::ValidationDenied { .. }) => {
            if let Some(hint) = hint {
                eprintln!("{}", hint);
            }
            return Err(e);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
