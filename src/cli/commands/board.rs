//! Board command - Show every column in rank order

use std::path::Path;

use serde::Serialize;

use crate::cli::BoardContext;
use crate::coordinator::Projection;
use crate::domain::find_state;
use crate::errors::{KanflowError, Result};
use crate::schemas::{State, WorkflowMetadata};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ColumnView<'a> {
    id: &'a str,
    title: &'a str,
    documents: Vec<&'a WorkflowMetadata>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardView<'a> {
    columns: Vec<ColumnView<'a>>,
    /// Records whose state is not on the board
    undefined: Vec<&'a WorkflowMetadata>,
}

fn build_view<'a>(states: &'a [State], projection: &'a Projection) -> BoardView<'a> {
    let columns = states
        .iter()
        .map(|state| ColumnView {
            id: &state.id,
            title: &state.title,
            documents: projection.column(&state.id),
        })
        .collect();
    let undefined = projection
        .records()
        .filter(|r| find_state(states, &r.state).is_none())
        .collect();
    BoardView { columns, undefined }
}

fn print_card(record: &WorkflowMetadata) {
    let rank = record.order_rank.as_deref().unwrap_or("-");
    if record.assignees.is_empty() {
        println!("  {:<14} {}", rank, record.document_id);
    } else {
        println!(
            "  {:<14} {}  [{}]",
            rank,
            record.document_id,
            record.assignees.join(", ")
        );
    }
}

/// Print the board, as text or JSON
pub async fn run(cwd: Option<&Path>, json: bool) -> Result<()> {
    let context = BoardContext::open(cwd)?;
    let store = context.store()?;
    let projection = context.projection(&store).await?;
    let view = build_view(&context.config.states, &projection);

    if json {
        let output = serde_json::to_string_pretty(&view)
            .map_err(|e| KanflowError::InvalidJson(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    for column in &view.columns {
        println!("{} ({}) [{}]", column.title, column.id, column.documents.len());
        for record in &column.documents {
            print_card(record);
        }
    }
    if !view.undefined.is_empty() {
        println!("Undefined state [{}]", view.undefined.len());
        for record in &view.undefined {
            print_card(record);
        }
    }
    Ok(())
}
