//! Doctor command - Scan workflow metadata and repair one category at a time

use std::path::Path;
use std::str::FromStr;

use crate::cli::BoardContext;
use crate::errors::{KanflowError, Result};
use crate::reconcile::{plan, plan_reset_order, Reconciler, ViolationCategory, ViolationReport};
use crate::store::MetadataStore;

/// What `--fix` asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fix {
    Category(ViolationCategory),
    /// Re-spread every record over the default range
    ResetOrder,
}

impl FromStr for Fix {
    type Err = KanflowError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "resetOrder" {
            return Ok(Fix::ResetOrder);
        }
        s.parse().map(Fix::Category)
    }
}

fn print_report(report: &ViolationReport) {
    if report.is_clean() {
        println!("No problems found");
        return;
    }
    for (category, ids) in report.found() {
        println!("{} ({})", category.fix_label(ids.len()), category);
        for id in ids {
            println!("  {}", id);
        }
    }
}

/// Scan the board, then optionally repair one category.
///
/// With `dry_run` the repair batch is built and described but not committed.
pub async fn run(cwd: Option<&Path>, json: bool, fix: Option<&str>, dry_run: bool) -> Result<()> {
    let fix = fix.map(Fix::from_str).transpose()?;

    let context = BoardContext::open(cwd)?;
    let store = context.store()?;
    let documents = context.documents()?;
    let reconciler = Reconciler::new(&store, &context.config.states, &context.users);

    let report = reconciler.scan(&documents).await?;
    if json {
        let output = serde_json::to_string_pretty(&report)
            .map_err(|e| KanflowError::InvalidJson(e.to_string()))?;
        println!("{}", output);
    } else {
        print_report(&report);
    }

    let Some(fix) = fix else {
        return Ok(());
    };

    match fix {
        Fix::Category(category) => {
            let ids = report.get(category);
            if dry_run {
                let records = store.list().await?;
                let batch = plan(category, &records, ids, &context.config.states, &context.users)?;
                println!("[dry-run] Would {}", category.fix_label(batch.len()));
                return Ok(());
            }
            let count = reconciler.apply(category, ids).await?;
            println!("{}", category.done_message(count));
        }
        Fix::ResetOrder => {
            let records = store.list().await?;
            let ids: Vec<String> = records.iter().map(|r| r.document_id.clone()).collect();
            if dry_run {
                let batch = plan_reset_order(&records, &ids)?;
                println!("[dry-run] Would reset order for {} documents", batch.len());
                return Ok(());
            }
            let count = reconciler.reset_order(&ids).await?;
            println!("Reset order for {} documents", count);
        }
    }
    Ok(())
}
