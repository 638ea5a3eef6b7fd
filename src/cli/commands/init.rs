//! Init command - Create a new kanflow board

use std::path::Path;

use crate::errors::{KanflowError, Result};
use crate::fs;
use crate::schemas::WorkflowConfig;

/// Create `.kanflow/` with the default board in the specified directory.
///
/// Existing metadata, users and documents files are never overwritten;
/// `force` only replaces config.json.
pub async fn run(cwd: Option<&Path>, force: bool, dry_run: bool) -> Result<()> {
    let root = fs::resolve_cwd(cwd);
    let config_path = fs::get_config_path(&root);

    if config_path.exists() && !force {
        return Err(KanflowError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }

    let empty_files = [
        fs::get_metadata_path(&root),
        fs::get_users_path(&root),
        fs::get_documents_path(&root),
    ];

    if dry_run {
        println!("Would write {}", config_path.display());
        for path in empty_files.iter().filter(|p| !p.exists()) {
            println!("Would create {}", path.display());
        }
        return Ok(());
    }

    fs::write_json(&config_path, &WorkflowConfig::default())?;
    for path in empty_files.iter().filter(|p| !p.exists()) {
        fs::write_json(path, &Vec::<String>::new())?;
    }

    tracing::info!(root = %root.display(), "board initialized");
    println!("Initialized kanflow board in {}", fs::get_kanflow_dir(&root).display());
    Ok(())
}
