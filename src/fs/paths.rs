//! Path resolution utilities for kanflow
//!
//! Provides functions to locate the board root and construct paths
//! to the files inside the .kanflow directory.

use std::path::{Path, PathBuf};

use crate::errors::{KanflowError, Result};

/// Name of the board directory
pub const KANFLOW_DIR: &str = ".kanflow";

/// Find the board root containing a .kanflow directory.
///
/// Walks up the directory tree from the starting directory looking for
/// the nearest directory that contains .kanflow.
///
/// # Errors
/// * `RepoNotFound` - If the path cannot be resolved or no board is found
pub fn find_board_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd
        .canonicalize()
        .map_err(|e| KanflowError::RepoNotFound(format!("Cannot resolve path: {}", e)))?;

    loop {
        if current.join(KANFLOW_DIR).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(KanflowError::RepoNotFound(format!(
                    "Could not find a {} directory (run `kanflow init`)",
                    KANFLOW_DIR
                )));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Get the path to the .kanflow directory.
pub fn get_kanflow_dir(root: &Path) -> PathBuf {
    root.join(KANFLOW_DIR)
}

/// Get the path to the config.json file.
pub fn get_config_path(root: &Path) -> PathBuf {
    get_kanflow_dir(root).join("config.json")
}

/// Get the path to the metadata store file.
pub fn get_metadata_path(root: &Path) -> PathBuf {
    get_kanflow_dir(root).join("metadata.json")
}

/// Get the path to the project user list.
pub fn get_users_path(root: &Path) -> PathBuf {
    get_kanflow_dir(root).join("users.json")
}

/// Get the path to the list of existing content documents.
pub fn get_documents_path(root: &Path) -> PathBuf {
    get_kanflow_dir(root).join("documents.json")
}

/// Get the path to the per-document validation summaries.
pub fn get_validation_path(root: &Path) -> PathBuf {
    get_kanflow_dir(root).join("validation.json")
}
