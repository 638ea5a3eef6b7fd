//! JSON file operations with schema validation
//!
//! Provides functions to read and write JSON files with serde validation.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{KanflowError, Result};
use crate::schemas::{User, ValidationSummary, WorkflowConfig};

use super::paths::{get_config_path, get_documents_path, get_users_path, get_validation_path};

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file contains invalid JSON or does not match the expected schema
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KanflowError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            KanflowError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        KanflowError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Uses atomic write (write to temp file, then rename) to avoid partial writes.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content =
        serde_json::to_string_pretty(data).map_err(|e| KanflowError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read a JSON file, returning `T::default()` when it does not exist.
fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "file missing, using default");
        return Ok(T::default());
    }
    read_json(path)
}

/// Read the board config, or the default board if config.json doesn't exist.
pub fn read_config(root: &Path) -> Result<WorkflowConfig> {
    read_json_or_default(&get_config_path(root))
}

/// Read the project user list. Missing file means no identity provider.
pub fn read_users(root: &Path) -> Result<Vec<User>> {
    read_json_or_default(&get_users_path(root))
}

/// Read the ids of content documents that still exist.
pub fn read_documents(root: &Path) -> Result<Vec<String>> {
    read_json_or_default(&get_documents_path(root))
}

/// Read validation summaries keyed by content document id.
pub fn read_validation(root: &Path) -> Result<BTreeMap<String, ValidationSummary>> {
    read_json_or_default(&get_validation_path(root))
}
