//! Board configuration loading with defaults

use std::path::Path;

use crate::errors::Result;
use crate::fs;
use crate::schemas::WorkflowConfig;

/// Load the board configuration, falling back to the default board.
///
/// If config.json exists it is read, with omitted fields taking their
/// defaults. The result is validated before it is returned.
///
/// # Errors
/// * `InvalidJson` - If config.json cannot be parsed
/// * `ConfigError` - If the board definition is inconsistent
pub fn load_config(root: &Path) -> Result<WorkflowConfig> {
    let config = fs::read_config(root)?;
    config.validate()?;
    tracing::debug!(
        states = config.states.len(),
        schema_types = ?config.schema_types,
        "loaded board config"
    );
    Ok(config)
}
