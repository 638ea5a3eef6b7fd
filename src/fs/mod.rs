//! File system utilities for kanflow
//!
//! Provides path resolution and JSON file operations.

mod json;
mod paths;

pub use json::{read_config, read_documents, read_json, read_users, read_validation, write_json};
pub use paths::{
    find_board_root, get_config_path, get_documents_path, get_kanflow_dir, get_metadata_path,
    get_users_path, get_validation_path, resolve_cwd, KANFLOW_DIR,
};
