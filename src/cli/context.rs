//! Board files loaded once per command

use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::coordinator::{MoveCoordinator, Projection};
use crate::errors::{KanflowError, Result};
use crate::fs;
use crate::schemas::{Actor, User, ValidationSummary, WorkflowConfig};
use crate::store::{JsonFileStore, MetadataStore};

/// The board a command operates on
pub struct BoardContext {
    pub root: PathBuf,
    pub config: WorkflowConfig,
    pub users: Vec<User>,
}

impl BoardContext {
    /// Locate the board above `cwd` and load its config and users
    pub fn open(cwd: Option<&Path>) -> Result<Self> {
        let root = fs::find_board_root(&fs::resolve_cwd(cwd))?;
        let config = load_config(&root)?;
        let users = fs::read_users(&root)?;
        tracing::debug!(root = %root.display(), users = users.len(), "opened board");
        Ok(BoardContext {
            root,
            config,
            users,
        })
    }

    pub fn store(&self) -> Result<JsonFileStore> {
        JsonFileStore::open(fs::get_metadata_path(&self.root))
    }

    pub fn coordinator(&self) -> Result<MoveCoordinator<JsonFileStore>> {
        Ok(MoveCoordinator::new(self.store()?, self.config.states.clone()))
    }

    /// Current board as a fresh projection
    pub async fn projection<S: MetadataStore>(&self, store: &S) -> Result<Projection> {
        Ok(Projection::new(store.list().await?))
    }

    /// The acting user, with roles from users.json
    pub fn actor(&self, user_id: &str) -> Result<Actor> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(User::as_actor)
            .ok_or_else(|| KanflowError::NotFound("Could not find User".to_string()))
    }

    /// Validation summary for a document; documents without one are clean
    pub fn validation_for(&self, document_id: &str) -> Result<ValidationSummary> {
        let mut summaries = fs::read_validation(&self.root)?;
        Ok(summaries.remove(document_id).unwrap_or_default())
    }

    pub fn documents(&self) -> Result<Vec<String>> {
        fs::read_documents(&self.root)
    }
}
