//! Config schema - board definition for kanflow

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{KanflowError, Result};

use super::{State, StateColor};

/// Main configuration for a kanflow board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Document types that may enter the workflow
    #[serde(default)]
    pub schema_types: Vec<String>,

    /// Ordered board columns, left to right
    #[serde(default = "default_states")]
    pub states: Vec<State>,
}

fn default_schema_version() -> u32 {
    1
}

/// The stock three-column review board
pub fn default_states() -> Vec<State> {
    vec![
        State::new("inReview", "In review")
            .with_color(StateColor::Primary)
            .with_roles(["editor", "administrator"])
            .with_transitions(["changesRequested", "approved"]),
        State::new("changesRequested", "Changes requested")
            .with_color(StateColor::Warning)
            .with_roles(["editor", "administrator"])
            .with_transitions(["approved"]),
        State::new("approved", "Approved")
            .with_color(StateColor::Success)
            .with_roles(["administrator"])
            .with_transitions(["changesRequested"])
            .requiring_assignment(),
    ]
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            schema_version: 1,
            schema_types: Vec::new(),
            states: default_states(),
        }
    }
}

impl WorkflowConfig {
    /// Check the board definition: at least one state, unique ids, and
    /// every transition pointing at a declared state.
    pub fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(KanflowError::ConfigError(
                "No States defined in plugin config".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for state in &self.states {
            if !seen.insert(state.id.as_str()) {
                return Err(KanflowError::ConfigError(format!(
                    "duplicate state id \"{}\"",
                    state.id
                )));
            }
        }

        for state in &self.states {
            if let Some(target) = state.transitions.iter().find(|t| !seen.contains(t.as_str())) {
                return Err(KanflowError::ConfigError(format!(
                    "state \"{}\" lists transition to undeclared state \"{}\"",
                    state.id, target
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = WorkflowConfig::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.states.len(), 3);
        assert_eq!(config.states[0].id, "inReview");
        assert_eq!(config.states[2].id, "approved");
        assert!(config.states[2].require_assignment);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json() {
        let parsed: WorkflowConfig = serde_json::from_str(r#"{"schemaTypes": ["article"]}"#).unwrap();
        assert_eq!(parsed.schema_types, vec!["article"]);
        assert_eq!(parsed.states, default_states());
    }

    #[test]
    fn test_validate_rejects_empty_board() {
        let config = WorkflowConfig {
            states: vec![],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_validate_rejects_dangling_transition() {
        let config = WorkflowConfig {
            states: vec![
                State::new("a", "A").with_transitions(["b"]),
                State::new("c", "C"),
            ],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared state \"b\""));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let config = WorkflowConfig {
            states: vec![State::new("a", "A"), State::new("a", "Again")],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = WorkflowConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"requireAssignment\": true"));
        let parsed: WorkflowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
