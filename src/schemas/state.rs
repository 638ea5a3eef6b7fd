//! State schema - one column of the board

use serde::{Deserialize, Serialize};

/// Display tone for a state's column header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateColor {
    Primary,
    Success,
    Warning,
    Danger,
}

/// A named workflow stage with its transition and permission rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Unique identifier, referenced by `transitions` and by metadata records
    pub id: String,

    /// Human-readable title shown on the column and in messages
    pub title: String,

    /// State ids this state may move to. Empty means any state.
    #[serde(default)]
    pub transitions: Vec<String>,

    /// Roles allowed to move documents into this state. Absent or empty means anyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Whether the actor must be an assignee to move a document here
    #[serde(default)]
    pub require_assignment: bool,

    /// Whether documents leaving this state must pass validation
    #[serde(default)]
    pub require_validation: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<StateColor>,
}

impl State {
    /// Create an open state: no role limits, no transition limits
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        State {
            id: id.into(),
            title: title.into(),
            transitions: Vec::new(),
            roles: None,
            require_assignment: false,
            require_validation: false,
            color: None,
        }
    }

    pub fn with_transitions<I, S>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transitions = transitions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_color(mut self, color: StateColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn requiring_assignment(mut self) -> Self {
        self.require_assignment = true;
        self
    }

    pub fn requiring_validation(mut self) -> Self {
        self.require_validation = true;
        self
    }

    /// The declared role list, if it limits anyone at all
    pub fn restricted_roles(&self) -> Option<&[String]> {
        match &self.roles {
            Some(roles) if !roles.is_empty() => Some(roles.as_slice()),
            _ => None,
        }
    }

    /// Whether `transitions` restricts the allowed targets
    pub fn limits_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_deserializes_camel_case() {
        let json = r#"{
            "id": "approved",
            "title": "Approved",
            "roles": ["administrator"],
            "transitions": ["changesRequested"],
            "requireAssignment": true,
            "color": "success"
        }"#;
        let state: State = serde_json::from_str(json).unwrap();
        assert_eq!(state.id, "approved");
        assert!(state.require_assignment);
        assert!(!state.require_validation);
        assert_eq!(state.color, Some(StateColor::Success));
        assert_eq!(state.restricted_roles(), Some(&["administrator".to_string()][..]));
    }

    #[test]
    fn test_minimal_state_defaults() {
        let state: State = serde_json::from_str(r#"{"id": "draft", "title": "Draft"}"#).unwrap();
        assert!(state.transitions.is_empty());
        assert!(state.roles.is_none());
        assert!(!state.limits_transitions());
        assert!(state.restricted_roles().is_none());
    }

    #[test]
    fn test_empty_roles_are_unrestricted() {
        let state = State::new("a", "A").with_roles(Vec::<String>::new());
        assert!(state.restricted_roles().is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let state = State::new("review", "Review")
            .with_roles(["editor"])
            .with_transitions(["approved"])
            .requiring_validation();
        assert_eq!(state.transitions, vec!["approved"]);
        assert!(state.require_validation);
        assert!(!state.require_assignment);
    }

    #[test]
    fn test_serialization_skips_absent_options() {
        let json = serde_json::to_string(&State::new("a", "A")).unwrap();
        assert!(!json.contains("\"roles\""));
        assert!(!json.contains("\"color\""));
        assert!(json.contains("\"requireAssignment\":false"));
    }
}
