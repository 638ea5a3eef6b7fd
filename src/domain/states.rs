//! Board state sequence helpers
//!
//! The declared order of states is the board's column order, left to right.
//! Order matters for the default entry state (first), the terminal state
//! (last) and for labelling a move as a promotion or a demotion.

use crate::schemas::State;

/// Get the 0-based column index of a state id, if declared.
pub fn get_state_index(states: &[State], id: &str) -> Option<usize> {
    states.iter().position(|s| s.id == id)
}

/// Look up a declared state by id.
pub fn find_state<'a>(states: &'a [State], id: &str) -> Option<&'a State> {
    states.iter().find(|s| s.id == id)
}

/// The state every document enters the workflow in.
pub fn first_state(states: &[State]) -> Option<&State> {
    states.first()
}

/// The only state a document may complete the workflow from.
pub fn last_state(states: &[State]) -> Option<&State> {
    states.last()
}

/// Check if a state id is the terminal (last declared) state.
pub fn is_terminal_state(states: &[State], id: &str) -> bool {
    last_state(states).is_some_and(|s| s.id == id)
}

/// Label for a move between two columns. Never used for gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Promote,
    Demote,
}

impl Direction {
    /// `Promote` when the target sits right of the current state, else `Demote`.
    ///
    /// An undeclared current state counts as being left of every column.
    pub fn classify(states: &[State], current: &str, target: &str) -> Direction {
        let current_index = get_state_index(states, current);
        let target_index = get_state_index(states, target);
        match (current_index, target_index) {
            (Some(c), Some(t)) if t > c => Direction::Promote,
            (None, Some(_)) => Direction::Promote,
            _ => Direction::Demote,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Promote => "Promote",
            Direction::Demote => "Demote",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
