//! Domain logic for workflow states and transitions

mod states;
mod transitions;
mod validation;

// Property-based tests (compiled only in test builds)
#[cfg(test)]
mod property_tests;

pub use states::{
    find_state, first_state, get_state_index, is_terminal_state, last_state, Direction,
};
pub use transitions::{
    apply_state_transition, check_completion, TransitionResult, COMPLETION_ALLOWED,
    COMPLETION_DENIED,
};
pub use validation::{
    assignment_gate, can_transition, drop_targets, role_gate, transition_gate, undroppable_states,
    user_role_can_drop, validation_gate, Denial, TransitionDecision,
};
