//! Gate checks for state transitions
//!
//! Each decision is a pure function of the actor, the two states, the
//! document's assignees and its validation summary. Gates run in a fixed
//! order and the first failure decides the reason.

use crate::schemas::{Actor, State, ValidationSummary};

use super::states::Direction;

/// Which gate refused a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Actor holds none of the target state's roles
    Role,
    /// Target is not in the current state's transitions
    Transition,
    /// Target requires assignment and the actor is not assigned
    Assignment,
    /// Current state requires validation and it is still running
    Validating,
    /// Current state requires validation and it reported errors
    ValidationErrors,
}

impl Denial {
    /// User-facing explanation for this denial
    pub fn reason(self, direction: Direction, current: &State, target: &State) -> String {
        match self {
            Denial::Role => format!(
                "Your User role cannot {} State to \"{}\"",
                direction, target.title
            ),
            Denial::Transition => format!(
                "You cannot {} State to \"{}\" from \"{}\"",
                direction, target.title, current.title
            ),
            Denial::Assignment => format!(
                "You must be assigned to the document to {} State to \"{}\"",
                direction, target.title
            ),
            Denial::Validating => format!(
                "Document is validating, cannot {} State to \"{}\"",
                direction, target.title
            ),
            Denial::ValidationErrors => format!(
                "Document has validation errors, cannot {} State to \"{}\"",
                direction, target.title
            ),
        }
    }
}

/// Outcome of a transition check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionDecision {
    /// Whether the move may proceed
    pub allowed: bool,

    /// Label when allowed, explanation when denied
    pub reason: String,

    /// The failing gate, if any
    pub denial: Option<Denial>,

    pub direction: Direction,
}

impl TransitionDecision {
    fn allow(direction: Direction, target: &State) -> Self {
        TransitionDecision {
            allowed: true,
            reason: format!("{} State to \"{}\"", direction, target.title),
            denial: None,
            direction,
        }
    }

    fn deny(denial: Denial, direction: Direction, current: &State, target: &State) -> Self {
        TransitionDecision {
            allowed: false,
            reason: denial.reason(direction, current, target),
            denial: Some(denial),
            direction,
        }
    }
}

/// Gate 1: the actor holds one of the target's roles, or the target names none
pub fn role_gate(actor: &Actor, target: &State) -> bool {
    match target.restricted_roles() {
        Some(roles) => actor.has_any_role(roles),
        None => true,
    }
}

/// Gate 2: the target is listed in the current state's transitions, or the list is empty
pub fn transition_gate(current: &State, target: &State) -> bool {
    !current.limits_transitions() || current.transitions.iter().any(|t| *t == target.id)
}

/// Gate 3: the actor is assigned when the target requires it
pub fn assignment_gate(actor: &Actor, target: &State, assignees: &[String]) -> bool {
    !target.require_assignment || assignees.iter().any(|a| *a == actor.id)
}

/// Gate 4: validation of the document, judged by the current state's flag
pub fn validation_gate(current: &State, validation: &ValidationSummary) -> Option<Denial> {
    if !current.require_validation {
        return None;
    }
    if validation.is_validating() {
        return Some(Denial::Validating);
    }
    if validation.has_errors() {
        return Some(Denial::ValidationErrors);
    }
    None
}

/// Decide whether `actor` may move a document from `current` to `target`.
///
/// `states` is the board's declared order, used only to label the direction.
pub fn can_transition(
    states: &[State],
    actor: &Actor,
    current: &State,
    target: &State,
    assignees: &[String],
    validation: &ValidationSummary,
) -> TransitionDecision {
    let direction = Direction::classify(states, &current.id, &target.id);

    let denial = if !role_gate(actor, target) {
        Some(Denial::Role)
    } else if !transition_gate(current, target) {
        Some(Denial::Transition)
    } else if !assignment_gate(actor, target, assignees) {
        Some(Denial::Assignment)
    } else {
        validation_gate(current, validation)
    };

    let decision = match denial {
        Some(denial) => TransitionDecision::deny(denial, direction, current, target),
        None => TransitionDecision::allow(direction, target),
    };
    tracing::debug!(
        actor = %actor.id,
        from = %current.id,
        to = %target.id,
        allowed = decision.allowed,
        reason = %decision.reason,
        "transition checked"
    );
    decision
}

/// Per-column drop check: whether the actor's roles admit documents into `state`
pub fn user_role_can_drop(state: &State, actor: &Actor) -> bool {
    role_gate(actor, state)
}

/// State ids a drag starting in `current` cannot land in, excluding `current` itself.
///
/// Covers the assignment rule for every assignment-gated state and the
/// current state's transition list. Roles are not considered here; combine
/// with [`user_role_can_drop`] per column, or use [`drop_targets`].
pub fn undroppable_states(
    states: &[State],
    current: &State,
    actor: &Actor,
    assignees: &[String],
) -> Vec<String> {
    let assigned = assignees.iter().any(|a| *a == actor.id);

    states
        .iter()
        .filter(|s| s.id != current.id)
        .filter(|s| (s.require_assignment && !assigned) || !transition_gate(current, s))
        .map(|s| s.id.clone())
        .collect()
}

/// States other than `current` that a drag can land in: open to the actor's
/// roles and not listed by [`undroppable_states`]. Validation is not
/// considered.
pub fn drop_targets<'a>(
    states: &'a [State],
    current: &State,
    actor: &Actor,
    assignees: &[String],
) -> Vec<&'a State> {
    let blocked = undroppable_states(states, current, actor, assignees);
    states
        .iter()
        .filter(|s| s.id != current.id)
        .filter(|s| !blocked.contains(&s.id) && user_role_can_drop(s, actor))
        .collect()
}
