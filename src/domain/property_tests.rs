//! Property-based tests for domain logic
//!
//! These tests use proptest to verify invariants across many random inputs.

#[cfg(test)]
mod tests {
    use crate::domain::transitions::apply_state_transition;
    use crate::domain::validation::{
        assignment_gate, can_transition, role_gate, transition_gate, validation_gate, Denial,
    };
    use crate::schemas::{
        default_states, Actor, FindingLevel, State, ValidationFinding, ValidationStatus,
        ValidationSummary, WorkflowMetadata,
    };
    use proptest::prelude::*;

    // ===== STRATEGY HELPERS =====

    /// Generate a role set drawn from a small vocabulary
    fn any_roles() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop_oneof![Just("editor"), Just("administrator"), Just("viewer")],
            0..3,
        )
        .prop_map(|roles| roles.into_iter().map(String::from).collect())
    }

    /// Generate an actor with a few possible ids
    fn any_actor() -> impl Strategy<Value = Actor> {
        (prop_oneof![Just("u1"), Just("u2"), Just("u3")], any_roles())
            .prop_map(|(id, roles)| Actor::new(id, roles))
    }

    /// Generate an assignee list
    fn any_assignees() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop_oneof![Just("u1"), Just("u2"), Just("u4")], 0..3)
            .prop_map(|ids| ids.into_iter().map(String::from).collect())
    }

    /// Generate a validation summary
    fn any_validation() -> impl Strategy<Value = ValidationSummary> {
        (
            any::<bool>(),
            prop::collection::vec(
                prop_oneof![Just(FindingLevel::Error), Just(FindingLevel::Warning)],
                0..3,
            ),
        )
            .prop_map(|(validating, levels)| ValidationSummary {
                status: if validating {
                    ValidationStatus::Validating
                } else {
                    ValidationStatus::Settled
                },
                findings: levels
                    .into_iter()
                    .map(|level| ValidationFinding {
                        level,
                        message: "finding".to_string(),
                        path: None,
                    })
                    .collect(),
            })
    }

    /// Generate a random four-column board
    fn any_board() -> impl Strategy<Value = Vec<State>> {
        prop::collection::vec(
            (
                prop::collection::vec(0usize..4, 0..3),
                prop::option::of(any_roles()),
                any::<bool>(),
                any::<bool>(),
            ),
            4,
        )
        .prop_map(|columns| {
            columns
                .into_iter()
                .enumerate()
                .map(|(i, (transitions, roles, assign, validate))| {
                    let mut state = State::new(format!("s{}", i), format!("State {}", i))
                        .with_transitions(transitions.into_iter().map(|t| format!("s{}", t)));
                    state.roles = roles;
                    state.require_assignment = assign;
                    state.require_validation = validate;
                    state
                })
                .collect()
        })
    }

    // ===== PURITY TESTS =====

    proptest! {
        /// Property: identical inputs always give identical decisions
        #[test]
        fn test_can_transition_is_pure(
            board in any_board(),
            actor in any_actor(),
            from in 0usize..4,
            to in 0usize..4,
            assignees in any_assignees(),
            validation in any_validation()
        ) {
            let first = can_transition(&board, &actor, &board[from], &board[to], &assignees, &validation);
            let second = can_transition(&board, &actor, &board[from], &board[to], &assignees, &validation);
            prop_assert_eq!(first, second);
        }

        /// Property: allowed exactly when every gate passes
        #[test]
        fn test_allowed_iff_all_gates_pass(
            board in any_board(),
            actor in any_actor(),
            from in 0usize..4,
            to in 0usize..4,
            assignees in any_assignees(),
            validation in any_validation()
        ) {
            let (current, target) = (&board[from], &board[to]);
            let decision = can_transition(&board, &actor, current, target, &assignees, &validation);
            let gates_pass = role_gate(&actor, target)
                && transition_gate(current, target)
                && assignment_gate(&actor, target, &assignees)
                && validation_gate(current, &validation).is_none();
            prop_assert_eq!(decision.allowed, gates_pass);
            prop_assert_eq!(decision.allowed, decision.denial.is_none());
        }

        /// Property: each denial kind produces its own reason wording
        #[test]
        fn test_denial_reasons_are_distinguishable(
            board in any_board(),
            actor in any_actor(),
            from in 0usize..4,
            to in 0usize..4,
            assignees in any_assignees(),
            validation in any_validation()
        ) {
            let decision = can_transition(&board, &actor, &board[from], &board[to], &assignees, &validation);
            let marker = match decision.denial {
                None => return Ok(()),
                Some(Denial::Role) => "Your User role cannot",
                Some(Denial::Transition) => "You cannot",
                Some(Denial::Assignment) => "You must be assigned",
                Some(Denial::Validating) => "Document is validating",
                Some(Denial::ValidationErrors) => "Document has validation errors",
            };
            prop_assert!(decision.reason.starts_with(marker));
        }
    }

    // ===== IMMUTABILITY TESTS =====

    proptest! {
        /// Property: apply_state_transition never mutates its input
        #[test]
        fn test_apply_transition_never_mutates(
            actor in any_actor(),
            from in 0usize..3,
            to in 0usize..3,
            assignees in any_assignees(),
            validation in any_validation()
        ) {
            let states = default_states();
            let record = WorkflowMetadata::new("doc", states[from].id.clone(), None)
                .with_assignees(assignees);
            let original = record.clone();
            let _ = apply_state_transition(&states, &actor, &record, &states[to].id, &validation);
            prop_assert_eq!(record, original);
        }

        /// Property: a successful transition only changes the state
        #[test]
        fn test_success_only_changes_state(
            actor in any_actor(),
            from in 0usize..3,
            to in 0usize..3,
            assignees in any_assignees()
        ) {
            let states = default_states();
            let record = WorkflowMetadata::new("doc", states[from].id.clone(), Some("0|100000:".into()))
                .with_assignees(assignees)
                .with_revision("r7");
            let result = apply_state_transition(
                &states, &actor, &record, &states[to].id, &ValidationSummary::clean(),
            );
            if let Some(next) = result.metadata() {
                prop_assert_eq!(&next.state, &states[to].id);
                prop_assert_eq!(next.with_state(record.state.clone()), record);
            }
        }
    }
}
