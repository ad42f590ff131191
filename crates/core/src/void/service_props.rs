//! Property-based tests for the void request state machine.

use proptest::prelude::*;
use uuid::Uuid;

use super::service::VoidWorkflow;
use super::types::{VoidAction, VoidRequestStatus};

fn status_strategy() -> impl Strategy<Value = VoidRequestStatus> {
    prop_oneof![
        Just(VoidRequestStatus::Pending),
        Just(VoidRequestStatus::Approved),
        Just(VoidRequestStatus::Rejected),
    ]
}

fn non_blank_reason() -> impl Strategy<Value = String> {
    "[a-z]{1,40}( [a-z]{1,10}){0,5}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Only pending requests can ever be resolved, whichever way.
    #[test]
    fn prop_only_pending_resolves(
        status in status_strategy(),
        approve in any::<bool>(),
        reason in non_blank_reason(),
    ) {
        let result = if approve {
            VoidWorkflow::approve(status, Uuid::now_v7())
        } else {
            VoidWorkflow::reject(status, Uuid::now_v7(), reason)
        };

        if status == VoidRequestStatus::Pending {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// A resolved request is terminal: no action ever produces a
    /// transition out of Approved or Rejected.
    #[test]
    fn prop_resolved_is_terminal(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        if from.is_resolved() {
            prop_assert!(!VoidWorkflow::is_valid_transition(from, to));
        }
    }

    /// Every successful action lands on a status reachable from its
    /// starting point.
    #[test]
    fn prop_actions_respect_transition_table(
        approve in any::<bool>(),
        reason in non_blank_reason(),
    ) {
        let action = if approve {
            VoidWorkflow::approve(VoidRequestStatus::Pending, Uuid::now_v7())
        } else {
            VoidWorkflow::reject(VoidRequestStatus::Pending, Uuid::now_v7(), reason)
        };
        let action = action.unwrap();
        prop_assert!(VoidWorkflow::is_valid_transition(
            VoidRequestStatus::Pending,
            action.new_status(),
        ));
    }

    /// Requests never open against a voided payment or alongside an
    /// existing pending request.
    #[test]
    fn prop_request_guards(
        voided in any::<bool>(),
        pending in any::<bool>(),
        reason in non_blank_reason(),
    ) {
        let result = VoidWorkflow::request(
            Uuid::now_v7(),
            voided,
            pending,
            Uuid::now_v7(),
            reason,
        );

        if voided || pending {
            prop_assert!(result.is_err());
        } else {
            let is_request = matches!(result, Ok(VoidAction::Request { .. }));
            prop_assert!(is_request);
        }
    }
}
