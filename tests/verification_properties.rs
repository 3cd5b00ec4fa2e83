// Property-based tests for the verification rules.
// The transition and visibility functions are pure, so every input is fair game.

mod fixtures;

use property_review::verification::{
    allowed_transitions, is_transition_allowed, visibility_change_allowed, visibility_target,
    VerificationStatus, Visibility,
};
use property_review::workflow::ActionMenu;
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = VerificationStatus> {
    prop_oneof![
        Just(VerificationStatus::Red),
        Just(VerificationStatus::Yellow),
        Just(VerificationStatus::Green),
        Just(VerificationStatus::Unknown),
    ]
}

fn visibility_strategy() -> impl Strategy<Value = Visibility> {
    prop_oneof![Just(Visibility::Public), Just(Visibility::Private)]
}

// Raw wire values that are not one of the three known statuses.
fn unrecognized_wire_status() -> impl Strategy<Value = String> {
    "[A-Za-z_]{0,12}".prop_filter("known statuses excluded", |s| {
        !matches!(s.as_str(), "RED" | "YELLOW" | "GREEN")
    })
}

proptest! {
    #[test]
    fn transitions_never_move_backwards(status in status_strategy()) {
        for target in allowed_transitions(status) {
            let from = status.rank().expect("only known statuses have transitions");
            let to = target.rank().expect("targets are always known statuses");
            prop_assert!(to > from, "{status} -> {target} goes backwards");
        }
    }

    #[test]
    fn green_is_terminal(_seed in any::<u8>()) {
        prop_assert!(allowed_transitions(VerificationStatus::Green).is_empty());
        prop_assert!(VerificationStatus::Green.is_terminal());
    }

    #[test]
    fn red_and_yellow_offer_exact_targets(_seed in any::<u8>()) {
        prop_assert_eq!(
            allowed_transitions(VerificationStatus::Red),
            &[VerificationStatus::Yellow, VerificationStatus::Green]
        );
        prop_assert_eq!(
            allowed_transitions(VerificationStatus::Yellow),
            &[VerificationStatus::Green]
        );
    }

    #[test]
    fn unrecognized_status_offers_nothing(raw in unrecognized_wire_status()) {
        let status: VerificationStatus = serde_json::from_value(serde_json::Value::String(raw)).unwrap();
        prop_assert_eq!(status, VerificationStatus::Unknown);
        prop_assert!(allowed_transitions(status).is_empty());
        prop_assert!(!visibility_change_allowed(status));
    }

    #[test]
    fn is_transition_allowed_agrees_with_list(from in status_strategy(), to in status_strategy()) {
        prop_assert_eq!(
            is_transition_allowed(from, to),
            allowed_transitions(from).contains(&to)
        );
    }

    #[test]
    fn visibility_gate_opens_only_for_green(status in status_strategy(), current in visibility_strategy()) {
        let allowed = visibility_change_allowed(status);
        prop_assert_eq!(allowed, status == VerificationStatus::Green);
        prop_assert_eq!(visibility_target(status, current).is_some(), allowed);
    }

    #[test]
    fn toggle_offers_the_opposite_visibility(current in visibility_strategy()) {
        let target = visibility_target(VerificationStatus::Green, current);
        prop_assert_eq!(target, Some(current.toggled()));
        prop_assert_ne!(target, Some(current));
    }

    #[test]
    fn action_menu_mirrors_the_rules(
        status in status_strategy(),
        visibility in visibility_strategy(),
        enabled in any::<bool>(),
    ) {
        let property = fixtures::property("prop-x", status, visibility);
        let menu = ActionMenu::for_property(&property, enabled);

        prop_assert_eq!(menu.status_targets.as_slice(), allowed_transitions(status));
        prop_assert_eq!(menu.visibility_target, visibility_target(status, visibility));
        for target in VerificationStatus::ALL {
            prop_assert_eq!(menu.offers_status(target), enabled && is_transition_allowed(status, target));
        }
    }
}
