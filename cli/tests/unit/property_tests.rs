//! Property-based tests for stack names and command-line masking.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use pulumi_automation::domain::command::{MASK, config_set, display_command};
use pulumi_automation::domain::{stack_short_name, validate_stack_name};

proptest! {
    /// One to three well-formed segments are always accepted.
    #[test]
    fn prop_well_formed_names_accepted(
        segments in prop::collection::vec("[A-Za-z0-9_.-]{1,12}", 1..=3)
    ) {
        let name = segments.join("/");
        prop_assert!(validate_stack_name(&name).is_ok(), "rejected: {}", name);
    }

    /// The short name is always the trailing segment.
    #[test]
    fn prop_short_name_is_last_segment(
        segments in prop::collection::vec("[A-Za-z0-9_.-]{1,12}", 1..=3)
    ) {
        let name = segments.join("/");
        prop_assert_eq!(stack_short_name(&name), segments.last().expect("non-empty").as_str());
    }

    /// A character outside the segment alphabet makes the name invalid.
    #[test]
    fn prop_foreign_character_rejected(
        prefix in "[a-z]{0,6}",
        bad in "[ :;@#$%^&*()+=!?,<>]",
        suffix in "[a-z]{0,6}",
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        prop_assert!(validate_stack_name(&name).is_err(), "accepted: {}", name);
    }

    /// More than three segments is never valid.
    #[test]
    fn prop_four_segments_rejected(
        segments in prop::collection::vec("[a-z]{1,6}", 4..=6)
    ) {
        prop_assert!(validate_stack_name(&segments.join("/")).is_err());
    }

    /// The printable form of a secret `config set` never contains the value.
    #[test]
    fn prop_secret_value_never_displayed(value in "sec-[a-z0-9]{12,24}") {
        let args = config_set("db:password", &value, true);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let line = display_command("pulumi", &refs);
        prop_assert!(!line.contains(&value), "leaked: {}", line);
        prop_assert!(line.contains(MASK));
    }

    /// Plaintext values are displayed as given.
    #[test]
    fn prop_plaintext_value_displayed(value in "[a-z0-9]{1,24}") {
        let args = config_set("region", &value, false);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let line = display_command("pulumi", &refs);
        prop_assert!(line.contains(&value));
    }
}
