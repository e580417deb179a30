//! Property-based tests for HMW question normalization

use ideate::hmw::{normalize_question, parse_hmw_output};
use ideate::text::is_hmw_question;
use proptest::prelude::*;
use std::collections::HashSet;

/// Candidate lines the way models tend to write them
fn candidate() -> impl Strategy<Value = String> {
    let prefix = prop_oneof![
        Just(""),
        Just("How might we "),
        Just("how might we "),
        Just("What if we "),
        Just("We could "),
        Just("HMW: "),
        Just("- "),
        Just("... "),
    ];
    (prefix, "[a-zA-Z ,'-]{0,40}", prop_oneof![Just(""), Just("?"), Just("?!"), Just(".")])
        .prop_map(|(prefix, body, suffix)| format!("{}{}{}", prefix, body, suffix))
}

/// Normalizing a normalized question changes nothing
#[test]
fn test_normalization_is_idempotent() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop_oneof![candidate(), any::<String>()], |raw| {
            if let Some(question) = normalize_question(&raw) {
                prop_assert!(is_hmw_question(&question), "not canonical: {:?}", question);
                prop_assert_eq!(normalize_question(&question), Some(question.clone()));
            }
            Ok(())
        })
        .unwrap();
}

/// Parsed output is always canonical and free of case-insensitive duplicates
#[test]
fn test_parsed_output_is_canonical_and_unique() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(candidate(), 0..12), |lines| {
            let raw = lines
                .iter()
                .enumerate()
                .map(|(i, line)| format!("{}. {}", i + 1, line))
                .collect::<Vec<_>>()
                .join("\n");
            let questions = parse_hmw_output(&raw);

            let mut seen = HashSet::new();
            for question in &questions {
                prop_assert!(is_hmw_question(question), "not canonical: {:?}", question);
                prop_assert!(seen.insert(question.to_lowercase()), "duplicate: {:?}", question);
            }
            prop_assert!(questions.len() <= lines.len());
            Ok(())
        })
        .unwrap();
}
