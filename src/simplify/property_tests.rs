//! Property tests for the simplifier
//!
//! Simplification must keep the meaning of a condition on every document,
//! never add nodes, and reach a fixed point in one deep pass.

use proptest::prelude::*;

use crate::condition::property_tests::{
    comparable_strategy, compare_kind_strategy, condition_strategy, document_strategy,
    logical_kind_strategy, path_strategy, scalar_strategy,
};
use crate::condition::{check, Condition};
use crate::simplify::{combine, simplify, simplify_deep};

fn set_strategy() -> impl Strategy<Value = Condition> {
    (
        prop::collection::vec(prop::option::weighted(0.8, comparable_strategy()), 1..=4),
        path_strategy(),
    )
        .prop_map(|(values, path)| Condition::included_in(values).at(path))
}

// ═══════════════════════════════════════════════════════════════════════════
// Soundness
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Property 1: Simplifying one node keeps its meaning
    #[test]
    fn prop_simplify_is_sound(condition in condition_strategy(), doc in document_strategy()) {
        let simplified = simplify(&condition);
        prop_assert_eq!(
            check(&simplified, &doc),
            check(&condition, &doc),
            "{} became {}",
            condition,
            simplified
        );
    }

    /// Property 2: Simplifying a whole tree keeps its meaning
    #[test]
    fn prop_simplify_deep_is_sound(condition in condition_strategy(), doc in document_strategy()) {
        let simplified = simplify_deep(&condition);
        prop_assert_eq!(
            check(&simplified, &doc),
            check(&condition, &doc),
            "{} became {}",
            condition,
            simplified
        );
    }

    /// Property 3: Negations keep their meaning when pushed down
    #[test]
    fn prop_negation_is_sound(condition in condition_strategy(), doc in document_strategy()) {
        let negated = Condition::not(condition);
        let simplified = simplify(&negated);
        prop_assert_eq!(check(&simplified, &doc), check(&negated, &doc), "{}", simplified);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Pair merging
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Property 4: Every table entry is sound on numbers between and beyond
    /// the constants and on values of other types
    #[test]
    fn prop_compare_merge_is_sound(
        logical in logical_kind_strategy(),
        left_kind in compare_kind_strategy(),
        right_kind in compare_kind_strategy(),
        left_value in comparable_strategy(),
        right_value in comparable_strategy(),
        doc in scalar_strategy()
    ) {
        let left = Condition::compare(left_kind, left_value);
        let right = Condition::compare(right_kind, right_value);
        if let Some(merged) = combine(logical, &left, &right) {
            let expected = logical.apply(check(&left, &doc), check(&right, &doc));
            prop_assert_eq!(check(&merged, &doc), expected, "{} {} {} -> {}", left, logical, right, merged);
        }
    }

    /// Property 5: Set merges are sound, including against negated sets
    #[test]
    fn prop_set_merge_is_sound(
        logical in logical_kind_strategy(),
        left in set_strategy(),
        right in set_strategy(),
        negate in any::<bool>(),
        doc in document_strategy()
    ) {
        let right = if negate { Condition::not(right) } else { right };
        if let Some(merged) = combine(logical, &left, &right) {
            let expected = logical.apply(check(&left, &doc), check(&right, &doc));
            prop_assert_eq!(check(&merged, &doc), expected, "{} {} {} -> {}", left, logical, right, merged);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Shape
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Property 6: Simplification never adds nodes
    #[test]
    fn prop_simplify_never_grows(condition in condition_strategy()) {
        prop_assert!(simplify(&condition).node_count() <= condition.node_count());
        prop_assert!(simplify_deep(&condition).node_count() <= condition.node_count());
        let negated = Condition::not(condition);
        prop_assert!(simplify(&negated).node_count() <= negated.node_count());
    }

    /// Property 7: One deep pass reaches a fixed point
    #[test]
    fn prop_simplify_deep_is_idempotent(condition in condition_strategy()) {
        let once = simplify_deep(&condition);
        let twice = simplify_deep(&once);
        prop_assert_eq!(twice, once);
    }
}
