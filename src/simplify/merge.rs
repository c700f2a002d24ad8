//! Merging two sibling conditions under a connective

use crate::condition::{Compare, Comparable, Condition, IncludedIn, LogicalKind, Not};
use crate::simplify::rules::{self, Outcome};
use ahash::AHashSet;

/// Try to replace `left` and `right`, joined by `kind`, with one equivalent condition.
///
/// Only siblings at the same path combine: two comparisons (through the
/// combination table), two set memberships, or a set membership with a
/// negated one. Returns `None` when the pair has to stay as it is.
pub fn combine(kind: LogicalKind, left: &Condition, right: &Condition) -> Option<Condition> {
    match (left, right) {
        (Condition::Compare(left), Condition::Compare(right)) if left.path == right.path => {
            combine_compares(kind, left, right)
        }
        (Condition::IncludedIn(left), Condition::IncludedIn(right)) if left.path == right.path => {
            Some(combine_sets(kind, left, right))
        }
        (Condition::IncludedIn(included), Condition::Not(excluded))
        | (Condition::Not(excluded), Condition::IncludedIn(included)) => {
            combine_with_excluded(kind, included, excluded)
        }
        _ => None,
    }
}

fn combine_compares(kind: LogicalKind, left: &Compare, right: &Compare) -> Option<Condition> {
    let order = left.value.total_cmp(&right.value);
    let outcome = rules::outcome(kind, left.kind, right.kind, order);

    tracing::trace!(
        logical = %kind,
        left = %left.kind,
        right = %right.kind,
        ?order,
        ?outcome,
        "comparison pair lookup"
    );

    match outcome {
        Outcome::Always => Some(Condition::Always),
        Outcome::Never => Some(Condition::Never),
        Outcome::Left | Outcome::Either => Some(Condition::Compare(left.clone())),
        Outcome::Right => Some(Condition::Compare(right.clone())),
        Outcome::Both => None,
    }
}

fn combine_sets(kind: LogicalKind, left: &IncludedIn, right: &IncludedIn) -> Condition {
    let values = match kind {
        LogicalKind::Every => {
            let keep = MemberSet::from_values(&right.values);
            distinct(left.values.iter().filter(|value| keep.contains(value)))
        }
        LogicalKind::Some => distinct(left.values.iter().chain(right.values.iter())),
    };

    if values.is_empty() {
        return Condition::Never;
    }
    Condition::IncludedIn(IncludedIn {
        path: left.path.clone(),
        values,
    })
}

/// `included` combined with `excluded = not(includedIn(...))`; the negated
/// set lines up when the `not` path followed by its inner path equals the
/// included set's path.
fn combine_with_excluded(
    kind: LogicalKind,
    included: &IncludedIn,
    excluded: &Not,
) -> Option<Condition> {
    let negated = match excluded.item.as_ref() {
        Condition::IncludedIn(negated) => negated,
        _ => return None,
    };
    if excluded.path.concat(&negated.path) != included.path {
        return None;
    }

    let removed = MemberSet::from_values(&negated.values);
    match kind {
        LogicalKind::Every => {
            let values = distinct(included.values.iter().filter(|value| !removed.contains(value)));
            if values.is_empty() {
                return Some(Condition::Never);
            }
            Some(Condition::IncludedIn(IncludedIn {
                path: included.path.clone(),
                values,
            }))
        }
        LogicalKind::Some => {
            let kept = MemberSet::from_values(&included.values);
            // a ∪ ¬b covers everything only when b ⊆ a
            negated
                .values
                .iter()
                .all(|value| kept.contains(value))
                .then_some(Condition::Always)
        }
    }
}

/// Hashable identity of a set member, equal exactly when the evaluator
/// treats two members as the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MemberKey<'a> {
    Absent,
    Bool(bool),
    Number(u64),
    String(&'a str),
}

impl<'a> MemberKey<'a> {
    fn of(value: &'a Option<Comparable>) -> Self {
        match value {
            None => MemberKey::Absent,
            Some(Comparable::Bool(value)) => MemberKey::Bool(*value),
            Some(Comparable::Number(value)) => MemberKey::Number(number_bits(*value)),
            Some(Comparable::String(value)) => MemberKey::String(value),
        }
    }
}

fn number_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

struct MemberSet<'a> {
    keys: AHashSet<MemberKey<'a>>,
}

impl<'a> MemberSet<'a> {
    fn from_values(values: &'a [Option<Comparable>]) -> Self {
        MemberSet {
            keys: values.iter().map(MemberKey::of).collect(),
        }
    }

    fn contains(&self, value: &Option<Comparable>) -> bool {
        self.keys.contains(&MemberKey::of(value))
    }
}

/// Collect members in first-seen order without duplicates
fn distinct<'a>(values: impl Iterator<Item = &'a Option<Comparable>>) -> Vec<Option<Comparable>> {
    let mut seen = AHashSet::new();
    values
        .filter(|value| seen.insert(MemberKey::of(*value)))
        .cloned()
        .collect()
}
