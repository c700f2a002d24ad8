//! Condition simplifier

use crate::condition::{Collection, Compare, Condition, Logical, LogicalKind, Not, Path};
use crate::simplify::merge::combine;

/// Rewrite a condition into an equivalent one with no more nodes.
///
/// Only the node itself is rewritten; children are taken as already
/// simplified, except under a negated `every`/`some`, where each pushed-down
/// negation is simplified in turn. Use [`simplify_deep`] to normalize a whole
/// tree.
pub fn simplify(condition: &Condition) -> Condition {
    match condition {
        Condition::Logical(logical) => {
            simplify_logical(logical.kind, &logical.path, logical.items.clone())
        }
        Condition::Not(not) => simplify_not(not, condition),
        Condition::Always
        | Condition::Never
        | Condition::Compare(_)
        | Condition::IncludedIn(_)
        | Condition::NoValue(_)
        | Condition::Collection(_) => condition.clone(),
    }
}

/// Simplify every node bottom-up, children before their parents
pub fn simplify_deep(condition: &Condition) -> Condition {
    let rebuilt = match condition {
        Condition::Logical(logical) => Condition::Logical(Logical {
            kind: logical.kind,
            path: logical.path.clone(),
            items: logical.items.iter().map(simplify_deep).collect(),
        }),
        Condition::Collection(collection) => Condition::Collection(Collection {
            kind: collection.kind,
            path: collection.path.clone(),
            item: Box::new(simplify_deep(&collection.item)),
        }),
        Condition::Not(not) => Condition::Not(Not {
            path: not.path.clone(),
            item: Box::new(simplify_deep(&not.item)),
        }),
        Condition::Always
        | Condition::Never
        | Condition::Compare(_)
        | Condition::IncludedIn(_)
        | Condition::NoValue(_) => return condition.clone(),
    };
    simplify(&rebuilt)
}

fn is_identity(kind: LogicalKind, item: &Condition) -> bool {
    matches!(
        (kind, item),
        (LogicalKind::Every, Condition::Always) | (LogicalKind::Some, Condition::Never)
    )
}

fn is_absorbing(kind: LogicalKind, item: &Condition) -> bool {
    matches!(
        (kind, item),
        (LogicalKind::Every, Condition::Never) | (LogicalKind::Some, Condition::Always)
    )
}

fn simplify_logical(kind: LogicalKind, path: &Path, mut items: Vec<Condition>) -> Condition {
    loop {
        items.retain(|item| !is_identity(kind, item));
        if items.iter().any(|item| is_absorbing(kind, item)) {
            return kind.absorbing();
        }
        if items.is_empty() {
            return kind.identity();
        }

        // every merge removes an item, so this runs at most items.len() times
        match find_merge(kind, &items) {
            Some((first, second, merged)) => {
                tracing::trace!(logical = %kind, %merged, "merged sibling conditions");
                items.remove(second);
                items[first] = merged;
            }
            None => break,
        }
    }

    match <[Condition; 1]>::try_from(items) {
        Ok([item]) => item.with_prefix(path),
        Err(items) => Condition::Logical(Logical {
            kind,
            path: path.clone(),
            items,
        }),
    }
}

/// First mergeable pair in scan order, as `(i, j, merged)` with `i < j`
fn find_merge(kind: LogicalKind, items: &[Condition]) -> Option<(usize, usize, Condition)> {
    for (i, left) in items.iter().enumerate() {
        for (j, right) in items.iter().enumerate().skip(i + 1) {
            if let Some(merged) = combine(kind, left, right) {
                return Some((i, j, merged));
            }
        }
    }
    None
}

fn simplify_not(not: &Not, original: &Condition) -> Condition {
    match not.item.as_ref() {
        Condition::Always => Condition::Never,
        Condition::Never => Condition::Always,
        Condition::Compare(compare) => Condition::Compare(Compare {
            kind: compare.kind.complement(),
            path: not.path.concat(&compare.path),
            value: compare.value.clone(),
        }),
        Condition::Logical(logical) => push_negation(not, logical, original),
        Condition::Not(inner) => inner
            .item
            .as_ref()
            .clone()
            .with_prefix(&not.path.concat(&inner.path)),
        // TODO: not(allOf(x)) is anyOf(not(x)) and not(anyOf(x)) is allOf(not(x))
        Condition::Collection(_) | Condition::IncludedIn(_) | Condition::NoValue(_) => {
            original.clone()
        }
    }
}

/// De Morgan: `not(every(a, b))` becomes `some(not(a), not(b))` and vice versa
fn push_negation(not: &Not, logical: &Logical, original: &Condition) -> Condition {
    let items = logical
        .items
        .iter()
        .map(|item| simplify(&Condition::not(item.clone())))
        .collect();
    let expanded = simplify_logical(logical.kind.dual(), &not.path.concat(&logical.path), items);

    if expanded.node_count() > original.node_count() {
        tracing::debug!(
            condition = %original,
            "negation left in place, pushing it down would grow the tree"
        );
        return original.clone();
    }
    expanded
}
