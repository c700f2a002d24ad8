//! Comparison combination table
//!
//! For two comparisons on the same value joined by a connective, the table
//! says which single condition (if any) the pair reduces to. It is keyed by
//! the connective, both operators, and how the left constant orders against
//! the right one.
//!
//! The table is derived from the order itself instead of being authored. For
//! a fixed ordering of the two constants, the number line splits into at most
//! five regions: below both, at the lower constant, strictly between, at the
//! upper constant, above both. Every operator is constant on each region, so
//! evaluating one representative per region gives the exact truth column of
//! each operator and of their combination. Only the half with
//! `left.index() <= right.index()` is derived; the rest is its mirror.

use crate::condition::{CompareKind, LogicalKind};
use once_cell::sync::Lazy;
use std::cmp::Ordering;

/// How a pair of comparisons combines under a connective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The pair always holds
    Always,
    /// The pair never holds
    Never,
    /// The pair is equivalent to the left comparison
    Left,
    /// The pair is equivalent to the right comparison
    Right,
    /// Both comparisons are equivalent; the left one is kept
    Either,
    /// No single comparison is equivalent; keep both
    Both,
}

impl Outcome {
    /// The outcome for the same pair with its sides swapped
    pub fn mirror(self) -> Self {
        match self {
            Outcome::Left => Outcome::Right,
            Outcome::Right => Outcome::Left,
            other => other,
        }
    }
}

type Outcomes = [[[[Outcome; 3]; 6]; 6]; 2];

struct CombinationTable {
    outcomes: Outcomes,
}

static COMBINATION_TABLE: Lazy<CombinationTable> = Lazy::new(CombinationTable::build);

/// Look up how `left` and `right` combine under `logical`, where `order` is
/// the left constant compared to the right constant.
#[inline]
pub fn outcome(
    logical: LogicalKind,
    left: CompareKind,
    right: CompareKind,
    order: Ordering,
) -> Outcome {
    COMBINATION_TABLE.outcomes[logical.index()][left.index()][right.index()][order_index(order)]
}

fn order_index(order: Ordering) -> usize {
    match order {
        Ordering::Less => 0,
        Ordering::Equal => 1,
        Ordering::Greater => 2,
    }
}

const ORDERS: [Ordering; 3] = [Ordering::Less, Ordering::Equal, Ordering::Greater];

/// One representative point per region; the anchors below place the two
/// constants so that these points cover every region.
const REGIONS: [i8; 5] = [0, 1, 2, 3, 4];

/// Positions of the left and right constants for a given ordering
fn anchors(order: Ordering) -> (i8, i8) {
    match order {
        Ordering::Less => (1, 3),
        Ordering::Equal => (2, 2),
        Ordering::Greater => (3, 1),
    }
}

impl CombinationTable {
    fn build() -> Self {
        let mut outcomes: Outcomes = [[[[Outcome::Both; 3]; 6]; 6]; 2];

        for logical in LogicalKind::ALL {
            let table = &mut outcomes[logical.index()];
            for (i, &left) in CompareKind::ALL.iter().enumerate() {
                for &right in &CompareKind::ALL[i..] {
                    for order in ORDERS {
                        // the diagonal's Greater column is the mirror of its Less column
                        if left == right && order == Ordering::Greater {
                            continue;
                        }
                        let derived = derive(logical, left, right, order);
                        table[left.index()][right.index()][order_index(order)] = derived;
                        table[right.index()][left.index()][order_index(order.reverse())] =
                            derived.mirror();
                    }
                }
            }
        }

        tracing::debug!("built comparison combination table");
        CombinationTable { outcomes }
    }
}

fn derive(logical: LogicalKind, left: CompareKind, right: CompareKind, order: Ordering) -> Outcome {
    let (left_at, right_at) = anchors(order);

    let mut all_true = true;
    let mut all_false = true;
    let mut matches_left = true;
    let mut matches_right = true;

    for point in REGIONS {
        let left_holds = left.holds(point.cmp(&left_at));
        let right_holds = right.holds(point.cmp(&right_at));
        let combined = logical.apply(left_holds, right_holds);

        all_true &= combined;
        all_false &= !combined;
        matches_left &= combined == left_holds;
        matches_right &= combined == right_holds;
    }

    match (all_true, all_false, matches_left, matches_right) {
        (true, _, _, _) => Outcome::Always,
        (_, true, _, _) => Outcome::Never,
        (_, _, true, true) => Outcome::Either,
        (_, _, true, false) => Outcome::Left,
        (_, _, false, true) => Outcome::Right,
        _ => Outcome::Both,
    }
}
