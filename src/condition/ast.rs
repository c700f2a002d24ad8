//! Condition tree model

use crate::condition::path::Path;
use crate::error::{FilterError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

static ROOT_PATH: Lazy<Path> = Lazy::new(Path::root);

/// Constant a comparison is made against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Comparable {
    Bool(bool),
    Number(f64),
    String(String),
}

/// Position of a value's type in the comparison order.
///
/// Values of different types never compare equal; they order by type:
/// absent < booleans < numbers < strings < arrays < objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum TypeRank {
    Absent,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// Total order on numbers with NaN above every other number
#[inline]
pub(crate) fn number_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

impl Comparable {
    pub(crate) fn rank(&self) -> TypeRank {
        match self {
            Comparable::Bool(_) => TypeRank::Bool,
            Comparable::Number(_) => TypeRank::Number,
            Comparable::String(_) => TypeRank::String,
        }
    }

    /// Order two constants the same way the evaluator orders values
    pub fn total_cmp(&self, other: &Comparable) -> Ordering {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => number_cmp(*a, *b),
            (Comparable::String(a), Comparable::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Equality under [`Comparable::total_cmp`]
    #[inline]
    pub fn same(&self, other: &Comparable) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl From<bool> for Comparable {
    fn from(value: bool) -> Self {
        Comparable::Bool(value)
    }
}

impl From<f64> for Comparable {
    fn from(value: f64) -> Self {
        Comparable::Number(value)
    }
}

impl From<i32> for Comparable {
    fn from(value: i32) -> Self {
        Comparable::Number(f64::from(value))
    }
}

impl From<u32> for Comparable {
    fn from(value: u32) -> Self {
        Comparable::Number(f64::from(value))
    }
}

impl From<i64> for Comparable {
    fn from(value: i64) -> Self {
        Comparable::Number(value as f64)
    }
}

impl From<&str> for Comparable {
    fn from(value: &str) -> Self {
        Comparable::String(value.to_string())
    }
}

impl From<String> for Comparable {
    fn from(value: String) -> Self {
        Comparable::String(value)
    }
}

impl fmt::Display for Comparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparable::Bool(value) => write!(f, "{}", value),
            Comparable::Number(value) => write!(f, "{}", value),
            Comparable::String(value) => write!(f, "{:?}", value),
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareKind {
    /// Equal (==)
    Equal,
    /// Not equal (!=)
    Neq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
}

impl CompareKind {
    pub const ALL: [CompareKind; 6] = [
        CompareKind::Equal,
        CompareKind::Neq,
        CompareKind::Lt,
        CompareKind::Lte,
        CompareKind::Gt,
        CompareKind::Gte,
    ];

    /// The operator that holds exactly when `self` does not
    pub fn complement(self) -> Self {
        match self {
            CompareKind::Equal => CompareKind::Neq,
            CompareKind::Neq => CompareKind::Equal,
            CompareKind::Lt => CompareKind::Gte,
            CompareKind::Lte => CompareKind::Gt,
            CompareKind::Gt => CompareKind::Lte,
            CompareKind::Gte => CompareKind::Lt,
        }
    }

    /// Decide the comparison given how the tested value orders against the constant
    #[inline]
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareKind::Equal => ordering == Ordering::Equal,
            CompareKind::Neq => ordering != Ordering::Equal,
            CompareKind::Lt => ordering == Ordering::Less,
            CompareKind::Lte => ordering != Ordering::Greater,
            CompareKind::Gt => ordering == Ordering::Greater,
            CompareKind::Gte => ordering != Ordering::Less,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CompareKind::Equal => 0,
            CompareKind::Neq => 1,
            CompareKind::Lt => 2,
            CompareKind::Lte => 3,
            CompareKind::Gt => 4,
            CompareKind::Gte => 5,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareKind::Equal => "==",
            CompareKind::Neq => "!=",
            CompareKind::Lt => "<",
            CompareKind::Lte => "<=",
            CompareKind::Gt => ">",
            CompareKind::Gte => ">=",
        }
    }
}

/// Logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalKind {
    /// Conjunction
    Every,
    /// Disjunction
    Some,
}

impl LogicalKind {
    pub const ALL: [LogicalKind; 2] = [LogicalKind::Every, LogicalKind::Some];

    /// The connective De Morgan's laws swap this one for
    pub fn dual(self) -> Self {
        match self {
            LogicalKind::Every => LogicalKind::Some,
            LogicalKind::Some => LogicalKind::Every,
        }
    }

    #[inline]
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            LogicalKind::Every => left && right,
            LogicalKind::Some => left || right,
        }
    }

    /// Constant that leaves the connective unchanged; also the value of an empty node
    pub fn identity(self) -> Condition {
        match self {
            LogicalKind::Every => Condition::Always,
            LogicalKind::Some => Condition::Never,
        }
    }

    /// Constant that decides the connective on its own
    pub fn absorbing(self) -> Condition {
        match self {
            LogicalKind::Every => Condition::Never,
            LogicalKind::Some => Condition::Always,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            LogicalKind::Every => 0,
            LogicalKind::Some => 1,
        }
    }

    fn name(self) -> &'static str {
        match self {
            LogicalKind::Every => "every",
            LogicalKind::Some => "some",
        }
    }
}

/// Quantifiers over array elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    AllOf,
    AnyOf,
}

impl CollectionKind {
    fn name(self) -> &'static str {
        match self {
            CollectionKind::AllOf => "allOf",
            CollectionKind::AnyOf => "anyOf",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub kind: CompareKind,
    pub path: Path,
    pub value: Comparable,
}

/// Set membership; `None` members match an absent value
#[derive(Debug, Clone, PartialEq)]
pub struct IncludedIn {
    pub path: Path,
    pub values: Vec<Option<Comparable>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Logical {
    pub kind: LogicalKind,
    pub path: Path,
    pub items: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub kind: CollectionKind,
    pub path: Path,
    pub item: Box<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Not {
    pub path: Path,
    pub item: Box<Condition>,
}

/// A filter condition.
///
/// Every variant except the two constants applies its logic to the value
/// found at its path. Conditions are plain values: rewriting one always
/// builds a new tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "crate::condition::wire::RawCondition")]
#[serde(into = "crate::condition::wire::RawCondition")]
pub enum Condition {
    Always,
    Never,
    Compare(Compare),
    IncludedIn(IncludedIn),
    NoValue(Path),
    Logical(Logical),
    Collection(Collection),
    Not(Not),
}

impl Condition {
    pub fn always() -> Self {
        Condition::Always
    }

    pub fn never() -> Self {
        Condition::Never
    }

    pub fn compare(kind: CompareKind, value: impl Into<Comparable>) -> Self {
        Condition::Compare(Compare {
            kind,
            path: Path::root(),
            value: value.into(),
        })
    }

    pub fn equal(value: impl Into<Comparable>) -> Self {
        Self::compare(CompareKind::Equal, value)
    }

    pub fn neq(value: impl Into<Comparable>) -> Self {
        Self::compare(CompareKind::Neq, value)
    }

    pub fn lt(value: impl Into<Comparable>) -> Self {
        Self::compare(CompareKind::Lt, value)
    }

    pub fn lte(value: impl Into<Comparable>) -> Self {
        Self::compare(CompareKind::Lte, value)
    }

    pub fn gt(value: impl Into<Comparable>) -> Self {
        Self::compare(CompareKind::Gt, value)
    }

    pub fn gte(value: impl Into<Comparable>) -> Self {
        Self::compare(CompareKind::Gte, value)
    }

    pub fn included_in<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<V>>,
        V: Into<Comparable>,
    {
        Condition::IncludedIn(IncludedIn {
            path: Path::root(),
            values: values.into_iter().map(|value| value.map(Into::into)).collect(),
        })
    }

    pub fn no_value() -> Self {
        Condition::NoValue(Path::root())
    }

    pub fn logical(kind: LogicalKind, items: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Logical(Logical {
            kind,
            path: Path::root(),
            items: items.into_iter().collect(),
        })
    }

    pub fn every(items: impl IntoIterator<Item = Condition>) -> Self {
        Self::logical(LogicalKind::Every, items)
    }

    pub fn some(items: impl IntoIterator<Item = Condition>) -> Self {
        Self::logical(LogicalKind::Some, items)
    }

    pub fn collection(kind: CollectionKind, item: Condition) -> Self {
        Condition::Collection(Collection {
            kind,
            path: Path::root(),
            item: Box::new(item),
        })
    }

    pub fn all_of(item: Condition) -> Self {
        Self::collection(CollectionKind::AllOf, item)
    }

    pub fn any_of(item: Condition) -> Self {
        Self::collection(CollectionKind::AnyOf, item)
    }

    pub fn not(item: Condition) -> Self {
        Condition::Not(Not {
            path: Path::root(),
            item: Box::new(item),
        })
    }

    /// Place this condition at `path`, replacing its current path.
    ///
    /// A bare step becomes a one-element path. The constants ignore paths.
    pub fn at(mut self, path: impl Into<Path>) -> Self {
        if let Some(slot) = self.path_mut() {
            *slot = path.into();
        }
        self
    }

    /// Prepend `prefix` to this condition's own path
    pub fn with_prefix(mut self, prefix: &Path) -> Self {
        if prefix.is_empty() {
            return self;
        }
        if let Some(slot) = self.path_mut() {
            *slot = prefix.concat(slot);
        }
        self
    }

    pub fn path(&self) -> &Path {
        match self {
            Condition::Always | Condition::Never => &ROOT_PATH,
            Condition::Compare(compare) => &compare.path,
            Condition::IncludedIn(set) => &set.path,
            Condition::NoValue(path) => path,
            Condition::Logical(logical) => &logical.path,
            Condition::Collection(collection) => &collection.path,
            Condition::Not(not) => &not.path,
        }
    }

    fn path_mut(&mut self) -> Option<&mut Path> {
        match self {
            Condition::Always | Condition::Never => None,
            Condition::Compare(compare) => Some(&mut compare.path),
            Condition::IncludedIn(set) => Some(&mut set.path),
            Condition::NoValue(path) => Some(path),
            Condition::Logical(logical) => Some(&mut logical.path),
            Condition::Collection(collection) => Some(&mut collection.path),
            Condition::Not(not) => Some(&mut not.path),
        }
    }

    /// Number of nodes in the tree; the complexity measure simplification never increases
    pub fn node_count(&self) -> usize {
        match self {
            Condition::Always
            | Condition::Never
            | Condition::Compare(_)
            | Condition::IncludedIn(_)
            | Condition::NoValue(_) => 1,
            Condition::Logical(logical) => {
                1 + logical.items.iter().map(Condition::node_count).sum::<usize>()
            }
            Condition::Collection(collection) => 1 + collection.item.node_count(),
            Condition::Not(not) => 1 + not.item.node_count(),
        }
    }

    /// Reject trees no caller should build: NaN constants and logical
    /// nodes without items.
    pub fn validate(&self) -> Result<()> {
        self.validate_node()?;
        match self {
            Condition::Logical(logical) => logical.items.iter().try_for_each(Condition::validate),
            Condition::Collection(collection) => collection.item.validate(),
            Condition::Not(not) => not.item.validate(),
            Condition::Always
            | Condition::Never
            | Condition::Compare(_)
            | Condition::IncludedIn(_)
            | Condition::NoValue(_) => Ok(()),
        }
    }

    /// The checks of [`Condition::validate`] for this node's own fields only
    pub(crate) fn validate_node(&self) -> Result<()> {
        match self {
            Condition::Compare(compare) => check_comparable(&compare.value),
            Condition::IncludedIn(set) => set.values.iter().flatten().try_for_each(check_comparable),
            Condition::Logical(logical) if logical.items.is_empty() => {
                Err(FilterError::InvalidCondition(format!(
                    "{} at {} has no items",
                    logical.kind.name(),
                    logical.path
                )))
            }
            _ => Ok(()),
        }
    }

    /// Parse and validate the JSON form
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn check_comparable(value: &Comparable) -> Result<()> {
    match value {
        Comparable::Number(number) if number.is_nan() => Err(FilterError::NonComparable(
            "NaN cannot be compared".to_string(),
        )),
        _ => Ok(()),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => write!(f, "always"),
            Condition::Never => write!(f, "never"),
            Condition::Compare(compare) => write!(
                f,
                "{} {} {}",
                compare.path,
                compare.kind.symbol(),
                compare.value
            ),
            Condition::IncludedIn(set) => {
                write!(f, "{} in [", set.path)?;
                for (position, value) in set.values.iter().enumerate() {
                    if position > 0 {
                        write!(f, ", ")?;
                    }
                    match value {
                        Some(value) => write!(f, "{}", value)?,
                        None => write!(f, "null")?,
                    }
                }
                write!(f, "]")
            }
            Condition::NoValue(path) => write!(f, "{} is absent", path),
            Condition::Logical(logical) => {
                write_prefix(f, &logical.path)?;
                write!(f, "{}(", logical.kind.name())?;
                for (position, item) in logical.items.iter().enumerate() {
                    if position > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Condition::Collection(collection) => {
                write_prefix(f, &collection.path)?;
                write!(f, "{}({})", collection.kind.name(), collection.item)
            }
            Condition::Not(not) => {
                write_prefix(f, &not.path)?;
                write!(f, "not({})", not.item)
            }
        }
    }
}

fn write_prefix(f: &mut fmt::Formatter<'_>, path: &Path) -> fmt::Result {
    if path.is_empty() {
        Ok(())
    } else {
        write!(f, "{}: ", path)
    }
}

impl fmt::Display for LogicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for CompareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
