//! Flat JSON form of conditions: `{"kind": ..., "path": [...], ...}`

use crate::condition::ast::{
    Collection, CollectionKind, Compare, CompareKind, Comparable, Condition, IncludedIn, Logical,
    LogicalKind, Not,
};
use crate::condition::path::Path;
use crate::error::FilterError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum RawKind {
    Always,
    Never,
    Equal,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    IncludedIn,
    NoValue,
    Every,
    Some,
    AllOf,
    AnyOf,
    Not,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawCondition {
    kind: RawKind,
    #[serde(default)]
    path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Comparable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<Option<Comparable>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item: Option<Box<Condition>>,
}

impl RawCondition {
    fn bare(kind: RawKind, path: Path) -> Self {
        RawCondition {
            kind,
            path,
            value: None,
            values: None,
            items: None,
            item: None,
        }
    }

    fn missing(&self, field: &str) -> FilterError {
        FilterError::InvalidCondition(format!("{:?} condition requires `{}`", self.kind, field))
    }
}

fn compare(kind: CompareKind, mut raw: RawCondition) -> Result<Condition, FilterError> {
    Ok(Condition::Compare(Compare {
        kind,
        value: raw.value.take().ok_or_else(|| raw.missing("value"))?,
        path: raw.path,
    }))
}

fn raw_compare_kind(kind: CompareKind) -> RawKind {
    match kind {
        CompareKind::Equal => RawKind::Equal,
        CompareKind::Neq => RawKind::Neq,
        CompareKind::Lt => RawKind::Lt,
        CompareKind::Lte => RawKind::Lte,
        CompareKind::Gt => RawKind::Gt,
        CompareKind::Gte => RawKind::Gte,
    }
}

impl TryFrom<RawCondition> for Condition {
    type Error = FilterError;

    fn try_from(mut raw: RawCondition) -> Result<Self, Self::Error> {
        let kind = raw.kind;
        let condition = match kind {
            RawKind::Always => Condition::Always,
            RawKind::Never => Condition::Never,
            RawKind::IncludedIn => Condition::IncludedIn(IncludedIn {
                values: raw.values.take().ok_or_else(|| raw.missing("values"))?,
                path: raw.path,
            }),
            RawKind::NoValue => Condition::NoValue(raw.path),
            RawKind::Every | RawKind::Some => Condition::Logical(Logical {
                kind: if kind == RawKind::Every {
                    LogicalKind::Every
                } else {
                    LogicalKind::Some
                },
                items: raw.items.take().ok_or_else(|| raw.missing("items"))?,
                path: raw.path,
            }),
            RawKind::AllOf | RawKind::AnyOf => Condition::Collection(Collection {
                kind: if kind == RawKind::AllOf {
                    CollectionKind::AllOf
                } else {
                    CollectionKind::AnyOf
                },
                item: raw.item.take().ok_or_else(|| raw.missing("item"))?,
                path: raw.path,
            }),
            RawKind::Not => Condition::Not(Not {
                item: raw.item.take().ok_or_else(|| raw.missing("item"))?,
                path: raw.path,
            }),
            RawKind::Equal => compare(CompareKind::Equal, raw)?,
            RawKind::Neq => compare(CompareKind::Neq, raw)?,
            RawKind::Lt => compare(CompareKind::Lt, raw)?,
            RawKind::Lte => compare(CompareKind::Lte, raw)?,
            RawKind::Gt => compare(CompareKind::Gt, raw)?,
            RawKind::Gte => compare(CompareKind::Gte, raw)?,
        };

        // children were checked when they were decoded
        condition.validate_node()?;
        Ok(condition)
    }
}

impl From<Condition> for RawCondition {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Always => RawCondition::bare(RawKind::Always, Path::root()),
            Condition::Never => RawCondition::bare(RawKind::Never, Path::root()),
            Condition::Compare(compare) => RawCondition {
                value: Some(compare.value),
                ..RawCondition::bare(raw_compare_kind(compare.kind), compare.path)
            },
            Condition::IncludedIn(set) => RawCondition {
                values: Some(set.values),
                ..RawCondition::bare(RawKind::IncludedIn, set.path)
            },
            Condition::NoValue(path) => RawCondition::bare(RawKind::NoValue, path),
            Condition::Logical(logical) => {
                let kind = match logical.kind {
                    LogicalKind::Every => RawKind::Every,
                    LogicalKind::Some => RawKind::Some,
                };
                RawCondition {
                    items: Some(logical.items),
                    ..RawCondition::bare(kind, logical.path)
                }
            }
            Condition::Collection(collection) => {
                let kind = match collection.kind {
                    CollectionKind::AllOf => RawKind::AllOf,
                    CollectionKind::AnyOf => RawKind::AnyOf,
                };
                RawCondition {
                    item: Some(collection.item),
                    ..RawCondition::bare(kind, collection.path)
                }
            }
            Condition::Not(not) => RawCondition {
                item: Some(not.item),
                ..RawCondition::bare(RawKind::Not, not.path)
            },
        }
    }
}
