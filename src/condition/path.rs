//! Field paths and nested value resolution

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// A single field-access step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    /// Array index
    Index(usize),
    /// Object key
    Key(String),
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Index(index) => write!(f, "[{}]", index),
            PathStep::Key(key) => write!(f, "{}", key),
        }
    }
}

/// Ordered sequence of steps locating a value inside a document.
///
/// The empty path addresses the whole document. Most paths are short, so
/// steps live inline until they outgrow the small buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Path(SmallVec<[PathStep; 4]>);

impl Path {
    /// The empty path
    #[inline]
    pub fn root() -> Self {
        Path(SmallVec::new())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathStep> {
        self.0.iter()
    }

    /// Return a new path with `other` appended after `self`
    pub fn concat(&self, other: &Path) -> Path {
        let mut steps = self.0.clone();
        steps.extend(other.0.iter().cloned());
        Path(steps)
    }

    /// Concatenate any number of paths in order
    pub fn join<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Path {
        Path(
            paths
                .into_iter()
                .flat_map(|path| path.0.iter().cloned())
                .collect(),
        )
    }
}

impl From<PathStep> for Path {
    fn from(step: PathStep) -> Self {
        Path(smallvec![step])
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Path::from(PathStep::from(key))
    }
}

impl From<String> for Path {
    fn from(key: String) -> Self {
        Path::from(PathStep::from(key))
    }
}

impl From<usize> for Path {
    fn from(index: usize) -> Self {
        Path::from(PathStep::from(index))
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl<T: Into<PathStep>> From<Vec<T>> for Path {
    fn from(steps: Vec<T>) -> Self {
        steps.into_iter().collect()
    }
}

impl<T: Into<PathStep>, const N: usize> From<[T; N]> for Path {
    fn from(steps: [T; N]) -> Self {
        steps.into_iter().collect()
    }
}

impl<T: Into<PathStep>> FromIterator<T> for Path {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Accept a bare step wherever a path is expected.
impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPath {
            Steps(Vec<PathStep>),
            Step(PathStep),
        }

        Ok(match RawPath::deserialize(deserializer)? {
            RawPath::Steps(steps) => Path::from(steps),
            RawPath::Step(step) => Path::from(step),
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "$");
        }
        for (position, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Key(_) if position > 0 => write!(f, ".{}", step)?,
                _ => write!(f, "{}", step)?,
            }
        }
        Ok(())
    }
}

/// Resolve `path` inside `value`.
///
/// Returns `None` when any step is missing or when the value found is JSON
/// `null`; both are the same absent marker to callers. Resolution composes:
/// resolving `p` then `q` equals resolving `p ++ q`.
pub fn resolve<'a>(value: &'a Value, path: &Path) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, step| step_into(current, step))
        .filter(|resolved| !resolved.is_null())
}

fn step_into<'a>(value: &'a Value, step: &PathStep) -> Option<&'a Value> {
    match (value, step) {
        (Value::Object(map), PathStep::Key(key)) => map.get(key),
        (Value::Object(map), PathStep::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), PathStep::Index(index)) => items.get(*index),
        (Value::Array(items), PathStep::Key(key)) => {
            key.parse::<usize>().ok().and_then(|index| items.get(index))
        }
        _ => None,
    }
}
