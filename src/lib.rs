//! Filter Conditions - composable predicates over JSON data
//!
//! Conditions are small trees of comparisons, set memberships and logical
//! connectives, each applied at a path inside the tested value. This crate
//! evaluates them against `serde_json` documents and rewrites them into
//! simpler equivalent trees.
//!
//! Python bindings via PyO3 are available behind the `python` feature.

pub mod condition;
pub mod error;
pub mod simplify;

#[cfg(feature = "python")]
mod python;

pub use crate::condition::{check, predicate, Condition, Path, PathStep};
pub use crate::error::{FilterError, Result};
pub use crate::simplify::{simplify, simplify_deep};
