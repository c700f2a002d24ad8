//! Algebraic simplification of condition trees
//!
//! [`simplify`] rewrites one node, [`simplify_deep`] a whole tree. Both keep
//! the meaning of the condition for every input and never grow the tree.

mod merge;
pub mod rules;
mod simplifier;

#[cfg(test)]
mod property_tests;

pub use merge::combine;
pub use rules::Outcome;
pub use simplifier::{simplify, simplify_deep};
