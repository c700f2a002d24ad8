//! Condition model, path resolution and evaluation
//!
//! Conditions are built with the constructors on [`Condition`], evaluated
//! against JSON documents with [`check`] or [`predicate`], and exchanged in
//! their flat JSON form through serde.

mod ast;
mod evaluator;
pub mod path;
mod wire;


pub use ast::*;
pub use evaluator::*;
pub use path::{resolve, Path, PathStep};
