//! Type checking and semantic analysis module.
//!
//! This module performs type checking and semantic analysis on the AST.
//! It leaves the tree untouched and records its findings in a side-table
//! keyed by expression id, while:
//!
//! - Assigning a static type to every expression
//! - Resolving variable references (function scope first, then globals)
//! - Resolving calls and checking argument counts and types
//! - Validating operators, assignments, casts, conditions and returns
//!
//! The first violation found in source order aborts the pass.

pub mod annotations;
pub mod type_checker;

#[cfg(test)]
mod tests;
