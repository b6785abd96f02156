//! Code generation module for the compiler.
//!
//! This module turns a type-checked tree into the text of a stack-machine
//! IR. It handles:
//!
//! - Registration of the builtin functions
//! - Storage allocation for globals, locals and literal constants
//! - Compilation of expressions and statements
//! - The section layout of the emitted IR

pub mod compiler;
pub mod expr;
pub mod stdlib;
pub mod stmt;
pub mod storage;

#[cfg(test)]
mod tests;
