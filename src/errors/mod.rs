//! Error types and error handling for the compiler.
//!
//! This module defines the single diagnostic type shared by every pass:
//!
//! - Error structures carrying the originating file and line
//! - One variant per detected violation, with its exact message text
//! - A coarse `ErrorKind` taxonomy (syntax, name resolution, type, arity, codegen)
//! - Suggestions shown alongside rendered errors

pub mod errors;
