/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Variables, functions and the program root
/// - dump: Tag-style tree rendering
/// - expressions: Definitions for various expression types
/// - scope: Symbol tables and declaration checks
/// - statements: Definitions for various statement types
/// - types: Definitions for type representations in the AST
pub mod ast;
pub mod dump;
pub mod expressions;
pub mod scope;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
