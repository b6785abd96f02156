use crate::ast::{
    ast::{Function, Variable, VariableName},
    scope::Scope,
    types::BaseType,
};
use crate::Span;

/// Number of builtin functions. They occupy function numbers `0..BUILTIN_COUNT`
/// and user functions are numbered after them.
pub const BUILTIN_COUNT: usize = 2;

/// Registers the runtime-provided functions in the global scope.
///
/// These are available to every program without a prototype:
///
/// - `char getchar(void)` reads one character
/// - `void putchar(char c)` writes one character
///
/// # Arguments
///
/// * `scope` - The empty global scope of a new program
pub fn register_builtins(scope: &mut Scope) {
    scope
        .functions
        .push(Function::builtin("getchar", BaseType::Char, Scope::new()));

    let param = Variable::new(BaseType::Char, VariableName::scalar("c", Span::null()));
    let params = Scope {
        variables: vec![param],
        functions: vec![],
    };
    scope
        .functions
        .push(Function::builtin("putchar", BaseType::Void, params));
}
