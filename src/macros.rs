//! Utility macros for the compiler.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for simple tokens

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for fixed-text tokens such as operators
/// and punctuation.
///
/// The generated handler pushes a token of the given kind spanning the
/// current line and advances the lexer past the literal text.
///
/// # Example
///
/// ```ignore
/// RegexPattern::new("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%"))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let position = lexer.position();
            lexer.push(MK_TOKEN!(
                $kind,
                String::from($value),
                Span {
                    start: position.clone(),
                    end: position,
                }
            ));
            lexer.advance_n($value.len());
        }
    };
}
