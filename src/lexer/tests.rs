//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric, character and string literals
//! - Operators and punctuation
//! - Comments and line tracking
//! - Error cases

use super::{
    lexer::{tokenize, unescape},
    tokens::TokenKind,
};

#[test]
fn test_tokenize_keywords() {
    let source = "char int float void if else for while do break continue return".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Char);
    assert_eq!(tokens[1].kind, TokenKind::Int);
    assert_eq!(tokens[2].kind, TokenKind::Float);
    assert_eq!(tokens[3].kind, TokenKind::Void);
    assert_eq!(tokens[4].kind, TokenKind::If);
    assert_eq!(tokens[5].kind, TokenKind::Else);
    assert_eq!(tokens[6].kind, TokenKind::For);
    assert_eq!(tokens[7].kind, TokenKind::While);
    assert_eq!(tokens[8].kind, TokenKind::Do);
    assert_eq!(tokens[9].kind, TokenKind::Break);
    assert_eq!(tokens[10].kind, TokenKind::Continue);
    assert_eq!(tokens[11].kind, TokenKind::Return);
    assert_eq!(tokens[12].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore integer".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    // keyword prefixes stay identifiers
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "integer");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Real);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[3].kind, TokenKind::Real);
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "multiple words" """#.to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_escapes() {
    let source = r#""hello\nworld" "quote\"test""#.to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].value, r"hello\nworld");
    assert_eq!(tokens[1].value, r#"quote\"test"#);
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_unescape() {
    assert_eq!(unescape(r"hello\nworld"), b"hello\nworld");
    assert_eq!(unescape(r"tab\there"), b"tab\there");
    assert_eq!(unescape(r"backslash\\"), b"backslash\\");
    assert_eq!(unescape(r"hex\x41\xff"), b"hexA\xff");
    assert_eq!(unescape(r#"quote\"test"#), b"quote\"test");
    assert_eq!(unescape(r"\q"), b"\\q");
    assert_eq!(unescape("\u{20ac}"), vec![0xe2, 0x82, 0xac]);
}

#[test]
fn test_tokenize_char_literals() {
    let source = r"'a' '\n' '\'' '\0' '\x41' '€'".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].value, r"\n");
    assert_eq!(tokens[2].value, r"\'");
    assert_eq!(tokens[3].value, r"\0");
    assert_eq!(tokens[4].value, r"\x41");
    assert_eq!(tokens[5].value, "\u{20ac}");
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * / % == != < > <= >= = && || & | ^ << >> ! ~".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Ampersand,
            TokenKind::Pipe,
            TokenKind::Caret,
            TokenKind::ShiftLeft,
            TokenKind::ShiftRight,
            TokenKind::Not,
            TokenKind::Tilde,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_compound_operators() {
    let source = "++ -- += -= *= /=".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::PlusPlus);
    assert_eq!(tokens[1].kind, TokenKind::MinusMinus);
    assert_eq!(tokens[2].kind, TokenKind::PlusEquals);
    assert_eq!(tokens[3].kind, TokenKind::MinusEquals);
    assert_eq!(tokens[4].kind, TokenKind::StarEquals);
    assert_eq!(tokens[5].kind, TokenKind::SlashEquals);
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_punctuation() {
    let source = "( ) { } [ ] , ; : ?".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::OpenParen);
    assert_eq!(tokens[1].kind, TokenKind::CloseParen);
    assert_eq!(tokens[2].kind, TokenKind::OpenCurly);
    assert_eq!(tokens[3].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[4].kind, TokenKind::OpenBracket);
    assert_eq!(tokens[5].kind, TokenKind::CloseBracket);
    assert_eq!(tokens[6].kind, TokenKind::Comma);
    assert_eq!(tokens[7].kind, TokenKind::Semicolon);
    assert_eq!(tokens[8].kind, TokenKind::Colon);
    assert_eq!(tokens[9].kind, TokenKind::Question);
    assert_eq!(tokens[10].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_comments() {
    let source = "int x; // line comment\n/* block\ncomment */ int y;".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[1].value, "x");
    assert_eq!(tokens[2].kind, TokenKind::Semicolon);
    assert_eq!(tokens[3].kind, TokenKind::Int);
    assert_eq!(tokens[4].value, "y");
    assert_eq!(tokens[5].kind, TokenKind::Semicolon);
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_tracks_lines() {
    let source = "int x;\n\nint y;\n/* a\nb */ float z;".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.line(), 1);
    assert_eq!(tokens[3].span.start.line(), 3);
    assert_eq!(tokens[6].kind, TokenKind::Float);
    assert_eq!(tokens[6].span.start.line(), 5);
    assert_eq!(tokens[6].span.start.file(), "test.c");
}

#[test]
fn test_tokenize_simple_program() {
    let source = "int x; int f(int a) { return a + x; }".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens.len(), 17);
    assert_eq!(tokens[3].kind, TokenKind::Int);
    assert_eq!(tokens[4].value, "f");
    assert_eq!(tokens[5].kind, TokenKind::OpenParen);
    assert_eq!(tokens[10].kind, TokenKind::Return);
    assert_eq!(tokens[12].kind, TokenKind::Plus);
    assert_eq!(tokens[16].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_unrecognized_token() {
    let source = "int x = @;".to_string();
    let result = tokenize(source, Some("test.c".to_string()));

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_tokenize_unterminated_string() {
    let source = "\"abc".to_string();
    let result = tokenize(source, Some("test.c".to_string()));

    assert!(result.is_err());
}

#[test]
fn test_token_describe() {
    let source = "x = 'a';".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].describe(), "File test.c Line 1 Token IDENTIFIER Text 'x'");
    assert_eq!(tokens[1].describe(), "File test.c Line 1 Token ASSIGNMENT Text '='");
    assert_eq!(tokens[4].describe(), "File test.c Line 1 Token (EOF) Text 'EOF'");
}
