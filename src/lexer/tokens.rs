use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("char", TokenKind::Char);
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("void", TokenKind::Void);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("return", TokenKind::Return);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    Real,
    CharLiteral,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=
    Tilde,      // ~

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,
    Pipe,
    Ampersand,
    Caret,
    ShiftLeft,
    ShiftRight,

    Semicolon,
    Colon,
    Question,
    Comma,

    PlusPlus,
    MinusMinus,
    PlusEquals,
    MinusEquals,
    SlashEquals,
    StarEquals,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Char,
    Int,
    Float,
    Void,
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,
    Return,
}

impl TokenKind {
    /// Whether the token names one of the base types.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Char | TokenKind::Int | TokenKind::Float | TokenKind::Void
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    /// One line per token, as printed by the driver's lex mode.
    pub fn describe(&self) -> String {
        let name = match self.kind {
            TokenKind::EOF => String::from("(EOF)"),
            kind => kind.to_string().to_uppercase(),
        };
        format!(
            "File {} Line {} Token {} Text '{}'",
            self.span.start.file(),
            self.span.start.line(),
            name,
            self.value
        )
    }
}
