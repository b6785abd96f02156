#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use crate::{
    compiler::compiler::{CompileOptions, Compiler},
    errors::errors::{Error, ErrorTip},
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A source location: line number (1-based) and file name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn line(&self) -> u32 {
        self.0
    }

    pub fn file(&self) -> &str {
        &self.1
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.1, self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    pub fn between(start: &Span, end: &Span) -> Self {
        Span {
            start: start.start.clone(),
            end: end.end.clone(),
        }
    }
}

/// Runs the whole pipeline on one source string and returns the IR text.
pub fn compile_source(source: &str, file: &str, options: CompileOptions) -> Result<String, Error> {
    let tokens = lexer::lexer::tokenize(source.to_string(), Some(file.to_string()))?;
    let program = parser::parser::parse(tokens, Rc::new(file.to_string()))?;

    let verbose = options.verbose;
    let mut compiler = Compiler::new(program, options);
    compiler.check_types(verbose)?;
    compiler.generate_ir()
}

pub fn get_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source.lines().nth(line as usize - 1)
}

pub fn display_error(error: &Error, source: &str) -> String {
    /*
        Error: TypeMismatch (cannot assign char[] to float lvalue)
        -> test.c
           |
         3 | y = "str";
           | ^
    */

    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", position));

    if let Some(line_text) = get_line(source, position.line()) {
        let line_string = position.line().to_string();
        let padding = line_string.len() + 2;

        out.push_str(&format!("{:>padding$}\n", "|"));
        out.push_str(&format!("{} | {}\n", line_string, line_text.trim()));
        out.push_str(&format!("{:>padding$} ^\n", "|"));
    }

    out
}
