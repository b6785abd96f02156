//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program-level
//! parsing entry point. Expressions are parsed Pratt-style with NUD/LED
//! handlers; statements are dispatched on their leading keyword.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use log::debug;

use crate::{
    ast::{
        ast::{Function, Program},
        expressions::ExprId,
        scope::Scope,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_function_body,
    types::{parse_base_type, parse_params, parse_var_decl},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables for parsing
/// statements and expressions. It tracks the current position in the
/// token stream and hands out expression ids.
pub struct Parser {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for infix binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Counter for expression ids
    current_id: u32,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            current_id: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        // The stream ends with EOF and the cursor never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.tokens[index].kind != TokenKind::EOF {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            return Err(error.unwrap_or_else(|| self.unexpected()));
        }

        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// The default error for the current token.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    }

    /// An error for the current token with an explanation attached.
    pub fn unexpected_detailed(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: message.to_string(),
            },
            token.span.start.clone(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Binding power of the current token; non-operators bind nothing.
    pub fn current_bp(&self) -> BindingPower {
        self.binding_power_lookup
            .get(&self.current_token_kind())
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Hands out the next expression id.
    pub fn advance_id(&mut self) -> ExprId {
        let id = self.current_id;
        self.current_id += 1;
        ExprId(id)
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Span from `start` up to the previously consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        let end = match self.pos {
            0 => start.clone(),
            pos => self.tokens[(pos - 1).min(self.tokens.len() - 1)]
                .span
                .end
                .clone(),
        };
        Span { start, end }
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }
}

/// Parses one top-level declaration: globals, a prototype or a definition.
fn parse_top_level(parser: &mut Parser, program: &mut Program) -> Result<(), Error> {
    let start = parser.get_position();
    let base = parse_base_type(parser)?;

    if parser.peek_kind() != TokenKind::OpenParen {
        let globals = parse_var_decl(parser, base)?;
        for global in globals {
            program.scope.declare_variable(global)?;
        }
        return Ok(());
    }

    let name = parser.expect(TokenKind::Identifier)?.value;
    let params = Scope::from_variables(parse_params(parser)?)?;

    let function = if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        Function::declaration(parser.span_from(start), base, &name, params)
    } else {
        let (locals, body) = parse_function_body(parser)?;
        let locals = Scope::from_variables(locals)?;
        Function::definition(parser.span_from(start), base, &name, params, locals, body)?
    };

    debug!(
        "parsed {} {}",
        if function.defined { "function" } else { "prototype" },
        name
    );
    program.push_function(function)?;
    Ok(())
}

/// Parses a stream of tokens into a Program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables, registers the builtins and parses
/// declarations until EOF. Declaration conflicts are reported here.
///
/// # Arguments
///
/// * `tokens` - Vector of tokens to parse
/// * `file` - Reference-counted string containing the source file name
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    if tokens.is_empty() {
        return Ok(Program::new(Span {
            start: Position(1, Rc::clone(&file)),
            end: Position(1, file),
        }));
    }

    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);

    let mut program = Program::new(Span::null());
    while parser.has_tokens() {
        parse_top_level(&mut parser, &mut program)?;
    }

    program.span = Span {
        start: Position(1, file),
        end: parser.get_position(),
    };
    Ok(program)
}
