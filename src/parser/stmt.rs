use crate::{
    ast::{
        ast::Variable,
        expressions::Expr,
        statements::{Stmt, StmtKind},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{
    parser::Parser,
    types::{parse_base_type, parse_var_decl},
};

/// Parses one statement into `body`.
///
/// Bare blocks are flattened into the enclosing list and a lone `;`
/// produces nothing.
pub fn parse_stmt(parser: &mut Parser, body: &mut Vec<Stmt>) -> Result<(), Error> {
    let kind = parser.current_token_kind();

    match kind {
        TokenKind::OpenCurly => {
            parser.advance();
            while parser.current_token_kind() != TokenKind::CloseCurly {
                if !parser.has_tokens() {
                    return Err(parser.unexpected_detailed("unterminated block"));
                }
                parse_stmt(parser, body)?;
            }
            parser.advance();
            return Ok(());
        }
        TokenKind::Semicolon => {
            parser.advance();
            return Ok(());
        }
        TokenKind::Char | TokenKind::Int | TokenKind::Float | TokenKind::Void => {
            return Err(parser.unexpected_detailed("declarations must precede statements"));
        }
        _ => {}
    }

    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        body.push(handler(parser)?);
        return Ok(());
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = expr.span.clone();
    body.push(Stmt::new(StmtKind::Expression(expr), span));
    Ok(())
}

/// The body of a control statement: a block or a single statement.
pub fn parse_body(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let mut body = vec![];
    parse_stmt(parser, &mut body)?;
    Ok(body)
}

/// `{ local* stmt* }` of a function definition.
pub fn parse_function_body(parser: &mut Parser) -> Result<(Vec<Variable>, Vec<Stmt>), Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut locals = vec![];
    while parser.current_token_kind().is_type_keyword() {
        let base = parse_base_type(parser)?;
        locals.extend(parse_var_decl(parser, base)?);
    }

    let mut body = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("unterminated function body"));
        }
        parse_stmt(parser, &mut body)?;
    }
    parser.expect(TokenKind::CloseCurly)?;

    Ok((locals, body))
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let cond = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(cond)
}

fn parse_optional_expr(parser: &mut Parser, terminator: TokenKind) -> Result<Option<Expr>, Error> {
    let expr = if parser.current_token_kind() == terminator {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(terminator)?;
    Ok(expr)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let cond = parse_condition(parser)?;
    let body = parse_body(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_body(parser)?)
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If {
            cond,
            body,
            else_body,
        },
        parser.span_from(start),
    ))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    let init = parse_optional_expr(parser, TokenKind::Semicolon)?;
    let cond = parse_optional_expr(parser, TokenKind::Semicolon)?;
    let next = parse_optional_expr(parser, TokenKind::CloseParen)?;
    let body = parse_body(parser)?;

    Ok(Stmt::new(
        StmtKind::For {
            init,
            cond,
            next,
            body,
        },
        parser.span_from(start),
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let cond = parse_condition(parser)?;
    let body = parse_body(parser)?;

    Ok(Stmt::new(
        StmtKind::While { cond, body },
        parser.span_from(start),
    ))
}

pub fn parse_do_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let body = parse_body(parser)?;
    parser.expect(TokenKind::While)?;
    let cond = parse_condition(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(
        StmtKind::DoWhile { body, cond },
        parser.span_from(start),
    ))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Break, parser.span_from(start)))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Continue, parser.span_from(start)))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let value = parse_optional_expr(parser, TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Return(value), parser.span_from(start)))
}
