//! Type and declaration parsing.
//!
//! This module handles the parts of the grammar that name types:
//!
//! - Base type keywords (`char`, `int`, `float`, `void`)
//! - Declarator lists for globals and locals (`int a, b[10];`)
//! - Parameter lists (`(void)`, `(int a, char s[])`)

use crate::{
    ast::{
        ast::{Variable, VariableName},
        types::BaseType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

pub fn parse_base_type(parser: &mut Parser) -> Result<BaseType, Error> {
    if !parser.current_token_kind().is_type_keyword() {
        return Err(parser.unexpected_detailed("expected a type name"));
    }

    let token = parser.advance().clone();
    BaseType::from_name(&token.value).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.span.start,
        )
    })
}

/// `name` or `name[size]`.
fn parse_var_name(parser: &mut Parser) -> Result<VariableName, Error> {
    let error = parser.unexpected_detailed("expected identifier in declaration");
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    if parser.current_token_kind() != TokenKind::OpenBracket {
        return Ok(VariableName::scalar(&token.value, token.span));
    }

    parser.advance();
    let error = parser.unexpected_detailed("array declarations need a constant size");
    let size = parser.expect_error(TokenKind::Number, Some(error))?;
    let array_size = size.value.parse::<u32>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: size.value.clone(),
            },
            size.span.start.clone(),
        )
    })?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(VariableName::array(&token.value, Some(array_size), token.span))
}

/// Parses the declarators after a base type, up to and including `;`.
pub fn parse_var_decl(parser: &mut Parser, base: BaseType) -> Result<Vec<Variable>, Error> {
    if base == BaseType::Void {
        return Err(parser.unexpected_detailed("variables cannot have type void"));
    }

    let mut variables = vec![Variable::new(base, parse_var_name(parser)?)];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        variables.push(Variable::new(base, parse_var_name(parser)?));
    }

    parser.expect(TokenKind::Semicolon)?;
    Ok(variables)
}

fn parse_param(parser: &mut Parser) -> Result<Variable, Error> {
    let base = parse_base_type(parser)?;
    if base == BaseType::Void {
        return Err(parser.unexpected_detailed("parameters cannot have type void"));
    }

    let error = parser.unexpected_detailed("expected parameter name");
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let name = if parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();
        let error = parser.unexpected_detailed("array parameters take no size");
        parser.expect_error(TokenKind::CloseBracket, Some(error))?;
        VariableName::array(&token.value, None, token.span)
    } else {
        VariableName::scalar(&token.value, token.span)
    };

    Ok(Variable::new(base, name))
}

/// Parses `( params )`, where `()` and `(void)` both mean no parameters.
pub fn parse_params(parser: &mut Parser) -> Result<Vec<Variable>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    if parser.current_token_kind() == TokenKind::Void && parser.peek_kind() == TokenKind::CloseParen {
        parser.advance();
    }

    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            params.push(parse_param(parser)?);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(params)
}
