use crate::{
    ast::expressions::{AssignOp, BinaryOp, Expr, ExprKind, IncDecOp, LValue, UnaryOp},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::unescape,
        tokens::{Token, TokenKind},
    },
    Span,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_base_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.current_bp() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };

        let operator_bp = parser.current_bp();
        left = led(parser, left, operator_bp)?;
    }

    Ok(left)
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Ampersand => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::ShiftLeft => BinaryOp::ShiftLeft,
        TokenKind::ShiftRight => BinaryOp::ShiftRight,
        TokenKind::Equals => BinaryOp::Equal,
        TokenKind::NotEquals => BinaryOp::NotEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEquals => BinaryOp::GreaterEqual,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEquals => BinaryOp::LessEqual,
        TokenKind::Or => BinaryOp::LogicalOr,
        TokenKind::And => BinaryOp::LogicalAnd,
        _ => return None,
    };
    Some(op)
}

fn assignment_operator(kind: TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Assignment => Some(AssignOp::Assign),
        TokenKind::PlusEquals => Some(AssignOp::Add),
        TokenKind::MinusEquals => Some(AssignOp::Sub),
        TokenKind::StarEquals => Some(AssignOp::Mul),
        TokenKind::SlashEquals => Some(AssignOp::Div),
        _ => None,
    }
}

fn detailed(token: &Token, message: &str) -> Error {
    Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: token.value.clone(),
            message: message.to_string(),
        },
        token.span.start.clone(),
    )
}

/// Reinterprets an already parsed expression as an assignment target.
fn into_lvalue(expr: Expr, operator: &Token) -> Result<LValue, Error> {
    match expr.kind {
        ExprKind::Identifier(name) => Ok(LValue {
            id: expr.id,
            name,
            index: None,
            span: expr.span,
        }),
        ExprKind::Index { name, index } => Ok(LValue {
            id: expr.id,
            name,
            index: Some(index),
            span: expr.span,
        }),
        _ => Err(detailed(
            operator,
            "the operand must be a variable or an array element",
        )),
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let kind = match token.kind {
        TokenKind::Number => match token.value.parse() {
            Ok(value) => ExprKind::IntConst(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                ))
            }
        },
        TokenKind::Real => match token.value.parse() {
            Ok(value) => ExprKind::RealConst(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                ))
            }
        },
        TokenKind::CharLiteral => match unescape(&token.value).as_slice() {
            [byte] => ExprKind::CharConst(*byte),
            _ => {
                return Err(detailed(
                    &token,
                    "a character constant must stand for a single byte",
                ))
            }
        },
        TokenKind::String => ExprKind::StrConst(unescape(&token.value)),
        TokenKind::Identifier => ExprKind::Identifier(token.value.clone()),
        _ => return Err(parser.unexpected()),
    };

    parser.advance();
    Ok(Expr::new(parser.advance_id(), kind, token.span))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let Some(op) = binary_operator(operator_token.kind) else {
        return Err(detailed(&operator_token, "expected a binary operator"));
    };

    let right = parse_expr(parser, bp)?;
    let span = Span::between(&left.span, &right.span);

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::Binary {
            op,
            lhs: Box::new(left),
            rhs: Box::new(right),
        },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = match operator_token.kind {
        TokenKind::Dash => UnaryOp::Negate,
        TokenKind::Not => UnaryOp::Not,
        TokenKind::Tilde => UnaryOp::BitNot,
        _ => return Err(detailed(&operator_token, "expected a unary operator")),
    };

    // The magnitude of INT_MIN only fits once negated.
    if op == UnaryOp::Negate && parser.current_token_kind() == TokenKind::Number {
        let number = parser.current_token().clone();
        if number.value.parse::<i32>().is_err() {
            if let Ok(value) = format!("-{}", number.value).parse::<i32>() {
                parser.advance();
                let span = Span::between(&operator_token.span, &number.span);
                return Ok(Expr::new(parser.advance_id(), ExprKind::IntConst(value), span));
            }
        }
    }

    let rhs = parse_expr(parser, BindingPower::Unary)?;
    let span = Span::between(&operator_token.span, &rhs.span);

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::Unary {
            op,
            operand: Box::new(rhs),
        },
        span,
    ))
}

fn incdec_operator(token: &Token) -> Result<IncDecOp, Error> {
    match token.kind {
        TokenKind::PlusPlus => Ok(IncDecOp::Increment),
        TokenKind::MinusMinus => Ok(IncDecOp::Decrement),
        _ => Err(detailed(token, "expected '++' or '--'")),
    }
}

pub fn parse_prefix_incdec_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = incdec_operator(&operator_token)?;

    let operand = parse_expr(parser, BindingPower::Unary)?;
    let span = Span::between(&operator_token.span, &operand.span);

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::IncDec {
            operand: into_lvalue(operand, &operator_token)?,
            op,
            is_prefix: true,
        },
        span,
    ))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = incdec_operator(&operator_token)?;
    let span = Span::between(&left.span, &operator_token.span);

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::IncDec {
            operand: into_lvalue(left, &operator_token)?,
            op,
            is_prefix: false,
        },
        span,
    ))
}

pub fn parse_address_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();
    let error = parser.unexpected_detailed("expected a variable name after '&'");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::Address(name.value),
        Span::between(&start, &name.span),
    ))
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let Some(op) = assignment_operator(operator_token.kind) else {
        return Err(detailed(&operator_token, "expected an assignment operator"));
    };

    let lhs = into_lvalue(left, &operator_token)?;
    // Parsing one level below assignment makes it right-associative.
    let rhs = parse_expr(parser, BindingPower::Comma)?;
    let span = Span::between(&lhs.span, &rhs.span);

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::Assignment {
            lhs,
            op,
            rhs: Box::new(rhs),
        },
        span,
    ))
}

pub fn parse_ternary_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let pos = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let neg = parse_expr(parser, BindingPower::Assignment)?;
    let span = Span::between(&left.span, &neg.span);

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::Ternary {
            cond: Box::new(left),
            pos: Box::new(pos),
            neg: Box::new(neg),
        },
        span,
    ))
}

/// `( expr )` or a cast `( type ) expr`.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();

    if parser.current_token_kind().is_type_keyword() {
        let target = parse_base_type(parser)?;
        parser.expect(TokenKind::CloseParen)?;
        let operand = parse_expr(parser, BindingPower::Unary)?;
        let span = Span::between(&open.span, &operand.span);

        return Ok(Expr::new(
            parser.advance_id(),
            ExprKind::Cast {
                target,
                operand: Box::new(operand),
            },
            span,
        ));
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let ExprKind::Identifier(name) = left.kind else {
        return Err(detailed(&open, "only named functions can be called"));
    };

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            args.push(parse_expr(parser, BindingPower::Comma)?);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::Call { name, args },
        Span::between(&left.span, &close.span),
    ))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let ExprKind::Identifier(name) = left.kind else {
        return Err(detailed(&open, "only named arrays can be indexed"));
    };

    let index = parse_expr(parser, BindingPower::Default)?;
    let close = parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::new(
        parser.advance_id(),
        ExprKind::Index {
            name,
            index: Box::new(index),
        },
        Span::between(&left.span, &close.span),
    ))
}
