use crate::{
    ast::{
        ast::Variable,
        expressions::{BinaryOp, Expr, ExprKind, IncDecOp, LValue, UnaryOp},
        types::{BaseType, Type},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{compiler::FunctionCompiler, storage::Location};

/// Mnemonic of an arithmetic or bitwise operator, without its type tag.
fn arithmetic_mnemonic(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::Add => Some("add"),
        BinaryOp::Sub => Some("sub"),
        BinaryOp::Mul => Some("mul"),
        BinaryOp::Div => Some("div"),
        BinaryOp::Mod => Some("mod"),
        BinaryOp::BitAnd => Some("and"),
        BinaryOp::BitOr => Some("or"),
        BinaryOp::BitXor => Some("xor"),
        BinaryOp::ShiftLeft => Some("shl"),
        BinaryOp::ShiftRight => Some("shr"),
        _ => None,
    }
}

/// Conditional jump taken when the comparison holds.
fn jump_mnemonic(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::Equal => Some("jeq"),
        BinaryOp::NotEqual => Some("jne"),
        BinaryOp::Less => Some("jlt"),
        BinaryOp::LessEqual => Some("jle"),
        BinaryOp::Greater => Some("jgt"),
        BinaryOp::GreaterEqual => Some("jge"),
        _ => None,
    }
}

fn incdec_mnemonic(op: IncDecOp) -> &'static str {
    match op {
        IncDecOp::Increment => "inc",
        IncDecOp::Decrement => "dec",
    }
}

/// Pushes the base address of an array: the storage itself for a sized
/// array, the address held in the slot for an array parameter.
fn push_array_address(compiler: &mut FunctionCompiler, location: Location, variable: &Variable) {
    if variable.has_array_storage() {
        compiler.emit(format!("ptrto {}", location));
    } else {
        compiler.emit(format!("push {}", location));
    }
}

/// Turns the jump just emitted into a 0/1 value on the stack.
///
/// `jump` is the conditional jump, without its target, that branches when
/// the result is 1.
fn gen_boolean(compiler: &mut FunctionCompiler, jump: String) {
    let on_true = compiler.new_label();
    let end = compiler.new_label();

    compiler.emit(format!("{} {}", jump, on_true));
    compiler.emit("push 0");
    compiler.emit(format!("goto {}", end));
    compiler.place_label(on_true);
    compiler.emit("push 1");
    compiler.place_label(end);
}

/// Pushes the element index, converting a float index to int.
fn gen_index(compiler: &mut FunctionCompiler, index: &Expr) -> Result<(), Error> {
    gen_expression(compiler, index, true)?;
    if compiler.type_of(index.id, &index.span.start)? == Type::FLOAT {
        compiler.emit("ftoi");
    }
    Ok(())
}

/// Pushes the current value of an lvalue.
fn gen_load(compiler: &mut FunctionCompiler, lvalue: &LValue, ty: Type) -> Result<(), Error> {
    let (location, variable) = compiler.variable_of(lvalue.id, &lvalue.span.start)?;
    match &lvalue.index {
        None => compiler.emit(format!("push {}", location)),
        Some(index) => {
            gen_index(compiler, index)?;
            push_array_address(compiler, location, variable);
            compiler.emit(format!("apush{}", ty.tag()));
        }
    }
    Ok(())
}

/// Pops the top of the stack into an lvalue.
fn gen_store(compiler: &mut FunctionCompiler, lvalue: &LValue, ty: Type) -> Result<(), Error> {
    let (location, variable) = compiler.variable_of(lvalue.id, &lvalue.span.start)?;
    match &lvalue.index {
        None => compiler.emit(format!("pop {}", location)),
        Some(index) => {
            gen_index(compiler, index)?;
            push_array_address(compiler, location, variable);
            compiler.emit(format!("apop{}", ty.tag()));
        }
    }
    Ok(())
}

/// Emits the code of an expression.
///
/// # Arguments
///
/// * `compiler` - State for the function being compiled
/// * `expr` - The expression to compile
/// * `keep_result` - Whether the value must be left on the stack. Side
///   effects are emitted either way.
pub fn gen_expression(
    compiler: &mut FunctionCompiler,
    expr: &Expr,
    keep_result: bool,
) -> Result<(), Error> {
    let position = &expr.span.start;

    match &expr.kind {
        ExprKind::IntConst(_) | ExprKind::RealConst(_) | ExprKind::CharConst(_) => {
            if keep_result {
                let location = compiler.literal(expr.id, position)?;
                compiler.emit(format!("push {}", location));
            }
        }
        ExprKind::StrConst(_) => {
            if keep_result {
                let location = compiler.literal(expr.id, position)?;
                compiler.emit(format!("ptrto {}", location));
            }
        }
        ExprKind::Identifier(_) => {
            if keep_result {
                let (location, variable) = compiler.variable_of(expr.id, position)?;
                if variable.name.is_array {
                    push_array_address(compiler, location, variable);
                } else {
                    compiler.emit(format!("push {}", location));
                }
            }
        }
        ExprKind::Address(_) => {
            if keep_result {
                let (location, _) = compiler.variable_of(expr.id, position)?;
                compiler.emit(format!("ptrto {}", location));
            }
        }
        ExprKind::Index { index, .. } => {
            if !keep_result {
                return gen_expression(compiler, index, false);
            }
            let ty = compiler.type_of(expr.id, position)?;
            let (location, variable) = compiler.variable_of(expr.id, position)?;
            gen_index(compiler, index)?;
            push_array_address(compiler, location, variable);
            compiler.emit(format!("apush{}", ty.tag()));
        }
        ExprKind::Call { args, .. } => {
            let (number, function) = compiler.call_target(expr.id, position)?;
            for arg in args {
                gen_expression(compiler, arg, true)?;
            }
            compiler.emit(format!("call {}", number));
            if !keep_result && function.ret_type != BaseType::Void {
                compiler.emit("drop");
            }
        }
        ExprKind::Assignment { lhs, op, rhs } => {
            let ty = compiler.type_of(lhs.id, &lhs.span.start)?;
            let tag = ty.tag();

            match op.arithmetic().and_then(arithmetic_mnemonic) {
                None => gen_expression(compiler, rhs, true)?,
                Some(mnemonic) => {
                    gen_load(compiler, lhs, ty)?;
                    gen_expression(compiler, rhs, true)?;
                    compiler.emit(format!("{}{}", mnemonic, tag));
                }
            }
            if keep_result {
                compiler.emit("copy");
            }
            gen_store(compiler, lhs, ty)?;
        }
        ExprKind::IncDec {
            operand,
            op,
            is_prefix,
        } => {
            let ty = compiler.type_of(operand.id, &operand.span.start)?;

            gen_load(compiler, operand, ty)?;
            if keep_result && !is_prefix {
                compiler.emit("copy");
            }
            compiler.emit(format!("{}{}", incdec_mnemonic(*op), ty.tag()));
            if keep_result && *is_prefix {
                compiler.emit("copy");
            }
            gen_store(compiler, operand, ty)?;
        }
        ExprKind::Unary { op, operand } => {
            if !keep_result {
                return gen_expression(compiler, operand, false);
            }
            let tag = compiler.type_of(operand.id, &operand.span.start)?.tag();
            gen_expression(compiler, operand, true)?;

            match op {
                UnaryOp::Negate => compiler.emit(format!("neg{}", tag)),
                UnaryOp::BitNot => compiler.emit(format!("inv{}", tag)),
                UnaryOp::Not => gen_boolean(compiler, format!("jz{}", tag)),
            }
        }
        ExprKind::Binary { op, lhs, rhs } => {
            if op.is_logical() {
                return Err(Error::new(
                    ErrorImpl::NotImplemented {
                        feature: format!("operator '{}'", op),
                    },
                    position.clone(),
                ));
            }
            if !keep_result {
                gen_expression(compiler, lhs, false)?;
                return gen_expression(compiler, rhs, false);
            }

            let tag = compiler.type_of(lhs.id, &lhs.span.start)?.tag();
            gen_expression(compiler, lhs, true)?;
            gen_expression(compiler, rhs, true)?;

            if let Some(mnemonic) = arithmetic_mnemonic(*op) {
                compiler.emit(format!("{}{}", mnemonic, tag));
            } else if let Some(jump) = jump_mnemonic(*op) {
                gen_boolean(compiler, format!("{}{}", jump, tag));
            }
        }
        ExprKind::Ternary { cond, pos, neg } => {
            let tag = compiler.type_of(cond.id, &cond.span.start)?.tag();
            let on_false = compiler.new_label();
            let end = compiler.new_label();

            gen_expression(compiler, cond, true)?;
            compiler.emit(format!("jz{} {}", tag, on_false));
            gen_expression(compiler, pos, keep_result)?;
            compiler.emit(format!("goto {}", end));
            compiler.place_label(on_false);
            gen_expression(compiler, neg, keep_result)?;
            compiler.place_label(end);
        }
        ExprKind::Cast { target, operand } => {
            gen_expression(compiler, operand, keep_result)?;
            if keep_result {
                let from = compiler.type_of(operand.id, &operand.span.start)?;
                match (from.base.is_float(), target.is_float()) {
                    (false, true) => compiler.emit("itof"),
                    (true, false) => compiler.emit("ftoi"),
                    _ => {}
                }
            }
        }
    }

    Ok(())
}
