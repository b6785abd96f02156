use crate::{
    ast::{
        expressions::Expr,
        statements::{Stmt, StmtKind},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{compiler::FunctionCompiler, expr::gen_expression};

/// Jump targets of the innermost enclosing loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopLabels {
    pub continue_label: String,
    pub break_label: String,
}

/// Evaluates a condition and jumps to `target` when it is zero.
fn gen_branch_if_false(
    compiler: &mut FunctionCompiler,
    cond: &Expr,
    target: &str,
) -> Result<(), Error> {
    let tag = compiler.type_of(cond.id, &cond.span.start)?.tag();
    gen_expression(compiler, cond, true)?;
    compiler.emit(format!("jz{} {}", tag, target));
    Ok(())
}

fn gen_body(
    compiler: &mut FunctionCompiler,
    body: &[Stmt],
    loop_labels: Option<&LoopLabels>,
) -> Result<(), Error> {
    for stmt in body {
        gen_statement(compiler, stmt, loop_labels)?;
    }
    Ok(())
}

fn outside_loop(statement: &str, stmt: &Stmt) -> Error {
    Error::new(
        ErrorImpl::OutsideLoop {
            statement: statement.to_string(),
        },
        stmt.span.start.clone(),
    )
}

/// Emits the code of a statement.
///
/// # Arguments
///
/// * `compiler` - State for the function being compiled
/// * `stmt` - The statement to compile
/// * `loop_labels` - Targets for `break` and `continue`, `None` outside loops
pub fn gen_statement(
    compiler: &mut FunctionCompiler,
    stmt: &Stmt,
    loop_labels: Option<&LoopLabels>,
) -> Result<(), Error> {
    match &stmt.kind {
        StmtKind::Expression(expr) => gen_expression(compiler, expr, false)?,
        StmtKind::Break => match loop_labels {
            Some(labels) => compiler.emit(format!("goto {}", labels.break_label)),
            None => return Err(outside_loop("break", stmt)),
        },
        StmtKind::Continue => match loop_labels {
            Some(labels) => compiler.emit(format!("goto {}", labels.continue_label)),
            None => return Err(outside_loop("continue", stmt)),
        },
        StmtKind::Return(value) => {
            if let Some(value) = value {
                gen_expression(compiler, value, true)?;
            }
            compiler.emit("ret");
        }
        StmtKind::If {
            cond,
            body,
            else_body,
        } => {
            let on_false = compiler.new_label();
            gen_branch_if_false(compiler, cond, &on_false)?;
            gen_body(compiler, body, loop_labels)?;

            match else_body {
                None => compiler.place_label(on_false),
                Some(else_body) => {
                    let end = compiler.new_label();
                    compiler.emit(format!("goto {}", end));
                    compiler.place_label(on_false);
                    gen_body(compiler, else_body, loop_labels)?;
                    compiler.place_label(end);
                }
            }
        }
        StmtKind::While { cond, body } => {
            let labels = LoopLabels {
                continue_label: compiler.new_label(),
                break_label: compiler.new_label(),
            };

            compiler.place_label(labels.continue_label.clone());
            gen_branch_if_false(compiler, cond, &labels.break_label)?;
            gen_body(compiler, body, Some(&labels))?;
            compiler.emit(format!("goto {}", labels.continue_label));
            compiler.place_label(labels.break_label);
        }
        StmtKind::DoWhile { body, cond } => {
            let start = compiler.new_label();
            let labels = LoopLabels {
                continue_label: compiler.new_label(),
                break_label: compiler.new_label(),
            };

            compiler.place_label(start.clone());
            gen_body(compiler, body, Some(&labels))?;
            compiler.place_label(labels.continue_label.clone());
            gen_branch_if_false(compiler, cond, &labels.break_label)?;
            compiler.emit(format!("goto {}", start));
            compiler.place_label(labels.break_label);
        }
        StmtKind::For {
            init,
            cond,
            next,
            body,
        } => {
            let start = compiler.new_label();
            let labels = LoopLabels {
                continue_label: compiler.new_label(),
                break_label: compiler.new_label(),
            };

            if let Some(init) = init {
                gen_expression(compiler, init, false)?;
            }
            compiler.place_label(start.clone());
            if let Some(cond) = cond {
                gen_branch_if_false(compiler, cond, &labels.break_label)?;
            }
            gen_body(compiler, body, Some(&labels))?;
            compiler.place_label(labels.continue_label.clone());
            if let Some(next) = next {
                gen_expression(compiler, next, false)?;
            }
            compiler.emit(format!("goto {}", start));
            compiler.place_label(labels.break_label);
        }
    }

    Ok(())
}
