//! Tag-style rendering of the tree, printed by the driver's parse mode.

use super::{
    ast::{Function, Program, Variable},
    expressions::{Expr, ExprKind, LValue},
    scope::Scope,
    statements::{Stmt, StmtKind},
};

pub fn dump_program(program: &Program) -> String {
    let mut out = String::new();
    out.push_str("<Program>\n");
    dump_scope(&mut out, &program.scope);
    out.push_str("</Program>\n");
    out
}

fn dump_scope(out: &mut String, scope: &Scope) {
    out.push_str("<Scope>\n(variables)\n");
    for variable in &scope.variables {
        dump_variable(out, variable);
    }
    out.push_str("(functions)\n");
    for function in scope.functions.iter().filter(|f| !f.builtin) {
        dump_function(out, function);
    }
    out.push_str("</Scope>\n");
}

fn dump_variable(out: &mut String, variable: &Variable) {
    let name = &variable.name;
    out.push_str(&format!("<Variable base_type={}>\n", variable.base_type));
    out.push_str(&format!(
        "<VariableName name=\"{}\" is_array={}",
        name.name, name.is_array as u8
    ));
    if let Some(size) = name.array_size {
        out.push_str(&format!(" array_size={}", size));
    }
    out.push_str(" />\n</Variable>\n");
}

fn dump_function(out: &mut String, function: &Function) {
    out.push_str(&format!(
        "<Function name={} ret_type={} defined={}>\n",
        function.name, function.ret_type, function.defined as u8
    ));
    out.push_str("(parameters)\n");
    for variable in &function.params.variables {
        dump_variable(out, variable);
    }
    out.push_str("(locals)\n");
    for variable in function.locals() {
        dump_variable(out, variable);
    }
    out.push_str("(body)\n");
    dump_body(out, &function.body);
    out.push_str("</Function>\n");
}

fn dump_body(out: &mut String, body: &[Stmt]) {
    for stmt in body {
        dump_stmt(out, stmt);
    }
}

fn dump_stmt(out: &mut String, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Expression(expr) => {
            out.push_str("<ExpressionStatement>\n");
            dump_expr(out, expr);
            out.push_str("</ExpressionStatement>\n");
        }
        StmtKind::Break => out.push_str("<BreakStatement />\n"),
        StmtKind::Continue => out.push_str("<ContinueStatement />\n"),
        StmtKind::Return(expr) => {
            out.push_str("<ReturnStatement>\n");
            if let Some(expr) = expr {
                dump_expr(out, expr);
            }
            out.push_str("</ReturnStatement>\n");
        }
        StmtKind::If {
            cond,
            body,
            else_body,
        } => {
            out.push_str("<IfStatement>\n(condition)\n");
            dump_expr(out, cond);
            out.push_str("(body)\n");
            dump_body(out, body);
            if let Some(else_body) = else_body {
                out.push_str("(else_body)\n");
                dump_body(out, else_body);
            }
            out.push_str("</IfStatement>\n");
        }
        StmtKind::For {
            init,
            cond,
            next,
            body,
        } => {
            out.push_str("<ForStatement>\n");
            for (label, expr) in [("init", init), ("cond", cond), ("next", next)] {
                if let Some(expr) = expr {
                    out.push_str(&format!("({})\n", label));
                    dump_expr(out, expr);
                }
            }
            out.push_str("(body)\n");
            dump_body(out, body);
            out.push_str("</ForStatement>\n");
        }
        StmtKind::While { cond, body } => {
            out.push_str("<WhileStatement>\n(cond)\n");
            dump_expr(out, cond);
            out.push_str("(body)\n");
            dump_body(out, body);
            out.push_str("</WhileStatement>\n");
        }
        StmtKind::DoWhile { body, cond } => {
            out.push_str("<DoWhileStatement>\n(cond)\n");
            dump_expr(out, cond);
            out.push_str("(body)\n");
            dump_body(out, body);
            out.push_str("</DoWhileStatement>\n");
        }
    }
}

fn dump_lvalue(out: &mut String, lvalue: &LValue) {
    out.push_str(&format!("<LValue name={}>\n", lvalue.name));
    if let Some(index) = &lvalue.index {
        dump_expr(out, index);
    }
    out.push_str("</LValue>\n");
}

fn dump_expr(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::IntConst(n) => {
            out.push_str(&format!("<IntConst n={}>\n", n));
        }
        ExprKind::RealConst(n) => {
            out.push_str(&format!("<RealConst n={}>\n", n));
        }
        ExprKind::StrConst(val) => {
            out.push_str(&format!("<StrConst val=\"{}\">\n", val.escape_ascii()));
        }
        ExprKind::CharConst(val) => {
            out.push_str(&format!("<CharConst val='{}'>\n", val.escape_ascii()));
        }
        ExprKind::Identifier(name) => {
            out.push_str(&format!("<IdentifierExpression name=\"{}\" />\n", name));
        }
        ExprKind::Address(name) => {
            out.push_str(&format!("<AddressExpression name=\"{}\" />\n", name));
        }
        ExprKind::Index { name, index } => {
            out.push_str(&format!("<IndexExpression name=\"{}\">\n", name));
            dump_expr(out, index);
            out.push_str("</IndexExpression>\n");
        }
        ExprKind::Call { name, args } => {
            out.push_str(&format!("<CallExpression name=\"{}\">\n", name));
            for arg in args {
                dump_expr(out, arg);
            }
            out.push_str("</CallExpression>\n");
        }
        ExprKind::Assignment { lhs, op, rhs } => {
            out.push_str(&format!("<AssignmentExpression op={}>\n", op.symbol()));
            out.push_str("(lhs)\n");
            dump_lvalue(out, lhs);
            out.push_str("(rhs)\n");
            dump_expr(out, rhs);
            out.push_str("</AssignmentExpression>\n");
        }
        ExprKind::IncDec {
            operand,
            op,
            is_prefix,
        } => {
            out.push_str(&format!(
                "<IncDecExpression type={} is_pre={}>\n",
                op.symbol(),
                *is_prefix as u8
            ));
            dump_lvalue(out, operand);
            out.push_str("</IncDecExpression>\n");
        }
        ExprKind::Unary { op, operand } => {
            out.push_str(&format!("<UnaryOpExpression type={}>\n", op.symbol()));
            dump_expr(out, operand);
            out.push_str("</UnaryOpExpression>\n");
        }
        ExprKind::Binary { op, lhs, rhs } => {
            out.push_str(&format!("<BinaryOpExpression type={}>\n", op.symbol()));
            out.push_str("(lhs)\n");
            dump_expr(out, lhs);
            out.push_str("(rhs)\n");
            dump_expr(out, rhs);
            out.push_str("</BinaryOpExpression>\n");
        }
        ExprKind::Ternary { cond, pos, neg } => {
            out.push_str("<TernaryOpExpression>\n(cond)\n");
            dump_expr(out, cond);
            out.push_str("(pos)\n");
            dump_expr(out, pos);
            out.push_str("(neg)\n");
            dump_expr(out, neg);
            out.push_str("</TernaryOpExpression>\n");
        }
        ExprKind::Cast { target, operand } => {
            out.push_str(&format!("<CastExpression type={}>\n", target));
            dump_expr(out, operand);
            out.push_str("</CastExpression>\n");
        }
    }
}
