use crate::Span;

use super::expressions::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expression(Expr),
    Break,
    Continue,
    Return(Option<Expr>),
    If {
        cond: Expr,
        body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    For {
        init: Option<Expr>,
        cond: Option<Expr>,
        next: Option<Expr>,
        body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    DoWhile {
        body: Vec<Stmt>,
        cond: Expr,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    /// Visits every expression reachable from this statement in source order.
    pub fn walk_exprs<'a>(&'a self, visit: &mut dyn FnMut(&'a Expr)) {
        match &self.kind {
            StmtKind::Expression(expr) => expr.walk(visit),
            StmtKind::Break | StmtKind::Continue | StmtKind::Return(None) => {}
            StmtKind::Return(Some(expr)) => expr.walk(visit),
            StmtKind::If {
                cond,
                body,
                else_body,
            } => {
                cond.walk(visit);
                walk_body(body, visit);
                if let Some(else_body) = else_body {
                    walk_body(else_body, visit);
                }
            }
            StmtKind::For {
                init,
                cond,
                next,
                body,
            } => {
                for expr in [init, cond, next].into_iter().flatten() {
                    expr.walk(visit);
                }
                walk_body(body, visit);
            }
            StmtKind::While { cond, body } => {
                cond.walk(visit);
                walk_body(body, visit);
            }
            StmtKind::DoWhile { body, cond } => {
                walk_body(body, visit);
                cond.walk(visit);
            }
        }
    }
}

pub fn walk_body<'a>(body: &'a [Stmt], visit: &mut dyn FnMut(&'a Expr)) {
    for stmt in body {
        stmt.walk_exprs(visit);
    }
}
