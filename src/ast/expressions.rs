use std::fmt::Display;

use crate::Span;

use super::types::BaseType;

/// Identity of an expression or lvalue node; keys the side-tables the
/// later passes fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    /// The arithmetic applied before storing, if any.
    pub fn arithmetic(&self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Increment,
    Decrement,
}

impl IncDecOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            IncDecOp::Increment => "++",
            IncDecOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    LogicalOr,
    LogicalAnd,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::LogicalOr => "||",
            BinaryOp::LogicalAnd => "&&",
        }
    }

    /// Comparison and logical operators always produce `char`.
    pub fn yields_char(&self) -> bool {
        self.is_comparison() || self.is_logical()
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
                | BinaryOp::Less
                | BinaryOp::LessEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::LogicalOr | BinaryOp::LogicalAnd)
    }

    /// Operators only defined on the int family.
    pub fn is_bitwise(&self) -> bool {
        matches!(
            self,
            BinaryOp::Mod
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::ShiftLeft
                | BinaryOp::ShiftRight
        )
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An assignable storage reference: `name` or `name[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LValue {
    pub id: ExprId,
    pub name: String,
    pub index: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntConst(i32),
    RealConst(f32),
    /// The bytes of the literal, escapes resolved.
    StrConst(Vec<u8>),
    CharConst(u8),
    Identifier(String),
    Address(String),
    Index {
        name: String,
        index: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Assignment {
        lhs: LValue,
        op: AssignOp,
        rhs: Box<Expr>,
    },
    IncDec {
        operand: LValue,
        op: IncDecOp,
        is_prefix: bool,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        pos: Box<Expr>,
        neg: Box<Expr>,
    },
    Cast {
        target: BaseType,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(id: ExprId, kind: ExprKind, span: Span) -> Self {
        Expr { id, kind, span }
    }

    /// Visits this node and every nested expression, depth-first, left to right.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expr)) {
        visit(self);
        match &self.kind {
            ExprKind::IntConst(_)
            | ExprKind::RealConst(_)
            | ExprKind::StrConst(_)
            | ExprKind::CharConst(_)
            | ExprKind::Identifier(_)
            | ExprKind::Address(_) => {}
            ExprKind::Index { index, .. } => index.walk(visit),
            ExprKind::Call { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            ExprKind::Assignment { lhs, rhs, .. } => {
                if let Some(index) = &lhs.index {
                    index.walk(visit);
                }
                rhs.walk(visit);
            }
            ExprKind::IncDec { operand, .. } => {
                if let Some(index) = &operand.index {
                    index.walk(visit);
                }
            }
            ExprKind::Unary { operand, .. } | ExprKind::Cast { operand, .. } => operand.walk(visit),
            ExprKind::Binary { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            ExprKind::Ternary { cond, pos, neg } => {
                cond.walk(visit);
                pos.walk(visit);
                neg.walk(visit);
            }
        }
    }
}
