use log::{debug, info, trace};

use crate::{
    ast::{
        ast::{Function, FunctionId, Program, Variable},
        expressions::{Expr, ExprKind, LValue, UnaryOp},
        statements::{Stmt, StmtKind},
        types::{BaseType, Type},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::annotations::{Annotations, VarRef};

/// State of one type-checking run over a program.
pub struct TypeChecker<'a> {
    pub program: &'a Program,
    /// The function whose body is being checked.
    pub function: Option<FunctionId>,
    pub annotations: Annotations,
    pub verbose: bool,
}

impl<'a> TypeChecker<'a> {
    pub fn new(program: &'a Program, verbose: bool) -> Self {
        TypeChecker {
            program,
            function: None,
            annotations: Annotations::new(),
            verbose,
        }
    }

    pub fn current_function(&self) -> Option<&'a Function> {
        let program = self.program;
        self.function.map(|id| program.function(id))
    }

    /// Resolves a name against the enclosing function first, then globals.
    pub fn fetch_variable(
        &self,
        name: &str,
        position: &Position,
    ) -> Result<(VarRef, &'a Variable), Error> {
        if let (Some(id), Some(function)) = (self.function, self.current_function()) {
            if let Some(index) = function.scope.variable_index(name) {
                return Ok((VarRef::Local(id, index), &function.scope.variables[index]));
            }
        }

        let program = self.program;
        let globals = &program.scope;
        match globals.variable_index(name) {
            Some(index) => Ok((VarRef::Global(index), &globals.variables[index])),
            None => Err(Error::new(
                ErrorImpl::UnknownVariable {
                    name: name.to_string(),
                },
                position.clone(),
            )),
        }
    }

    pub fn fetch_function(
        &self,
        name: &str,
        position: &Position,
    ) -> Result<(FunctionId, &'a Function), Error> {
        let program = self.program;
        match program.scope.function_index(name) {
            Some(id) => Ok((id, program.function(id))),
            None => Err(Error::new(
                ErrorImpl::UnknownFunction {
                    name: name.to_string(),
                },
                position.clone(),
            )),
        }
    }

    fn record(&mut self, expr: &Expr, ty: Type) -> Type {
        if self.verbose {
            info!("{}: expression {:?} has type {}", expr.span.start, expr.id, ty);
        } else {
            trace!("{:?} : {}", expr.id, ty);
        }
        self.annotations.record_type(expr.id, ty);
        ty
    }
}

fn numeric_index(
    type_checker: &mut TypeChecker,
    index: &Expr,
    allow_float: bool,
) -> Result<(), Error> {
    let ty = type_check_expr(type_checker, index)?;
    let valid = ty == Type::INT || (allow_float && ty == Type::FLOAT);

    if !valid {
        return Err(Error::new(
            ErrorImpl::InvalidIndexType {
                found: ty.to_string(),
            },
            index.span.start.clone(),
        ));
    }
    Ok(())
}

fn array_variable<'a>(
    type_checker: &TypeChecker<'a>,
    name: &str,
    position: &Position,
) -> Result<(VarRef, &'a Variable), Error> {
    let (var, variable) = type_checker.fetch_variable(name, position)?;
    if !variable.name.is_array {
        return Err(Error::new(
            ErrorImpl::NotIndexable {
                name: name.to_string(),
            },
            position.clone(),
        ));
    }
    Ok((var, variable))
}

/// Resolves an assignment target. Element targets need an `int` index.
pub fn type_check_lvalue(type_checker: &mut TypeChecker, lvalue: &LValue) -> Result<Type, Error> {
    let position = &lvalue.span.start;

    let (var, ty) = match &lvalue.index {
        None => {
            let (var, variable) = type_checker.fetch_variable(&lvalue.name, position)?;
            (var, variable.ty())
        }
        Some(index) => {
            let (var, variable) = array_variable(type_checker, &lvalue.name, position)?;
            numeric_index(type_checker, index, false)?;
            (var, variable.ty().element())
        }
    };

    type_checker.annotations.record_variable(lvalue.id, var);
    type_checker.annotations.record_type(lvalue.id, ty);
    Ok(ty)
}

fn check_call(
    type_checker: &mut TypeChecker,
    expr: &Expr,
    name: &str,
    args: &[Expr],
) -> Result<Type, Error> {
    let (id, function) = type_checker.fetch_function(name, &expr.span.start)?;

    if args.len() != function.param_count() {
        return Err(Error::new(
            ErrorImpl::ArityMismatch {
                function: name.to_string(),
                expected: function.param_count(),
                received: args.len(),
            },
            expr.span.start.clone(),
        ));
    }

    for (position, (arg, expected)) in args.iter().zip(function.param_types()).enumerate() {
        let found = type_check_expr(type_checker, arg)?;
        if found != expected {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMismatch {
                    function: name.to_string(),
                    position: position + 1,
                    expected: expected.to_string(),
                    found: found.to_string(),
                },
                arg.span.start.clone(),
            ));
        }
    }

    type_checker.annotations.record_call(expr.id, id);
    Ok(function.return_type())
}

fn require_numeric(ty: Type, operator: &str, position: &Position) -> Result<(), Error> {
    if ty.is_numeric() {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::InvalidOperandType {
                operator: operator.to_string(),
                found: ty.to_string(),
            },
            position.clone(),
        ))
    }
}

fn require_condition(ty: Type, position: &Position) -> Result<(), Error> {
    if ty.is_numeric() {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::InvalidConditionType {
                found: ty.to_string(),
            },
            position.clone(),
        ))
    }
}

fn reject_float(ty: Type, operator: &str, position: &Position) -> Result<(), Error> {
    if ty.base.is_float() {
        return Err(Error::new(
            ErrorImpl::InvalidBitwiseOperand {
                operator: operator.to_string(),
                found: ty.to_string(),
            },
            position.clone(),
        ));
    }
    Ok(())
}

pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &Expr) -> Result<Type, Error> {
    let position = &expr.span.start;

    let ty = match &expr.kind {
        ExprKind::IntConst(_) => Type::INT,
        ExprKind::RealConst(_) => Type::FLOAT,
        ExprKind::StrConst(_) => Type::array(BaseType::Char),
        ExprKind::CharConst(_) => Type::CHAR,
        ExprKind::Identifier(name) => {
            let (var, variable) = type_checker.fetch_variable(name, position)?;
            type_checker.annotations.record_variable(expr.id, var);
            variable.ty()
        }
        ExprKind::Address(name) => {
            let (var, variable) = type_checker.fetch_variable(name, position)?;
            if variable.name.is_array {
                return Err(Error::new(
                    ErrorImpl::CannotAddressArray { name: name.clone() },
                    position.clone(),
                ));
            }
            type_checker.annotations.record_variable(expr.id, var);
            Type::array(variable.base_type)
        }
        ExprKind::Index { name, index } => {
            let (var, variable) = array_variable(type_checker, name, position)?;
            numeric_index(type_checker, index, true)?;
            type_checker.annotations.record_variable(expr.id, var);
            variable.ty().element()
        }
        ExprKind::Call { name, args } => check_call(type_checker, expr, name, args)?,
        ExprKind::Assignment { lhs, rhs, .. } => {
            let expected = type_check_lvalue(type_checker, lhs)?;
            let found = type_check_expr(type_checker, rhs)?;

            if expected != found {
                return Err(Error::new(
                    ErrorImpl::TypeMismatch {
                        expected: expected.to_string(),
                        found: found.to_string(),
                    },
                    position.clone(),
                ));
            }
            if !expected.is_numeric() {
                return Err(Error::new(
                    ErrorImpl::InvalidAssignmentType {
                        found: expected.to_string(),
                    },
                    position.clone(),
                ));
            }
            expected
        }
        ExprKind::IncDec { operand, op, .. } => {
            let ty = type_check_lvalue(type_checker, operand)?;
            require_numeric(ty, op.symbol(), position)?;
            ty
        }
        ExprKind::Unary { op, operand } => {
            let ty = type_check_expr(type_checker, operand)?;
            require_numeric(ty, op.symbol(), position)?;

            match op {
                UnaryOp::Negate => ty,
                UnaryOp::Not => Type::CHAR,
                UnaryOp::BitNot => {
                    reject_float(ty, op.symbol(), position)?;
                    ty
                }
            }
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let left = type_check_expr(type_checker, lhs)?;
            let right = type_check_expr(type_checker, rhs)?;
            require_numeric(left, op.symbol(), &lhs.span.start)?;
            require_numeric(right, op.symbol(), &rhs.span.start)?;

            if left != right {
                return Err(Error::new(
                    ErrorImpl::OperandTypeMismatch {
                        operator: op.symbol().to_string(),
                        left: left.to_string(),
                        right: right.to_string(),
                    },
                    position.clone(),
                ));
            }
            if op.is_bitwise() {
                reject_float(left, op.symbol(), position)?;
            }

            if op.yields_char() {
                Type::CHAR
            } else {
                left
            }
        }
        ExprKind::Ternary { cond, pos, neg } => {
            let cond_ty = type_check_expr(type_checker, cond)?;
            require_condition(cond_ty, &cond.span.start)?;

            let positive = type_check_expr(type_checker, pos)?;
            let negative = type_check_expr(type_checker, neg)?;
            if positive != negative {
                return Err(Error::new(
                    ErrorImpl::BranchTypeMismatch {
                        positive: positive.to_string(),
                        negative: negative.to_string(),
                    },
                    position.clone(),
                ));
            }
            positive
        }
        ExprKind::Cast { target, operand } => {
            let from = type_check_expr(type_checker, operand)?;
            let to = Type::scalar(*target);

            if !from.is_numeric() || !to.is_numeric() {
                return Err(Error::new(
                    ErrorImpl::InvalidCast {
                        from: from.to_string(),
                        to: to.to_string(),
                    },
                    position.clone(),
                ));
            }
            to
        }
    };

    Ok(type_checker.record(expr, ty))
}

fn type_check_body(type_checker: &mut TypeChecker, body: &[Stmt]) -> Result<(), Error> {
    for stmt in body {
        type_check_stmt(type_checker, stmt)?;
    }
    Ok(())
}

fn type_check_condition(type_checker: &mut TypeChecker, cond: &Expr) -> Result<(), Error> {
    let ty = type_check_expr(type_checker, cond)?;
    require_condition(ty, &cond.span.start)
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) -> Result<(), Error> {
    match &stmt.kind {
        StmtKind::Expression(expr) => {
            type_check_expr(type_checker, expr)?;
        }
        StmtKind::Break | StmtKind::Continue => {}
        StmtKind::Return(value) => {
            let Some(function) = type_checker.current_function() else {
                return Ok(());
            };
            let expected = function.return_type();
            let position = &stmt.span.start;

            match value {
                Some(value) => {
                    let found = type_check_expr(type_checker, value)?;
                    if expected.is_void() {
                        return Err(Error::new(
                            ErrorImpl::VoidReturnMismatch {
                                function: function.name.clone(),
                            },
                            position.clone(),
                        ));
                    }
                    if found != expected {
                        return Err(Error::new(
                            ErrorImpl::ReturnTypeMismatch {
                                function: function.name.clone(),
                                expected: expected.to_string(),
                                found: found.to_string(),
                            },
                            position.clone(),
                        ));
                    }
                }
                None if !expected.is_void() => {
                    return Err(Error::new(
                        ErrorImpl::MissingReturnValue {
                            function: function.name.clone(),
                            expected: expected.to_string(),
                        },
                        position.clone(),
                    ));
                }
                None => {}
            }
        }
        StmtKind::If {
            cond,
            body,
            else_body,
        } => {
            type_check_condition(type_checker, cond)?;
            type_check_body(type_checker, body)?;
            if let Some(else_body) = else_body {
                type_check_body(type_checker, else_body)?;
            }
        }
        StmtKind::For {
            init,
            cond,
            next,
            body,
        } => {
            if let Some(init) = init {
                type_check_expr(type_checker, init)?;
            }
            if let Some(cond) = cond {
                type_check_condition(type_checker, cond)?;
            }
            if let Some(next) = next {
                type_check_expr(type_checker, next)?;
            }
            type_check_body(type_checker, body)?;
        }
        StmtKind::While { cond, body } => {
            type_check_condition(type_checker, cond)?;
            type_check_body(type_checker, body)?;
        }
        StmtKind::DoWhile { body, cond } => {
            type_check_body(type_checker, body)?;
            type_check_condition(type_checker, cond)?;
        }
    }

    Ok(())
}

pub fn type_check_function(type_checker: &mut TypeChecker, id: FunctionId) -> Result<(), Error> {
    let program = type_checker.program;
    let function = program.function(id);
    debug!("checking function {}", function.name);

    type_checker.function = Some(id);
    let result = type_check_body(type_checker, &function.body);
    type_checker.function = None;
    result
}

/// Checks every function body of the program.
///
/// Fails on the first error, in source order. Running it twice on the
/// same program yields identical annotations.
pub fn type_check(program: &Program, verbose: bool) -> Result<Annotations, Error> {
    let mut type_checker = TypeChecker::new(program, verbose);

    for (id, function) in program.user_functions() {
        if function.defined {
            type_check_function(&mut type_checker, id)?;
        }
    }

    info!(
        "type checked {} expressions",
        type_checker.annotations.len()
    );
    Ok(type_checker.annotations)
}
