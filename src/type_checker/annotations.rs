use std::collections::HashMap;

use crate::ast::{ast::FunctionId, expressions::ExprId, types::Type};

/// Where a name resolved to: a global slot or a variable of a function's
/// combined parameter/local scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRef {
    Global(usize),
    Local(FunctionId, usize),
}

/// Results of type checking, keyed by expression id.
///
/// Later passes read these instead of mutating the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    types: HashMap<ExprId, Type>,
    variables: HashMap<ExprId, VarRef>,
    calls: HashMap<ExprId, FunctionId>,
}

impl Annotations {
    pub fn new() -> Self {
        Annotations::default()
    }

    pub fn record_type(&mut self, id: ExprId, ty: Type) {
        self.types.insert(id, ty);
    }

    pub fn record_variable(&mut self, id: ExprId, var: VarRef) {
        self.variables.insert(id, var);
    }

    pub fn record_call(&mut self, id: ExprId, function: FunctionId) {
        self.calls.insert(id, function);
    }

    pub fn type_of(&self, id: ExprId) -> Option<Type> {
        self.types.get(&id).copied()
    }

    pub fn variable(&self, id: ExprId) -> Option<VarRef> {
        self.variables.get(&id).copied()
    }

    pub fn call_target(&self, id: ExprId) -> Option<FunctionId> {
        self.calls.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
