use crate::{compiler::stdlib::register_builtins, errors::errors::Error, Span};

use super::{
    scope::Scope,
    statements::Stmt,
    types::{BaseType, Type},
};

/// Index of a function in the global scope's function table.
pub type FunctionId = usize;

/// A declared name, optionally with an array suffix.
///
/// `array_size` is `None` for unsized array parameters (`int a[]`).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableName {
    pub name: String,
    pub is_array: bool,
    pub array_size: Option<u32>,
    pub span: Span,
}

impl VariableName {
    pub fn scalar(name: &str, span: Span) -> Self {
        VariableName {
            name: name.to_string(),
            is_array: false,
            array_size: None,
            span,
        }
    }

    pub fn array(name: &str, array_size: Option<u32>, span: Span) -> Self {
        VariableName {
            name: name.to_string(),
            is_array: true,
            array_size,
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub base_type: BaseType,
    pub name: VariableName,
    pub span: Span,
}

impl Variable {
    pub fn new(base_type: BaseType, name: VariableName) -> Self {
        let span = name.span.clone();
        Variable {
            base_type,
            name,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name.name
    }

    pub fn ty(&self) -> Type {
        Type {
            base: self.base_type,
            is_array: self.name.is_array,
        }
    }

    /// Whether the variable owns array storage, as opposed to an array
    /// parameter whose slot holds the caller's address.
    pub fn has_array_storage(&self) -> bool {
        self.name.is_array && self.name.array_size.is_some()
    }

    /// Number of 4-byte words the variable occupies.
    pub fn storage_slots(&self) -> usize {
        match self.name.array_size {
            Some(size) if self.name.is_array => {
                (size as usize * self.base_type.width()).div_ceil(4)
            }
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub ret_type: BaseType,
    pub params: Scope,
    /// Parameters followed by locals.
    pub scope: Scope,
    pub body: Vec<Stmt>,
    pub defined: bool,
    pub builtin: bool,
    pub span: Span,
}

impl Function {
    /// A prototype: signature only, no body.
    pub fn declaration(span: Span, ret_type: BaseType, name: &str, params: Scope) -> Self {
        Function {
            name: name.to_string(),
            ret_type,
            scope: params.clone(),
            params,
            body: vec![],
            defined: false,
            builtin: false,
            span,
        }
    }

    /// A full definition. Fails if a local collides with a parameter.
    pub fn definition(
        span: Span,
        ret_type: BaseType,
        name: &str,
        params: Scope,
        locals: Scope,
        body: Vec<Stmt>,
    ) -> Result<Self, Error> {
        let scope = Scope::merged(&params, locals)?;

        Ok(Function {
            name: name.to_string(),
            ret_type,
            params,
            scope,
            body,
            defined: true,
            builtin: false,
            span,
        })
    }

    pub fn builtin(name: &str, ret_type: BaseType, params: Scope) -> Self {
        Function {
            builtin: true,
            defined: true,
            ..Function::declaration(Span::null(), ret_type, name, params)
        }
    }

    pub fn return_type(&self) -> Type {
        Type::scalar(self.ret_type)
    }

    pub fn param_count(&self) -> usize {
        self.params.variables.len()
    }

    pub fn param_types(&self) -> Vec<Type> {
        self.params.variables.iter().map(Variable::ty).collect()
    }

    pub fn locals(&self) -> &[Variable] {
        &self.scope.variables[self.param_count()..]
    }
}

/// The root of the tree: the global scope holding globals and functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub scope: Scope,
    pub span: Span,
}

impl Program {
    /// An empty program with the builtin functions registered.
    pub fn new(span: Span) -> Self {
        let mut scope = Scope::new();
        register_builtins(&mut scope);
        Program { scope, span }
    }

    pub fn push_globals(&mut self, globals: Scope) -> Result<(), Error> {
        self.scope.merge(globals)
    }

    pub fn push_function(&mut self, function: Function) -> Result<FunctionId, Error> {
        self.scope.declare_function(function)
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.scope.functions[id]
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.scope.functions.iter().enumerate()
    }

    pub fn user_functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions().filter(|(_, f)| !f.builtin)
    }

    pub fn globals(&self) -> &[Variable] {
        &self.scope.variables
    }
}
