use log::trace;

use crate::errors::errors::{Error, ErrorImpl, SignatureDifference};

use super::ast::{Function, FunctionId, Variable};

/// A flat, insertion-ordered symbol table for one lexical region.
///
/// Variable order is allocation order. Names are unique across both
/// variables and functions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub variables: Vec<Variable>,
    pub functions: Vec<Function>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Builds a scope from declarations, failing on the first clash.
    pub fn from_variables(variables: Vec<Variable>) -> Result<Self, Error> {
        let mut scope = Scope::new();
        for variable in variables {
            scope.declare_variable(variable)?;
        }
        Ok(scope)
    }

    pub fn declare_variable(&mut self, variable: Variable) -> Result<usize, Error> {
        if let Some(existing) = self.lookup_variable(variable.name()) {
            return Err(Error::new(
                ErrorImpl::DuplicateName {
                    name: variable.name().to_string(),
                    previous: existing.span.start.clone(),
                },
                variable.span.start.clone(),
            ));
        }

        if let Some(existing) = self.lookup_function(variable.name()) {
            return Err(Error::new(
                ErrorImpl::NameConflict {
                    name: variable.name().to_string(),
                    existing: "function",
                    previous: existing.span.start.clone(),
                },
                variable.span.start.clone(),
            ));
        }

        trace!("declared variable {}", variable.name());
        self.variables.push(variable);
        Ok(self.variables.len() - 1)
    }

    /// Declares or defines a function.
    ///
    /// A repeated name must agree with the stored signature. A definition
    /// completes an earlier prototype in place; the entry is never
    /// duplicated.
    pub fn declare_function(&mut self, function: Function) -> Result<FunctionId, Error> {
        if let Some(existing) = self.lookup_variable(&function.name) {
            return Err(Error::new(
                ErrorImpl::NameConflict {
                    name: function.name.clone(),
                    existing: "variable",
                    previous: existing.span.start.clone(),
                },
                function.span.start.clone(),
            ));
        }

        let Some(id) = self.function_index(&function.name) else {
            trace!("declared function {}", function.name);
            self.functions.push(function);
            return Ok(self.functions.len() - 1);
        };

        let existing = &mut self.functions[id];
        let mismatch = |difference| {
            Error::new(
                ErrorImpl::SignatureMismatch {
                    name: function.name.clone(),
                    difference,
                    previous: existing.span.start.clone(),
                },
                function.span.start.clone(),
            )
        };

        let previous = existing.param_types();
        let current = function.param_types();
        if previous.len() != current.len() {
            return Err(mismatch(SignatureDifference::ParameterCount {
                previous: previous.len(),
            }));
        }

        for (parameter, (before, now)) in previous.iter().zip(current.iter()).enumerate() {
            if before != now {
                return Err(mismatch(SignatureDifference::ParameterType {
                    parameter: parameter + 1,
                    previous: before.to_string(),
                }));
            }
        }

        if existing.ret_type != function.ret_type {
            return Err(mismatch(SignatureDifference::ReturnType {
                previous: existing.ret_type.to_string(),
            }));
        }

        if existing.defined && function.defined {
            return Err(Error::new(
                ErrorImpl::Redefinition {
                    name: function.name.clone(),
                    previous: existing.span.start.clone(),
                },
                function.span.start.clone(),
            ));
        }

        if function.defined {
            trace!("defined previously declared function {}", function.name);
            existing.params = function.params;
            existing.scope = function.scope;
            existing.body = function.body;
            existing.span = function.span;
            existing.defined = true;
        }

        Ok(id)
    }

    /// Adds every declaration of `other` to this scope.
    pub fn merge(&mut self, other: Scope) -> Result<(), Error> {
        for variable in other.variables {
            self.declare_variable(variable)?;
        }

        for function in other.functions {
            self.declare_function(function)?;
        }

        Ok(())
    }

    /// The union of two scopes, leaving `first` untouched.
    pub fn merged(first: &Scope, second: Scope) -> Result<Scope, Error> {
        let mut scope = first.clone();
        scope.merge(second)?;
        Ok(scope)
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    pub fn lookup_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name() == name)
    }

    pub fn function_index(&self, name: &str) -> Option<FunctionId> {
        self.functions.iter().position(|f| f.name == name)
    }
}
