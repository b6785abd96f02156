use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// The human-readable message, without location.
    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Syntax,
            ErrorImpl::UnknownVariable { .. }
            | ErrorImpl::UnknownFunction { .. }
            | ErrorImpl::DuplicateName { .. }
            | ErrorImpl::NameConflict { .. }
            | ErrorImpl::SignatureMismatch { .. }
            | ErrorImpl::Redefinition { .. } => ErrorKind::NameResolution,
            ErrorImpl::NotIndexable { .. }
            | ErrorImpl::InvalidIndexType { .. }
            | ErrorImpl::CannotAddressArray { .. }
            | ErrorImpl::ArgumentTypeMismatch { .. }
            | ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::InvalidAssignmentType { .. }
            | ErrorImpl::InvalidOperandType { .. }
            | ErrorImpl::InvalidBitwiseOperand { .. }
            | ErrorImpl::OperandTypeMismatch { .. }
            | ErrorImpl::InvalidConditionType { .. }
            | ErrorImpl::BranchTypeMismatch { .. }
            | ErrorImpl::InvalidCast { .. }
            | ErrorImpl::VoidReturnMismatch { .. }
            | ErrorImpl::MissingReturnValue { .. }
            | ErrorImpl::ReturnTypeMismatch { .. } => ErrorKind::Type,
            ErrorImpl::ArityMismatch { .. } => ErrorKind::Arity,
            ErrorImpl::NotImplemented { .. }
            | ErrorImpl::OutsideLoop { .. }
            | ErrorImpl::UndefinedFunction { .. }
            | ErrorImpl::MissingAnnotation { .. } => ErrorKind::Codegen,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownVariable { .. } => "UnknownVariable",
            ErrorImpl::UnknownFunction { .. } => "UnknownFunction",
            ErrorImpl::DuplicateName { .. } => "DuplicateName",
            ErrorImpl::NameConflict { .. } => "NameConflict",
            ErrorImpl::SignatureMismatch { .. } => "SignatureMismatch",
            ErrorImpl::Redefinition { .. } => "Redefinition",
            ErrorImpl::NotIndexable { .. } => "NotIndexable",
            ErrorImpl::InvalidIndexType { .. } => "InvalidIndexType",
            ErrorImpl::CannotAddressArray { .. } => "CannotAddressArray",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::InvalidAssignmentType { .. } => "InvalidAssignmentType",
            ErrorImpl::InvalidOperandType { .. } => "InvalidOperandType",
            ErrorImpl::InvalidBitwiseOperand { .. } => "InvalidBitwiseOperand",
            ErrorImpl::OperandTypeMismatch { .. } => "OperandTypeMismatch",
            ErrorImpl::InvalidConditionType { .. } => "InvalidConditionType",
            ErrorImpl::BranchTypeMismatch { .. } => "BranchTypeMismatch",
            ErrorImpl::InvalidCast { .. } => "InvalidCast",
            ErrorImpl::VoidReturnMismatch { .. } => "VoidReturnMismatch",
            ErrorImpl::MissingReturnValue { .. } => "MissingReturnValue",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::NotImplemented { .. } => "NotImplemented",
            ErrorImpl::OutsideLoop { .. } => "OutsideLoop",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::MissingAnnotation { .. } => "MissingAnnotation",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::NotImplemented { .. } => ErrorTip::Suggestion(String::from(
                "This feature is expected to be handled, but has not yet been implemented",
            )),
            ErrorImpl::CannotAddressArray { name } => ErrorTip::Suggestion(format!(
                "`{}` already evaluates to its address",
                name
            )),
            _ => ErrorTip::Suggestion(self.internal_error.to_string()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

impl std::error::Error for Error {}

/// Broad category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    NameResolution,
    Type,
    Arity,
    Codegen,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// How a redeclared function differs from the earlier declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureDifference {
    ParameterCount { previous: usize },
    ParameterType { parameter: usize, previous: String },
    ReturnType { previous: String },
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    #[error("unknown variable name '{name}'")]
    UnknownVariable { name: String },
    #[error("unknown function name '{name}'")]
    UnknownFunction { name: String },
    #[error("multiple definition of variable {name}; previously defined at {previous}")]
    DuplicateName { name: String, previous: Position },
    #[error("{name} already defined as a {existing} at {previous}")]
    NameConflict {
        name: String,
        existing: &'static str,
        previous: Position,
    },
    #[error("{}", signature_message(.name, .difference, .previous))]
    SignatureMismatch {
        name: String,
        difference: SignatureDifference,
        previous: Position,
    },
    #[error("multiple definition of {name}; previously defined at {previous}")]
    Redefinition { name: String, previous: Position },

    #[error("'{name}' is not an array")]
    NotIndexable { name: String },
    #[error("invalid array index type {found}")]
    InvalidIndexType { found: String },
    #[error("cannot take the address of array '{name}'")]
    CannotAddressArray { name: String },
    #[error("argument {position} to '{function}' has type {found}; expected {expected}")]
    ArgumentTypeMismatch {
        function: String,
        position: usize,
        expected: String,
        found: String,
    },
    #[error("cannot assign {found} to {expected} lvalue")]
    TypeMismatch { expected: String, found: String },
    #[error("cannot assign to lvalue of type {found}")]
    InvalidAssignmentType { found: String },
    #[error("invalid operand type {found} for '{operator}'")]
    InvalidOperandType { operator: String, found: String },
    #[error("invalid operand type {found} for bitwise operator '{operator}'")]
    InvalidBitwiseOperand { operator: String, found: String },
    #[error("mismatched operand types {left} and {right} for '{operator}'")]
    OperandTypeMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("invalid condition type {found}")]
    InvalidConditionType { found: String },
    #[error("mismatched branch types {positive} and {negative}")]
    BranchTypeMismatch { positive: String, negative: String },
    #[error("cannot cast {from} to {to}")]
    InvalidCast { from: String, to: String },
    #[error("cannot return a value from void function '{function}'")]
    VoidReturnMismatch { function: String },
    #[error("function '{function}' must return a value of type {expected}")]
    MissingReturnValue { function: String, expected: String },
    #[error("cannot return {found} from function '{function}' returning {expected}")]
    ReturnTypeMismatch {
        function: String,
        expected: String,
        found: String,
    },

    #[error("incorrect number of arguments to '{function}'; expected {expected}, got {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },

    #[error("{feature} is not implemented")]
    NotImplemented { feature: String },
    #[error("'{statement}' outside of a loop")]
    OutsideLoop { statement: String },
    #[error("function '{function}' declared but never defined")]
    UndefinedFunction { function: String },
    #[error("no {what} recorded for this expression; run the type checker first")]
    MissingAnnotation { what: &'static str },
}

fn signature_message(name: &str, difference: &SignatureDifference, previous: &Position) -> String {
    match difference {
        SignatureDifference::ParameterCount { previous: count } => format!(
            "{} already declared with {} arguments at {}",
            name, count, previous
        ),
        SignatureDifference::ParameterType {
            parameter,
            previous: ty,
        } => format!(
            "{} declared with different type {} for parameter {} at {}",
            name, ty, parameter, previous
        ),
        SignatureDifference::ReturnType { previous: ty } => format!(
            "{} was already declared with return type {} at {}",
            name, ty, previous
        ),
    }
}
