//! Type system definitions for the AST.
//!
//! The language only knows four base types (`void`, `char`, `int`, `float`)
//! and single-dimension arrays of the three scalar ones. A `Type` is the pair
//! of a base type and an array flag; there is no array-of-array.

use std::fmt::Display;

/// Represents the scalar kinds of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Void,
    Char,
    Int,
    Float,
}

impl BaseType {
    pub fn from_name(name: &str) -> Option<BaseType> {
        match name {
            "void" => Some(BaseType::Void),
            "char" => Some(BaseType::Char),
            "int" => Some(BaseType::Int),
            "float" => Some(BaseType::Float),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BaseType::Void => "void",
            BaseType::Char => "char",
            BaseType::Int => "int",
            BaseType::Float => "float",
        }
    }

    /// One-byte instruction suffix: the first character of the type name.
    pub fn tag(&self) -> char {
        self.name().as_bytes()[0] as char
    }

    /// Size of one element in bytes.
    pub fn width(&self) -> usize {
        match self {
            BaseType::Void => 0,
            BaseType::Char => 1,
            BaseType::Int | BaseType::Float => 4,
        }
    }

    pub fn is_float(&self) -> bool {
        *self == BaseType::Float
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The static type of an expression or variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type {
    pub base: BaseType,
    pub is_array: bool,
}

impl Type {
    pub const VOID: Type = Type::scalar(BaseType::Void);
    pub const CHAR: Type = Type::scalar(BaseType::Char);
    pub const INT: Type = Type::scalar(BaseType::Int);
    pub const FLOAT: Type = Type::scalar(BaseType::Float);

    pub const fn scalar(base: BaseType) -> Type {
        Type {
            base,
            is_array: false,
        }
    }

    pub const fn array(base: BaseType) -> Type {
        Type {
            base,
            is_array: true,
        }
    }

    /// `char`, `int` or `float`: the types conditions, casts and
    /// assignments accept.
    pub fn is_numeric(&self) -> bool {
        !self.is_array && self.base != BaseType::Void
    }

    pub fn is_void(&self) -> bool {
        *self == Type::VOID
    }

    /// The unindexed element type of an array.
    pub fn element(&self) -> Type {
        Type::scalar(self.base)
    }

    pub fn tag(&self) -> char {
        self.base.tag()
    }
}

impl From<BaseType> for Type {
    fn from(base: BaseType) -> Self {
        Type::scalar(base)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_array {
            write!(f, "{}[]", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}
