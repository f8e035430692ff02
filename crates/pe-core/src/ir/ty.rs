use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::ConstKind;

/// Coarse classification of a host type, as far as the evaluator cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    String,
    Int,
    Float,
    Bool,
    /// Composite, named, pointer and every other type the evaluator cannot handle.
    Other,
}

impl TypeKind {
    pub fn const_kind(self) -> Option<ConstKind> {
        match self {
            TypeKind::String => Some(ConstKind::String),
            TypeKind::Int => Some(ConstKind::Int),
            TypeKind::Float => Some(ConstKind::Float),
            TypeKind::Bool => Some(ConstKind::Bool),
            TypeKind::Other => None,
        }
    }
}

/// A host type: the spelled name plus its kind.
///
/// The name is kept so a materialized literal carries exactly the call's
/// declared return type (`int32`, not just "some integer").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ty {
    pub name: String,
    pub kind: TypeKind,
}

impl Ty {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn string() -> Self {
        Self::new("string", TypeKind::String)
    }

    pub fn int() -> Self {
        Self::new("int", TypeKind::Int)
    }

    pub fn float64() -> Self {
        Self::new("float64", TypeKind::Float)
    }

    pub fn bool() -> Self {
        Self::new("bool", TypeKind::Bool)
    }

    /// Classify a predeclared Go type name. Anything else is `Other`.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = match name.as_str() {
            "string" => TypeKind::String,
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
            | "uint32" | "uint64" | "uintptr" | "byte" | "rune" => TypeKind::Int,
            "float32" | "float64" => TypeKind::Float,
            "bool" => TypeKind::Bool,
            _ => TypeKind::Other,
        };
        Self { name, kind }
    }

    pub fn const_kind(&self) -> Option<ConstKind> {
        self.kind.const_kind()
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
