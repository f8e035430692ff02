use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::Ty;

/// Qualified reference to a function: owning module path plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRef {
    pub module_path: String,
    pub name: String,
}

impl FunctionRef {
    pub fn new(module_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            name: name.into(),
        }
    }
}

impl Display for FunctionRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module_path, self.name)
    }
}

/// Purity as established by the host's annotation handling.
///
/// `Asserted` is a promise made by the author of the function. It is trusted,
/// never verified: the evaluator runs the function out of process on that
/// promise alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purity {
    #[default]
    Unannotated,
    Asserted,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Resolved signature of a callee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSig {
    pub func: FunctionRef,
    pub params: Vec<Param>,
    pub ret: Ty,
    #[serde(default)]
    pub purity: Purity,
}

impl FunctionSig {
    pub fn new(func: FunctionRef, params: Vec<Param>, ret: Ty) -> Self {
        Self {
            func,
            params,
            ret,
            purity: Purity::Unannotated,
        }
    }

    pub fn with_purity(mut self, purity: Purity) -> Self {
        self.purity = purity;
        self
    }

    pub fn pure(self) -> Self {
        self.with_purity(Purity::Asserted)
    }

    pub fn is_pure(&self) -> bool {
        self.purity == Purity::Asserted
    }
}
