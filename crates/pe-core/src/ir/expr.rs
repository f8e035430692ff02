use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ConstValue, FunctionSig, Ty};
use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExprLiteral {
    pub value: ConstValue,
    /// `None` for untyped constants.
    pub ty: Option<Ty>,
    pub span: Span,
    pub typechecked: bool,
}

impl ExprLiteral {
    pub fn new(value: ConstValue) -> Self {
        Self {
            value,
            ty: None,
            span: Span::default(),
            typechecked: false,
        }
    }

    pub fn with_ty(mut self, ty: Ty) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// A reference to a runtime variable; its value is unknown at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExprVar {
    pub name: String,
    pub ty: Option<Ty>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExprCall {
    pub callee: Arc<FunctionSig>,
    pub args: Vec<Expr>,
    pub span: Span,
}

impl ExprCall {
    pub fn new(callee: Arc<FunctionSig>, args: Vec<Expr>) -> Self {
        Self {
            callee,
            args,
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "lowercase")]
pub enum Expr {
    Literal(ExprLiteral),
    Var(ExprVar),
    Call(ExprCall),
}

impl Expr {
    pub fn value(value: ConstValue) -> Self {
        Expr::Literal(ExprLiteral::new(value))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(ExprVar {
            name: name.into(),
            ty: None,
            span: Span::default(),
        })
    }

    pub fn call(callee: Arc<FunctionSig>, args: Vec<Expr>) -> Self {
        Expr::Call(ExprCall::new(callee, args))
    }

    pub fn as_literal(&self) -> Option<&ExprLiteral> {
        match self {
            Expr::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(lit) => lit.span,
            Expr::Var(var) => var.span,
            Expr::Call(call) => call.span,
        }
    }
}

impl From<ExprLiteral> for Expr {
    fn from(lit: ExprLiteral) -> Self {
        Expr::Literal(lit)
    }
}

impl From<ExprCall> for Expr {
    fn from(call: ExprCall) -> Self {
        Expr::Call(call)
    }
}
