//! Turning captured stdout into a typed literal.

use std::fmt::{Display, Formatter};

use pe_core::ir::{ConstKind, ConstValue, Expr, ExprLiteral, Ty};
use pe_core::span::Span;

use crate::config::EmptyOutputPolicy;
use crate::executor::ExecutionOutcome;

/// A typed literal ready to stand in for the call it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedConstant {
    pub value: ConstValue,
    pub ty: Ty,
    pub span: Span,
    pub typechecked: bool,
}

impl EvaluatedConstant {
    pub fn into_literal(self) -> ExprLiteral {
        ExprLiteral {
            value: self.value,
            ty: Some(self.ty),
            span: self.span,
            typechecked: self.typechecked,
        }
    }

    pub fn into_expr(self) -> Expr {
        Expr::Literal(self.into_literal())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeError {
    /// The execution itself failed; there is nothing to decode.
    NoOutput,
    Empty,
    NotUtf8,
    Malformed { kind: ConstKind, text: String },
    NonFinite(String),
    UnsupportedType(Ty),
}

impl Display for MaterializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterializeError::NoOutput => write!(f, "execution produced no outcome"),
            MaterializeError::Empty => write!(f, "program printed nothing"),
            MaterializeError::NotUtf8 => write!(f, "output is not valid UTF-8"),
            MaterializeError::Malformed { kind, text } => {
                write!(f, "cannot read {:?} as {}", text, kind)
            }
            MaterializeError::NonFinite(text) => write!(f, "non-finite float {}", text),
            MaterializeError::UnsupportedType(ty) => {
                write!(f, "results of type {} cannot be materialized", ty)
            }
        }
    }
}

/// Decode the captured stdout of a successful run as a constant of type `ret`.
///
/// Strings take stdout verbatim; numbers and booleans tolerate surrounding
/// ASCII whitespace. Empty stdout is rejected unless `policy` accepts it as an
/// empty string result.
pub fn materialize(
    outcome: &ExecutionOutcome,
    ret: &Ty,
    span: Span,
    policy: EmptyOutputPolicy,
) -> Result<EvaluatedConstant, MaterializeError> {
    let ExecutionOutcome::Captured(captured) = outcome else {
        return Err(MaterializeError::NoOutput);
    };
    let Some(kind) = ret.const_kind() else {
        return Err(MaterializeError::UnsupportedType(ret.clone()));
    };

    let stdout = &captured.stdout;
    if stdout.is_empty() {
        let accept =
            policy == EmptyOutputPolicy::AcceptEmptyString && kind == ConstKind::String;
        if !accept {
            return Err(MaterializeError::Empty);
        }
    }

    let text = std::str::from_utf8(stdout).map_err(|_| MaterializeError::NotUtf8)?;
    let value = decode(kind, text)?;
    Ok(EvaluatedConstant {
        value,
        ty: ret.clone(),
        span,
        typechecked: true,
    })
}

fn decode(kind: ConstKind, text: &str) -> Result<ConstValue, MaterializeError> {
    let malformed = || MaterializeError::Malformed {
        kind,
        text: text.to_string(),
    };
    let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
    match kind {
        ConstKind::String => Ok(ConstValue::string(text)),
        ConstKind::Int => trimmed
            .parse::<i64>()
            .map(ConstValue::int)
            .map_err(|_| malformed()),
        ConstKind::Float => {
            let value = trimmed.parse::<f64>().map_err(|_| malformed())?;
            if !value.is_finite() {
                return Err(MaterializeError::NonFinite(trimmed.to_string()));
            }
            Ok(ConstValue::float(value))
        }
        ConstKind::Bool => match trimmed {
            "true" => Ok(ConstValue::bool(true)),
            "false" => Ok(ConstValue::bool(false)),
            _ => Err(malformed()),
        },
    }
}
