//! Describing a call on the command line or in a JSON call document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use pe_core::ir::{
    ConstValue, Expr, ExprCall, ExprLiteral, ExprVar, FunctionRef, FunctionSig, Param, Purity,
    TypeKind, Ty,
};
use pe_core::span::Span;
use pe_golang::parse_literal;
use pe_golang::synthesizer::is_identifier;
use serde::{Deserialize, Serialize};

use crate::{CliError, Result};

/// Flags shared by every command that takes a call.
#[derive(Args, Debug, Clone, Default)]
pub struct CallArgs {
    /// JSON call document; replaces the flags below
    #[arg(long, conflicts_with_all = ["module", "function", "params", "returns", "args"])]
    pub call: Option<PathBuf>,

    /// Import path of the package declaring the function
    #[arg(short, long)]
    pub module: Option<String>,

    /// Function name
    #[arg(short, long)]
    pub function: Option<String>,

    /// Parameter as `name:type` or `type` (repeat in order)
    #[arg(short, long = "param")]
    pub params: Vec<String>,

    /// Return type
    #[arg(short, long)]
    pub returns: Option<String>,

    /// Argument in Go literal syntax, or an identifier for a runtime variable (repeat in order)
    #[arg(short, long = "arg", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Treat the function as not annotated pure
    #[arg(long)]
    pub impure: bool,
}

impl CallArgs {
    pub fn document(&self) -> Result<CallDocument> {
        if let Some(path) = &self.call {
            return CallDocument::from_json_file(path);
        }
        let module = self
            .module
            .clone()
            .ok_or_else(|| CliError::InvalidInput("--module is required".to_string()))?;
        let function = self
            .function
            .clone()
            .ok_or_else(|| CliError::InvalidInput("--function is required".to_string()))?;
        let returns = self
            .returns
            .clone()
            .ok_or_else(|| CliError::InvalidInput("--returns is required".to_string()))?;
        let params = self
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| ParamDocument::parse(index, param))
            .collect::<Result<Vec<_>>>()?;

        Ok(CallDocument {
            module,
            function,
            params,
            returns,
            args: self.args.clone(),
            pure: !self.impure,
        })
    }

    pub fn resolve(&self) -> Result<ExprCall> {
        self.document()?.to_call()
    }
}

/// A call described as data.
///
/// ```json
/// { "module": "strings", "function": "ToLower",
///   "params": [{ "name": "s", "type": "string" }], "returns": "string",
///   "args": ["\"HELLO\""] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDocument {
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub params: Vec<ParamDocument>,
    pub returns: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_pure")]
    pub pure: bool,
}

fn default_pure() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl ParamDocument {
    /// `name:type`, or a bare `type` named after its position.
    pub fn parse(index: usize, text: &str) -> Result<Self> {
        let (name, ty) = match text.split_once(':') {
            Some((name, ty)) => (name.trim().to_string(), ty.trim().to_string()),
            None => (format!("p{}", index), text.trim().to_string()),
        };
        if name.is_empty() || ty.is_empty() {
            return Err(CliError::InvalidInput(format!(
                "parameter `{}` must be `name:type` or `type`",
                text
            )));
        }
        Ok(Self { name, ty })
    }
}

impl CallDocument {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            CliError::InvalidInput(msg) => {
                CliError::InvalidInput(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CliError::InvalidInput(e.to_string()))
    }

    pub fn signature(&self) -> FunctionSig {
        let params = self
            .params
            .iter()
            .map(|p| Param::new(p.name.clone(), Ty::named(p.ty.clone())))
            .collect();
        let purity = if self.pure {
            Purity::Asserted
        } else {
            Purity::Unannotated
        };
        FunctionSig::new(
            FunctionRef::new(self.module.clone(), self.function.clone()),
            params,
            Ty::named(self.returns.clone()),
        )
        .with_purity(purity)
    }

    /// Build the call expression. Arguments beyond the declared parameters
    /// are kept untyped so arity problems surface as ineligibility.
    pub fn to_call(&self) -> Result<ExprCall> {
        let sig = self.signature();
        let args = self
            .args
            .iter()
            .enumerate()
            .map(|(index, text)| parse_argument(text, sig.params.get(index).map(|p| &p.ty)))
            .collect::<Result<Vec<_>>>()?;
        Ok(ExprCall::new(Arc::new(sig), args))
    }
}

/// A bare identifier names a runtime variable; anything else must be a Go literal.
pub fn parse_argument(text: &str, param: Option<&Ty>) -> Result<Expr> {
    let trimmed = text.trim();
    if trimmed != "true" && trimmed != "false" && is_identifier(trimmed) {
        return Ok(Expr::Var(ExprVar {
            name: trimmed.to_string(),
            ty: param.cloned(),
            span: Span::default(),
        }));
    }

    let value = parse_literal(trimmed).map_err(|e| CliError::InvalidArgument {
        text: text.to_string(),
        message: e.to_string(),
    })?;
    let literal = match param {
        Some(ty) => ExprLiteral::new(convert_untyped(value, ty)).with_ty(ty.clone()),
        None => ExprLiteral::new(value),
    };
    Ok(Expr::Literal(literal))
}

/// Integer constants are untyped in Go and convert to a float parameter.
fn convert_untyped(value: ConstValue, ty: &Ty) -> ConstValue {
    match (value, ty.kind) {
        (ConstValue::Int(v), TypeKind::Float) => ConstValue::float(v.value as f64),
        (value, _) => value,
    }
}
