//! Deciding whether a call site may be evaluated at compile time.

use std::fmt::{Display, Formatter};

use pe_core::ir::{ConstKind, ConstValue, Expr, ExprCall, Ty};

/// A literal argument lifted out of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantArgument {
    pub value: ConstValue,
}

impl ConstantArgument {
    pub fn new(value: ConstValue) -> Self {
        Self { value }
    }

    pub fn kind(&self) -> ConstKind {
        self.value.kind()
    }
}

/// The first reason found for leaving a call alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    NotPure,
    ArityMismatch { expected: usize, found: usize },
    NonLiteralArgument { index: usize },
    UnsupportedParameter { index: usize, param: Ty },
    KindMismatch { index: usize, param: Ty, found: ConstKind },
    UnsupportedReturn(Ty),
}

impl Display for Ineligibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Ineligibility::NotPure => write!(f, "callee is not annotated pure"),
            Ineligibility::ArityMismatch { expected, found } => {
                write!(f, "expected {} arguments, found {}", expected, found)
            }
            Ineligibility::NonLiteralArgument { index } => {
                write!(f, "argument {} is not a literal", index)
            }
            Ineligibility::UnsupportedParameter { index, param } => {
                write!(f, "parameter {} has unsupported type {}", index, param)
            }
            Ineligibility::KindMismatch { index, param, found } => write!(
                f,
                "argument {} is a {} literal but the parameter is {}",
                index, found, param
            ),
            Ineligibility::UnsupportedReturn(ty) => {
                write!(f, "return type {} cannot be materialized", ty)
            }
        }
    }
}

/// Check a call and lift its literal arguments.
///
/// Requires an asserted-pure callee, matching arity, a literal of the exact
/// parameter kind for every argument (no widening across kinds), and a return
/// type the materializer can decode. A call result is never accepted as an
/// argument, even when that call could itself be folded.
pub fn check_eligibility(call: &ExprCall) -> Result<Vec<ConstantArgument>, Ineligibility> {
    let sig = &call.callee;
    if !sig.is_pure() {
        return Err(Ineligibility::NotPure);
    }
    if call.args.len() != sig.params.len() {
        return Err(Ineligibility::ArityMismatch {
            expected: sig.params.len(),
            found: call.args.len(),
        });
    }
    if sig.ret.const_kind().is_none() {
        return Err(Ineligibility::UnsupportedReturn(sig.ret.clone()));
    }

    let mut args = Vec::with_capacity(call.args.len());
    for (index, (arg, param)) in call.args.iter().zip(&sig.params).enumerate() {
        let Expr::Literal(lit) = arg else {
            return Err(Ineligibility::NonLiteralArgument { index });
        };
        let Some(expected) = param.ty.const_kind() else {
            return Err(Ineligibility::UnsupportedParameter {
                index,
                param: param.ty.clone(),
            });
        };
        let found = lit.value.kind();
        if found != expected {
            return Err(Ineligibility::KindMismatch {
                index,
                param: param.ty.clone(),
                found,
            });
        }
        args.push(ConstantArgument::new(lit.value.clone()));
    }
    Ok(args)
}

pub fn is_eligible(call: &ExprCall) -> bool {
    check_eligibility(call).is_ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pe_core::ir::{FunctionRef, FunctionSig, Param};
    use pretty_assertions::assert_eq;

    use super::*;

    fn add_pure() -> Arc<FunctionSig> {
        Arc::new(
            FunctionSig::new(
                FunctionRef::new("example.com/m/calc", "addPure"),
                vec![Param::new("a", Ty::int()), Param::new("b", Ty::int())],
                Ty::int(),
            )
            .pure(),
        )
    }

    #[test]
    fn all_literal_arguments_of_matching_kind() {
        let call = ExprCall::new(
            add_pure(),
            vec![
                Expr::value(ConstValue::int(10)),
                Expr::value(ConstValue::int(20)),
            ],
        );
        let args = check_eligibility(&call).unwrap();
        assert_eq!(
            args.into_iter().map(|a| a.value).collect::<Vec<_>>(),
            vec![ConstValue::int(10), ConstValue::int(20)]
        );
        assert!(is_eligible(&call));
    }

    #[test]
    fn variable_argument_disqualifies() {
        let call = ExprCall::new(
            add_pure(),
            vec![Expr::var("x"), Expr::value(ConstValue::int(20))],
        );
        assert_eq!(
            check_eligibility(&call),
            Err(Ineligibility::NonLiteralArgument { index: 0 })
        );
    }

    #[test]
    fn nested_call_argument_disqualifies() {
        let inner = Expr::call(
            add_pure(),
            vec![
                Expr::value(ConstValue::int(1)),
                Expr::value(ConstValue::int(2)),
            ],
        );
        let call = ExprCall::new(add_pure(), vec![Expr::value(ConstValue::int(1)), inner]);
        assert_eq!(
            check_eligibility(&call),
            Err(Ineligibility::NonLiteralArgument { index: 1 })
        );
    }

    #[test]
    fn no_widening_across_kinds() {
        let call = ExprCall::new(
            add_pure(),
            vec![
                Expr::value(ConstValue::float(1.0)),
                Expr::value(ConstValue::int(2)),
            ],
        );
        assert_eq!(
            check_eligibility(&call),
            Err(Ineligibility::KindMismatch {
                index: 0,
                param: Ty::int(),
                found: ConstKind::Float,
            })
        );
    }

    #[test]
    fn unannotated_callee_is_left_alone() {
        let sig = Arc::new((*add_pure()).clone().with_purity(Default::default()));
        let call = ExprCall::new(
            sig,
            vec![
                Expr::value(ConstValue::int(1)),
                Expr::value(ConstValue::int(2)),
            ],
        );
        assert_eq!(check_eligibility(&call), Err(Ineligibility::NotPure));
    }

    #[test]
    fn arity_mismatch() {
        let call = ExprCall::new(add_pure(), vec![Expr::value(ConstValue::int(1))]);
        assert_eq!(
            check_eligibility(&call),
            Err(Ineligibility::ArityMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn composite_parameter_or_return() {
        let sig = Arc::new(
            FunctionSig::new(
                FunctionRef::new("bytes", "ToLower"),
                vec![Param::new("s", Ty::named("[]byte"))],
                Ty::named("[]byte"),
            )
            .pure(),
        );
        let call = ExprCall::new(sig, vec![Expr::value(ConstValue::string("A"))]);
        assert_eq!(
            check_eligibility(&call),
            Err(Ineligibility::UnsupportedReturn(Ty::named("[]byte")))
        );

        let sig = Arc::new(
            FunctionSig::new(
                FunctionRef::new("example.com/m/p", "Len"),
                vec![Param::new("s", Ty::named("[]byte"))],
                Ty::int(),
            )
            .pure(),
        );
        let call = ExprCall::new(sig, vec![Expr::value(ConstValue::string("A"))]);
        assert_eq!(
            check_eligibility(&call),
            Err(Ineligibility::UnsupportedParameter {
                index: 0,
                param: Ty::named("[]byte"),
            })
        );
    }
}
