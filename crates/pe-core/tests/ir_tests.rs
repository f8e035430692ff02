// Host IR tests: value kinds, type classification, signatures and call nodes.

use std::sync::Arc;

use pe_core::ir::*;
use pe_core::span::Span;
use pretty_assertions::assert_eq;

#[test]
fn test_const_value_kinds() {
    assert_eq!(ConstValue::string("a").kind(), ConstKind::String);
    assert_eq!(ConstValue::int(1).kind(), ConstKind::Int);
    assert_eq!(ConstValue::float(1.5).kind(), ConstKind::Float);
    assert_eq!(ConstValue::bool(true).kind(), ConstKind::Bool);
}

#[test]
fn test_const_value_accessors() {
    assert_eq!(ConstValue::string("hi").as_str(), Some("hi"));
    assert_eq!(ConstValue::int(7).as_int(), Some(7));
    assert_eq!(ConstValue::float(0.25).as_float(), Some(0.25));
    assert_eq!(ConstValue::bool(false).as_bool(), Some(false));
    assert_eq!(ConstValue::int(7).as_str(), None);
}

#[test]
fn test_float_display_keeps_fraction() {
    assert_eq!(ConstValue::float(3.0).to_string(), "3.0");
    assert_eq!(ConstValue::float(1e100).to_string(), "1e100");
    assert_eq!(ConstValue::string("a\"b").to_string(), "\"a\\\"b\"");
}

#[test]
fn test_float_equality_is_total() {
    assert_eq!(ConstValue::float(f64::NAN), ConstValue::float(f64::NAN));
    assert_ne!(ConstValue::float(0.0), ConstValue::float(-0.0));
}

#[test]
fn test_named_type_classification() {
    assert_eq!(Ty::named("string").kind, TypeKind::String);
    assert_eq!(Ty::named("uint16").kind, TypeKind::Int);
    assert_eq!(Ty::named("rune").kind, TypeKind::Int);
    assert_eq!(Ty::named("float32").kind, TypeKind::Float);
    assert_eq!(Ty::named("bool").kind, TypeKind::Bool);
    assert_eq!(Ty::named("[]byte").kind, TypeKind::Other);
    assert_eq!(Ty::named("MyString").const_kind(), None);
    assert_eq!(Ty::named("int32").name, "int32");
}

#[test]
fn test_signature_purity() {
    let sig = FunctionSig::new(
        FunctionRef::new("strings", "ToLower"),
        vec![Param::new("s", Ty::string())],
        Ty::string(),
    );
    assert!(!sig.is_pure());
    let sig = sig.pure();
    assert!(sig.is_pure());
    assert_eq!(sig.func.to_string(), "strings.ToLower");
}

#[test]
fn test_call_node_span_and_literals() {
    let sig = Arc::new(
        FunctionSig::new(
            FunctionRef::new("example.com/m/calc", "AddPure"),
            vec![Param::new("a", Ty::int()), Param::new("b", Ty::int())],
            Ty::int(),
        )
        .pure(),
    );
    let call = ExprCall::new(
        sig,
        vec![Expr::value(ConstValue::int(10)), Expr::var("x")],
    )
    .with_span(Span::new(3, 10, 24));
    let expr = Expr::from(call.clone());
    assert_eq!(expr.span(), Span::new(3, 10, 24));
    assert!(call.args[0].as_literal().is_some());
    assert!(call.args[1].as_literal().is_none());
}

#[test]
fn test_call_node_serde() -> Result<(), serde_json::Error> {
    let sig = Arc::new(
        FunctionSig::new(
            FunctionRef::new("strings", "Repeat"),
            vec![
                Param::new("s", Ty::string()),
                Param::new("count", Ty::int()),
            ],
            Ty::string(),
        )
        .pure(),
    );
    let expr = Expr::call(
        sig,
        vec![
            Expr::value(ConstValue::string("ab")),
            Expr::value(ConstValue::int(3)),
        ],
    );
    let json = serde_json::to_string(&expr)?;
    let back: Expr = serde_json::from_str(&json)?;
    assert_eq!(expr, back);
    Ok(())
}
