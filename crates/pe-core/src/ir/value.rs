use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// wrap struct declare with derive Debug, Clone, Serialize, Deserialize,
/// PartialEq, Eq, Hash
macro_rules! plain_value {
    ($(#[$attr:meta])* $name:ident: $ty:ty) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name {
            pub value: $ty,
        }
        impl $name {
            pub fn new(v: $ty) -> Self {
                Self { value: v }
            }
        }
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.value)
            }
        }
    };
}

plain_value! {
    ValueInt: i64
}
plain_value! {
    ValueBool: bool
}
plain_value! {
    ValueString: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueFloat {
    pub value: f64,
}
impl PartialEq for ValueFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value.total_cmp(&other.value) == std::cmp::Ordering::Equal
    }
}
impl Eq for ValueFloat {}
impl Hash for ValueFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_bits().hash(state);
    }
}
impl ValueFloat {
    pub fn new(v: f64) -> Self {
        Self { value: v }
    }
}
impl Display for ValueFloat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // `{:?}` keeps the fractional part (`3.0`, not `3`) so the text reads back as a float
        write!(f, "{:?}", self.value)
    }
}

/// Kind tag of a compile-time constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstKind {
    String,
    Int,
    Float,
    Bool,
}

impl Display for ConstKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConstKind::String => "string",
            ConstKind::Int => "int",
            ConstKind::Float => "float",
            ConstKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A literal value known at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ConstValue {
    String(ValueString),
    Int(ValueInt),
    Float(ValueFloat),
    Bool(ValueBool),
}

impl ConstValue {
    pub fn string(v: impl Into<String>) -> Self {
        ConstValue::String(ValueString::new(v.into()))
    }
    pub fn int(v: i64) -> Self {
        ConstValue::Int(ValueInt::new(v))
    }
    pub fn float(v: f64) -> Self {
        ConstValue::Float(ValueFloat::new(v))
    }
    pub fn bool(v: bool) -> Self {
        ConstValue::Bool(ValueBool::new(v))
    }

    pub fn kind(&self) -> ConstKind {
        match self {
            ConstValue::String(_) => ConstKind::String,
            ConstValue::Int(_) => ConstKind::Int,
            ConstValue::Float(_) => ConstKind::Float,
            ConstValue::Bool(_) => ConstKind::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String(s) => Some(&s.value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConstValue::Int(i) => Some(i.value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConstValue::Float(f) => Some(f.value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstValue::Bool(b) => Some(b.value),
            _ => None,
        }
    }
}

impl Display for ConstValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstValue::String(s) => write!(f, "{:?}", s.value),
            ConstValue::Int(i) => write!(f, "{}", i),
            ConstValue::Float(x) => write!(f, "{}", x),
            ConstValue::Bool(b) => write!(f, "{}", b),
        }
    }
}
