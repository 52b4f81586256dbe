use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::portable::{PortableType, TypeKind};

/// Result type of a node in the native expression graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeType {
    /// Type of an untyped NULL.
    Nothing,
    Bool,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Date,
    Array(Box<NativeType>),
    Nullable(Box<NativeType>),
}

impl NativeType {
    /// Native counterpart of a portable type. Nullability becomes a wrapper.
    pub fn from_portable(ty: &PortableType) -> NativeType {
        let base = match &ty.kind {
            TypeKind::Bool => NativeType::Bool,
            TypeKind::I8 => NativeType::Int8,
            TypeKind::I16 => NativeType::Int16,
            TypeKind::I32 => NativeType::Int32,
            TypeKind::I64 => NativeType::Int64,
            TypeKind::Fp32 => NativeType::Float32,
            TypeKind::Fp64 => NativeType::Float64,
            TypeKind::String => NativeType::String,
            TypeKind::Date => NativeType::Date,
            TypeKind::List(element) => NativeType::Array(Box::new(NativeType::from_portable(element))),
        };
        if ty.nullable { NativeType::nullable(base) } else { base }
    }

    /// Wraps `inner` in `Nullable`, unless it already is.
    pub fn nullable(inner: NativeType) -> NativeType {
        if inner.is_nullable() { inner } else { NativeType::Nullable(Box::new(inner)) }
    }

    pub fn array(element: NativeType) -> NativeType {
        NativeType::Array(Box::new(element))
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, NativeType::Nullable(_))
    }

    /// The type with one level of `Nullable` stripped.
    pub fn remove_nullable(&self) -> &NativeType {
        match self {
            NativeType::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Re-applies the nullability of `like` onto `self`.
    pub fn with_nullability_of(self, like: bool) -> NativeType {
        if like { NativeType::nullable(self) } else { self }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.remove_nullable(),
            NativeType::UInt64 | NativeType::Int8 | NativeType::Int16 | NativeType::Int32 | NativeType::Int64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self.remove_nullable(), NativeType::Float32 | NativeType::Float64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self.remove_nullable(), NativeType::Nothing)
    }

    /// Canonical empty value of the type, used as a coalesce fallback.
    pub fn default_value(&self) -> Value {
        match self {
            NativeType::Nothing | NativeType::Nullable(_) => Value::Null,
            NativeType::Bool => Value::Bool(false),
            NativeType::UInt64
            | NativeType::Int8
            | NativeType::Int16
            | NativeType::Int32
            | NativeType::Int64 => Value::from(0),
            NativeType::Float32 | NativeType::Float64 => Value::from(0.0),
            NativeType::String => Value::String(String::new()),
            NativeType::Date => Value::String("1970-01-01".into()),
            NativeType::Array(_) => Value::Array(vec![]),
        }
    }

    /// Structural equality, optionally ignoring top-level nullability.
    pub fn matches(&self, other: &NativeType, strict_nullability: bool) -> bool {
        if strict_nullability {
            self == other
        } else {
            self.remove_nullable() == other.remove_nullable()
        }
    }

    /// Smallest type both sides convert to without loss, ignoring nullability.
    pub fn common_supertype(a: &NativeType, b: &NativeType) -> Option<NativeType> {
        let (a, b) = (a.remove_nullable(), b.remove_nullable());
        if a == b {
            return Some(a.clone());
        }
        match (a, b) {
            (NativeType::Nothing, other) | (other, NativeType::Nothing) => Some(other.clone()),
            (x, y) if x.is_float() || y.is_float() => {
                if x.is_numeric() && y.is_numeric() { Some(NativeType::Float64) } else { None }
            }
            (x, y) if x.is_integer() && y.is_integer() => Some(NativeType::Int64),
            (NativeType::Array(x), NativeType::Array(y)) => {
                Self::common_supertype(x, y).map(NativeType::array)
            }
            _ => None,
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Nothing => f.write_str("Nothing"),
            NativeType::Bool => f.write_str("Bool"),
            NativeType::UInt64 => f.write_str("UInt64"),
            NativeType::Int8 => f.write_str("Int8"),
            NativeType::Int16 => f.write_str("Int16"),
            NativeType::Int32 => f.write_str("Int32"),
            NativeType::Int64 => f.write_str("Int64"),
            NativeType::Float32 => f.write_str("Float32"),
            NativeType::Float64 => f.write_str("Float64"),
            NativeType::String => f.write_str("String"),
            NativeType::Date => f.write_str("Date"),
            NativeType::Array(inner) => write!(f, "Array({})", inner),
            NativeType::Nullable(inner) => write!(f, "Nullable({})", inner),
        }
    }
}
