use chrono::NaiveDate;
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display};

use crate::portable::{PortableType, TypeKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// Typed null; the type is what the constant column is materialized as.
    Null(PortableType),
    Bool(bool),
    I32(i32),
    I64(i64),
    Fp64(NotNan<f64>),
    String(String),
    Date(NaiveDate),
    List { element: PortableType, values: Vec<Literal> },
}

impl Literal {
    pub fn portable_type(&self) -> PortableType {
        match self {
            Literal::Null(ty) => PortableType::new(ty.kind.clone(), true),
            Literal::Bool(_) => PortableType::required(TypeKind::Bool),
            Literal::I32(_) => PortableType::required(TypeKind::I32),
            Literal::I64(_) => PortableType::required(TypeKind::I64),
            Literal::Fp64(_) => PortableType::required(TypeKind::Fp64),
            Literal::String(_) => PortableType::required(TypeKind::String),
            Literal::Date(_) => PortableType::required(TypeKind::Date),
            Literal::List { element, .. } => PortableType::list(element.clone(), false),
        }
    }

    /// Value stored in the constant column. Dates are kept in ISO form.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null(_) => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::I32(i) => Value::from(*i),
            Literal::I64(i) => Value::from(*i),
            Literal::Fp64(f) => serde_json::Number::from_f64(f.into_inner())
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Literal::List { values, .. } => Value::Array(values.iter().map(Literal::to_value).collect()),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null(_) => f.write_str("NULL"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::I32(i) => write!(f, "{}", i),
            Literal::I64(i) => write!(f, "{}", i),
            Literal::Fp64(n) => write!(f, "{}", n.into_inner()),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Literal::List { values, .. } => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
        }
    }
}
