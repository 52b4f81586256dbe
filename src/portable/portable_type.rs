use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a portable type, independent of nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Fp32,
    Fp64,
    String,
    Date,
    List(Box<PortableType>),
}

/// Type descriptor carried by the portable IR.
///
/// Every scalar call record carries one of these as its expected output type,
/// which is what output reconciliation compares against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortableType {
    pub kind: TypeKind,
    #[serde(default)]
    pub nullable: bool,
}

impl PortableType {
    pub fn new(kind: TypeKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    pub fn required(kind: TypeKind) -> Self {
        Self::new(kind, false)
    }

    pub fn nullable(kind: TypeKind) -> Self {
        Self::new(kind, true)
    }

    pub fn list(element: PortableType, nullable: bool) -> Self {
        Self::new(TypeKind::List(Box::new(element)), nullable)
    }

    /// Short name used inside function signatures ("i32", "str", "list", ...).
    pub fn signature_name(&self) -> &'static str {
        match self.kind {
            TypeKind::Bool => "bool",
            TypeKind::I8 => "i8",
            TypeKind::I16 => "i16",
            TypeKind::I32 => "i32",
            TypeKind::I64 => "i64",
            TypeKind::Fp32 => "fp32",
            TypeKind::Fp64 => "fp64",
            TypeKind::String => "str",
            TypeKind::Date => "date",
            TypeKind::List(_) => "list",
        }
    }
}

impl fmt::Display for PortableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::List(element) => write!(f, "list<{}>", element)?,
            _ => f.write_str(self.signature_name())?,
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}
