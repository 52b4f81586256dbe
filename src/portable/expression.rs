use serde::{Deserialize, Serialize};

use crate::portable::{Literal, PortableType};

/// The subset of portable expressions the lowering subsystem understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Literal(Literal),
    /// Positional reference into the input schema.
    FieldReference(usize),
    ScalarFunction(FunctionCall),
}

/// A scalar or aggregate function invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub function_reference: u32,
    #[serde(default)]
    pub arguments: Vec<Expression>,
    pub output_type: PortableType,
}

impl FunctionCall {
    pub fn new(function_reference: u32, arguments: Vec<Expression>, output_type: PortableType) -> Self {
        Self { function_reference, arguments, output_type }
    }
}

impl Expression {
    pub fn literal(literal: Literal) -> Self {
        Expression::Literal(literal)
    }

    pub fn field(index: usize) -> Self {
        Expression::FieldReference(index)
    }

    pub fn call(function_reference: u32, arguments: Vec<Expression>, output_type: PortableType) -> Self {
        Expression::ScalarFunction(FunctionCall::new(function_reference, arguments, output_type))
    }
}
