use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    lowering::{LoweringError, LoweringResult},
    native::{InputSchema, NativeType},
    portable::{Expression, FunctionCall, FunctionMapping, PortableType},
};

/// Declaration of one function reference used by the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionFunction {
    pub function_reference: u32,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PortableType,
}

/// The serialized plan fragment handed over by the upstream compiler.
///
/// Only what function lowering needs is modelled: the reference table, the
/// input columns field references point into, projected expressions and
/// aggregate measures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortablePlan {
    #[serde(default)]
    pub extensions: Vec<ExtensionFunction>,
    #[serde(default)]
    pub input: Vec<InputColumn>,
    #[serde(default)]
    pub projections: Vec<Expression>,
    #[serde(default)]
    pub measures: Vec<FunctionCall>,
}

impl PortablePlan {
    pub fn from_json(text: &str) -> LoweringResult<Self> {
        serde_json::from_str(text).map_err(|e| LoweringError::InvalidPlan(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> LoweringResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| LoweringError::InvalidPlan(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn function_mapping(&self) -> LoweringResult<FunctionMapping> {
        FunctionMapping::from_entries(
            self.extensions.iter().map(|ext| (ext.function_reference, ext.signature.clone())),
        )
    }

    pub fn input_schema(&self) -> InputSchema {
        let mut schema = InputSchema::new();
        for column in &self.input {
            schema.add(&column.name, NativeType::from_portable(&column.ty));
        }
        schema
    }
}
