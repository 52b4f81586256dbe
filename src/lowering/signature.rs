use crate::{
    lowering::{LoweringError, LoweringResult},
    portable::FunctionMapping,
};

pub struct SignatureResolver;

impl SignatureResolver {
    pub fn resolve(mapping: &FunctionMapping, reference: u32) -> LoweringResult<&str> {
        mapping.get(reference).ok_or(LoweringError::UnknownFunctionReference(reference))
    }

    /// `"add:i32_i32"` -> `"add"`.
    pub fn canonical_name(signature: &str) -> &str {
        signature.split_once(':').map_or(signature, |(name, _)| name)
    }

    /// `"add:i32_i32"` -> `["i32", "i32"]`.
    pub fn argument_types(signature: &str) -> Vec<&str> {
        match signature.split_once(':') {
            Some((_, "")) | None => vec![],
            Some((_, args)) => args.split('_').collect(),
        }
    }

    pub fn resolve_canonical_name(mapping: &FunctionMapping, reference: u32) -> LoweringResult<&str> {
        Self::resolve(mapping, reference).map(Self::canonical_name)
    }
}
