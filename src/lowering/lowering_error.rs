use crate::native::GraphError;

/// Everything that can abort the lowering of a call or a plan fragment.
///
/// None of these are recovered locally: they travel up through the recursive
/// lowering calls to whoever compiles the fragment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoweringError {
    #[error("unknown function reference {0}")]
    UnknownFunctionReference(u32),
    #[error("unsupported function: {0}")]
    UnknownFunction(String),
    #[error("function lowering name '{0}' is not unique")]
    RegistrationConflict(String),
    #[error("{0} is not implemented")]
    NotImplemented(String),
    #[error("function reference {reference} declared as '{existing}' and '{signature}'")]
    DuplicateFunctionReference { reference: u32, existing: String, signature: String },
    #[error("invalid function signature '{0}'")]
    InvalidSignature(String),
    #[error("field reference {index} is out of range for an input of {width} columns")]
    FieldOutOfRange { index: usize, width: usize },
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type LoweringResult<T> = Result<T, LoweringError>;
