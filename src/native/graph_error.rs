#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown native primitive '{0}'")]
    UnknownPrimitive(String),
    #[error("native primitive '{name}' cannot be applied to ({args})")]
    ArgumentMismatch { name: String, args: String },
    #[error("result name '{0}' is already bound to another node")]
    DuplicateName(String),
    #[error("node {0} does not exist in the expression graph")]
    InvalidNode(usize),
}
