pub mod lowering_error;
pub use lowering_error::*;

pub mod lowering_config;
pub use lowering_config::*;

pub mod signature;
pub use signature::*;

pub mod name_tables;
pub use name_tables::*;

pub mod function_lowering;
pub use function_lowering::*;

pub mod default_scalar;
pub use default_scalar::*;

pub mod aggregate;
pub use aggregate::*;

pub mod registry;
pub use registry::*;

pub mod lowering_context;
pub use lowering_context::*;

pub mod plan_lowering;
pub use plan_lowering::*;
