pub mod portable_type;
pub use portable_type::*;

pub mod literal;
pub use literal::*;

pub mod expression;
pub use expression::*;

pub mod function_mapping;
pub use function_mapping::*;

pub mod portable_plan;
pub use portable_plan::*;
