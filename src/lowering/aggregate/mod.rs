pub mod common_aggregate;
pub use common_aggregate::*;

pub mod collect_lowering;
pub use collect_lowering::*;
