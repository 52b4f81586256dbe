pub mod portable;
pub use portable::{Expression, FunctionCall, FunctionMapping, Literal, PortablePlan, PortableType, TypeKind};

pub mod native;
pub use native::{ExpressionGraph, GraphError, InputSchema, NativeType, NodeId};

pub mod lowering;
pub use lowering::{
    FunctionLowering, LoweredPlan, LoweringConfig, LoweringContext, LoweringError, LoweringRegistry, LoweringResult,
    PlanLowering, PlanWalker,
};
