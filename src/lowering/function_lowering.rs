use tracing::debug;

use crate::{
    lowering::{LoweringContext, LoweringResult, NativeNameTables, PlanWalker, SignatureResolver},
    native::{ExpressionGraph, NativeType, NodeId},
    portable::FunctionCall,
};

/// Whether a lowering builds a row-wise function node or an aggregate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Scalar,
    Aggregate,
}

/// Translator from one portable function call to native graph nodes.
///
/// Instances are built per call by the [`LoweringRegistry`](crate::lowering::LoweringRegistry)
/// (or directly, for the fallback paths) and hold nothing but the context
/// they were built for. The provided methods are the common path:
/// 1) resolve the native name
/// 2) lower every argument through the plan walker
/// 3) build the call node
/// 4) hand it to [`adapt_output`](FunctionLowering::adapt_output)
///
/// Implementors override only what differs.
pub trait FunctionLowering {
    fn context(&self) -> &LoweringContext<'_>;

    /// Canonical name this lowering is registered under.
    fn identity(&self) -> LoweringResult<&str>;

    fn call_kind(&self) -> CallKind {
        CallKind::Scalar
    }

    /// Native primitive selected by the call's declared signature.
    fn native_name(&self, call: &FunctionCall) -> LoweringResult<String> {
        let canonical = SignatureResolver::resolve_canonical_name(self.context().mapping(), call.function_reference)?;
        let native = match self.call_kind() {
            CallKind::Scalar => NativeNameTables::scalar(canonical)?,
            CallKind::Aggregate => NativeNameTables::aggregate(canonical)?,
        };
        Ok(native.to_string())
    }

    /// Native primitive selected by the resolved argument types.
    fn native_name_by_types(&self, arg_types: &[NativeType]) -> LoweringResult<String>;

    fn lower_arguments(
        &self,
        call: &FunctionCall,
        graph: &mut ExpressionGraph,
        required_columns: &mut Vec<String>,
    ) -> LoweringResult<Vec<NodeId>> {
        let mut args = Vec::with_capacity(call.arguments.len());
        for arg in &call.arguments {
            args.push(self.context().lower_expression(arg, graph, required_columns)?);
        }
        Ok(args)
    }

    fn lower(
        &self,
        call: &FunctionCall,
        graph: &mut ExpressionGraph,
        required_columns: &mut Vec<String>,
    ) -> LoweringResult<NodeId> {
        // Resolve before touching the graph: an unknown name adds no nodes.
        let mut native = self.native_name(call)?;
        let args = self.lower_arguments(call, graph, required_columns)?;

        let node = match self.call_kind() {
            CallKind::Scalar => {
                let result_name = graph.call_result_name(&native, &args)?;
                graph.add_function(&native, &args, &result_name)?
            }
            CallKind::Aggregate => {
                native = self.native_name_by_types(&graph.result_types(&args)?)?;
                let result_name = graph.call_result_name(&native, &args)?;
                graph.add_aggregate(&native, &args, &result_name)?
            }
        };
        debug!(function = %native, node = %node, "lowered function call");

        self.adapt_output(call, node, graph)
    }

    /// Reconciles the built node with the call's declared output type.
    ///
    /// On a mismatch a cast is added that takes over the built node's result
    /// name, since the rest of the plan finds the node by that name.
    fn adapt_output(&self, call: &FunctionCall, node: NodeId, graph: &mut ExpressionGraph) -> LoweringResult<NodeId> {
        let expected = NativeType::from_portable(&call.output_type);
        let built = graph.node(node)?;
        if built.result_type.matches(&expected, self.context().config().strict_nullability) {
            return Ok(node);
        }

        let result_name = built.result_name.clone();
        debug!(name = %result_name, from = %built.result_type, to = %expected, "converting result type");
        Ok(graph.add_cast(node, expected, &result_name)?)
    }
}
