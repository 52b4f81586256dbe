use tracing::debug;

use crate::{
    lowering::{CallKind, FunctionLowering, LoweringContext, LoweringError, LoweringResult},
    native::{ExpressionGraph, NativeType, NodeId, NodeKind},
    portable::FunctionCall,
};

/// Shared part of `collect_list` / `collect_set`.
///
/// Collecting a group whose inputs are all null must give an empty list,
/// while the engine's collection primitives give NULL there and cannot be
/// changed. The output is therefore wrapped in `ifNull(node, [])`.
///
/// This type is never registered itself; its name operations fail with
/// `NotImplemented`.
pub struct CollectFunctionLowering<'a> {
    ctx: &'a LoweringContext<'a>,
}

impl<'a> CollectFunctionLowering<'a> {
    pub fn new(ctx: &'a LoweringContext<'a>) -> Self {
        Self { ctx }
    }

    /// `ifNull(node, ..)` already answering to `result_name`, from an earlier
    /// lowering of the same call.
    fn existing_patch(graph: &ExpressionGraph, result_name: &str, node: NodeId) -> Option<NodeId> {
        let holder = graph.find(result_name)?;
        match &graph.node(holder).ok()?.kind {
            NodeKind::Function { name, args } if name == "ifNull" && args.first() == Some(&node) => Some(holder),
            _ => None,
        }
    }
}

impl FunctionLowering for CollectFunctionLowering<'_> {
    fn context(&self) -> &LoweringContext<'_> {
        self.ctx
    }

    fn identity(&self) -> LoweringResult<&str> {
        Err(LoweringError::NotImplemented("CollectFunctionLowering::identity".into()))
    }

    fn call_kind(&self) -> CallKind {
        CallKind::Aggregate
    }

    fn native_name(&self, _call: &FunctionCall) -> LoweringResult<String> {
        Err(LoweringError::NotImplemented("CollectFunctionLowering::native_name".into()))
    }

    fn native_name_by_types(&self, _arg_types: &[NativeType]) -> LoweringResult<String> {
        Err(LoweringError::NotImplemented("CollectFunctionLowering::native_name_by_types".into()))
    }

    fn adapt_output(&self, _call: &FunctionCall, node: NodeId, graph: &mut ExpressionGraph) -> LoweringResult<NodeId> {
        let built = graph.node(node)?;
        if !built.result_type.is_nullable() {
            return Ok(node);
        }

        let result_name = built.result_name.clone();
        if let Some(patched) = Self::existing_patch(graph, &result_name, node) {
            graph.add_or_replace_in_outputs(patched)?;
            return Ok(patched);
        }

        let nested = built.result_type.remove_nullable().clone();
        let default_value = nested.default_value();
        let default_name = self.ctx.unique_name(&default_value.to_string());

        let default_node = graph.add_constant(&default_name, nested, default_value)?;
        let if_null = graph.add_function("ifNull", &[node, default_node], &result_name)?;
        graph.add_or_replace_in_outputs(if_null)?;
        debug!(name = %result_name, "patched nullable collect result");
        Ok(if_null)
    }
}

/// `collect_list` -> `groupArray`, keeping input order.
pub struct CollectListLowering<'a> {
    base: CollectFunctionLowering<'a>,
}

impl<'a> CollectListLowering<'a> {
    pub const NAME: &'static str = "collect_list";
    const NATIVE: &'static str = "groupArray";

    pub fn new(ctx: &'a LoweringContext<'a>) -> Self {
        Self { base: CollectFunctionLowering::new(ctx) }
    }
}

impl FunctionLowering for CollectListLowering<'_> {
    fn context(&self) -> &LoweringContext<'_> {
        self.base.context()
    }

    fn identity(&self) -> LoweringResult<&str> {
        Ok(Self::NAME)
    }

    fn call_kind(&self) -> CallKind {
        CallKind::Aggregate
    }

    fn native_name(&self, _call: &FunctionCall) -> LoweringResult<String> {
        Ok(Self::NATIVE.to_string())
    }

    fn native_name_by_types(&self, _arg_types: &[NativeType]) -> LoweringResult<String> {
        Ok(Self::NATIVE.to_string())
    }

    fn adapt_output(&self, call: &FunctionCall, node: NodeId, graph: &mut ExpressionGraph) -> LoweringResult<NodeId> {
        self.base.adapt_output(call, node, graph)
    }
}

/// `collect_set` -> `groupUniqArray`, dropping duplicates.
pub struct CollectSetLowering<'a> {
    base: CollectFunctionLowering<'a>,
}

impl<'a> CollectSetLowering<'a> {
    pub const NAME: &'static str = "collect_set";
    const NATIVE: &'static str = "groupUniqArray";

    pub fn new(ctx: &'a LoweringContext<'a>) -> Self {
        Self { base: CollectFunctionLowering::new(ctx) }
    }
}

impl FunctionLowering for CollectSetLowering<'_> {
    fn context(&self) -> &LoweringContext<'_> {
        self.base.context()
    }

    fn identity(&self) -> LoweringResult<&str> {
        Ok(Self::NAME)
    }

    fn call_kind(&self) -> CallKind {
        CallKind::Aggregate
    }

    fn native_name(&self, _call: &FunctionCall) -> LoweringResult<String> {
        Ok(Self::NATIVE.to_string())
    }

    fn native_name_by_types(&self, _arg_types: &[NativeType]) -> LoweringResult<String> {
        Ok(Self::NATIVE.to_string())
    }

    fn adapt_output(&self, call: &FunctionCall, node: NodeId, graph: &mut ExpressionGraph) -> LoweringResult<NodeId> {
        self.base.adapt_output(call, node, graph)
    }
}

pub fn create_collect_list<'a>(ctx: &'a LoweringContext<'a>) -> Box<dyn FunctionLowering + 'a> {
    Box::new(CollectListLowering::new(ctx))
}

pub fn create_collect_set<'a>(ctx: &'a LoweringContext<'a>) -> Box<dyn FunctionLowering + 'a> {
    Box::new(CollectSetLowering::new(ctx))
}
