use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::{
    lowering::{
        CallKind, CommonAggregateLowering, DefaultScalarLowering, FunctionLowering, LoweringConfig, LoweringError,
        LoweringRegistry, LoweringResult, SignatureResolver,
    },
    native::{ExpressionGraph, InputSchema, NativeType, NodeId},
    portable::{Expression, FunctionCall, FunctionMapping, Literal},
};

static NEXT_UNIQUE_ID: AtomicU64 = AtomicU64::new(0);

/// Recursive entry point function lowerings use for their arguments.
pub trait PlanWalker {
    fn lower_expression(
        &self,
        expr: &Expression,
        graph: &mut ExpressionGraph,
        required_columns: &mut Vec<String>,
    ) -> LoweringResult<NodeId>;
}

/// Everything lowering one plan fragment reads from. Several contexts may
/// share one mapping and registry across threads; each owns nothing mutable.
pub struct LoweringContext<'a> {
    mapping: &'a FunctionMapping,
    registry: &'a LoweringRegistry,
    input: &'a InputSchema,
    config: LoweringConfig,
}

impl<'a> LoweringContext<'a> {
    pub fn new(mapping: &'a FunctionMapping, registry: &'a LoweringRegistry, input: &'a InputSchema) -> Self {
        Self::with_config(mapping, registry, input, LoweringConfig::default())
    }

    pub fn with_config(
        mapping: &'a FunctionMapping,
        registry: &'a LoweringRegistry,
        input: &'a InputSchema,
        config: LoweringConfig,
    ) -> Self {
        Self { mapping, registry, input, config }
    }

    pub fn mapping(&self) -> &'a FunctionMapping {
        self.mapping
    }

    pub fn registry(&self) -> &'a LoweringRegistry {
        self.registry
    }

    pub fn input(&self) -> &'a InputSchema {
        self.input
    }

    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }

    /// `base` plus a suffix unique within the process, so synthesized nodes
    /// never collide with user-visible column names.
    pub fn unique_name(&self, base: &str) -> String {
        format!("{}_{}", base, NEXT_UNIQUE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn lower_scalar_call(
        &self,
        call: &FunctionCall,
        graph: &mut ExpressionGraph,
        required_columns: &mut Vec<String>,
    ) -> LoweringResult<NodeId> {
        self.lower_call(call, CallKind::Scalar, graph, required_columns)
    }

    pub fn lower_aggregate_call(
        &self,
        call: &FunctionCall,
        graph: &mut ExpressionGraph,
        required_columns: &mut Vec<String>,
    ) -> LoweringResult<NodeId> {
        self.lower_call(call, CallKind::Aggregate, graph, required_columns)
    }

    /// Registered lowering for the call, else the fallback for `kind`. A
    /// registered lowering of the other kind cannot be used in this position.
    fn lower_call(
        &self,
        call: &FunctionCall,
        kind: CallKind,
        graph: &mut ExpressionGraph,
        required_columns: &mut Vec<String>,
    ) -> LoweringResult<NodeId> {
        let name = SignatureResolver::resolve_canonical_name(self.mapping, call.function_reference)?;
        match self.registry.try_get(name, self) {
            Some(lowering) if lowering.call_kind() != kind => {
                debug!(function = %name, expected = ?kind, "function used in the wrong position");
                Err(LoweringError::UnknownFunction(name.to_string()))
            }
            Some(lowering) => lowering.lower(call, graph, required_columns),
            None => match kind {
                CallKind::Scalar => DefaultScalarLowering::new(self, name).lower(call, graph, required_columns),
                CallKind::Aggregate => CommonAggregateLowering::new(self, name).lower(call, graph, required_columns),
            },
        }
    }

    fn lower_literal(&self, literal: &Literal, graph: &mut ExpressionGraph) -> LoweringResult<NodeId> {
        let ty = NativeType::from_portable(&literal.portable_type());
        let name = self.unique_name(&literal.to_string());
        Ok(graph.add_constant(&name, ty, literal.to_value())?)
    }

    fn lower_field_reference(
        &self,
        index: usize,
        graph: &mut ExpressionGraph,
        required_columns: &mut Vec<String>,
    ) -> LoweringResult<NodeId> {
        let (name, ty) = self
            .input
            .column(index)
            .ok_or(LoweringError::FieldOutOfRange { index, width: self.input.width() })?;

        if !self.config.dedup_required_columns || !required_columns.iter().any(|c| c == name) {
            required_columns.push(name.to_string());
        }
        Ok(graph.add_input(name, ty.clone())?)
    }
}

impl PlanWalker for LoweringContext<'_> {
    fn lower_expression(
        &self,
        expr: &Expression,
        graph: &mut ExpressionGraph,
        required_columns: &mut Vec<String>,
    ) -> LoweringResult<NodeId> {
        trace!(?expr, "lowering expression");
        match expr {
            Expression::Literal(literal) => self.lower_literal(literal, graph),
            Expression::FieldReference(index) => self.lower_field_reference(*index, graph, required_columns),
            Expression::ScalarFunction(call) => self.lower_scalar_call(call, graph, required_columns),
        }
    }
}
