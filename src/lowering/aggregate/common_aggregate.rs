use crate::{
    lowering::{CallKind, FunctionLowering, LoweringContext, LoweringResult, NativeNameTables},
    native::NativeType,
};

/// Fallback for aggregate names without a specialized lowering.
///
/// The declared signature only decides whether the name is supported at
/// all; the primitive itself is picked from the lowered argument types.
pub struct CommonAggregateLowering<'a> {
    ctx: &'a LoweringContext<'a>,
    name: String,
}

impl<'a> CommonAggregateLowering<'a> {
    pub fn new(ctx: &'a LoweringContext<'a>, name: &str) -> Self {
        Self { ctx, name: name.to_string() }
    }
}

impl FunctionLowering for CommonAggregateLowering<'_> {
    fn context(&self) -> &LoweringContext<'_> {
        self.ctx
    }

    fn identity(&self) -> LoweringResult<&str> {
        Ok(&self.name)
    }

    fn call_kind(&self) -> CallKind {
        CallKind::Aggregate
    }

    fn native_name_by_types(&self, arg_types: &[NativeType]) -> LoweringResult<String> {
        NativeNameTables::aggregate_by_types(&self.name, arg_types).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lowering::{LoweringError, LoweringRegistry},
        native::{ExpressionGraph, InputSchema, NodeKind},
        portable::{Expression, FunctionCall, FunctionMapping, PortableType, TypeKind},
    };

    fn mapping() -> FunctionMapping {
        FunctionMapping::from_entries([
            (1, "sum:fp64"),
            (2, "sum:i32"),
            (3, "count:i32"),
            (4, "median:i32"),
            (5, "bit_and:str"),
        ])
        .unwrap()
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .with("x", NativeType::nullable(NativeType::Float64))
            .with("n", NativeType::Int32)
            .with("s", NativeType::String)
    }

    fn aggregate_name(graph: &ExpressionGraph, id: crate::native::NodeId) -> String {
        let mut node = graph.node(id).unwrap();
        while let NodeKind::Cast { input } = node.kind {
            node = graph.node(input).unwrap();
        }
        match &node.kind {
            NodeKind::Aggregate { name, .. } => name.clone(),
            other => panic!("expected aggregate, got {:?}", other),
        }
    }

    #[test]
    fn float_sum_selects_compensated_summation() {
        let (m, r, s) = (mapping(), LoweringRegistry::new(), schema());
        let ctx = LoweringContext::new(&m, &r, &s);
        let call = FunctionCall::new(1, vec![Expression::field(0)], PortableType::nullable(TypeKind::Fp64));

        let mut graph = ExpressionGraph::new();
        let node = CommonAggregateLowering::new(&ctx, "sum").lower(&call, &mut graph, &mut vec![]).unwrap();
        assert_eq!(aggregate_name(&graph, node), "sumKahan");
        assert_eq!(graph.node(node).unwrap().result_name, "sumKahan(x)");
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn integer_sum_uses_plain_sum_and_reconciles_type() {
        let (m, r, s) = (mapping(), LoweringRegistry::new(), schema());
        let ctx = LoweringContext::new(&m, &r, &s);
        // declared nullable i64, native sum(Int32) is Int64
        let call = FunctionCall::new(2, vec![Expression::field(1)], PortableType::nullable(TypeKind::I64));

        let mut graph = ExpressionGraph::new();
        let node = CommonAggregateLowering::new(&ctx, "sum").lower(&call, &mut graph, &mut vec![]).unwrap();
        assert_eq!(aggregate_name(&graph, node), "sum");
        let out = graph.node(node).unwrap();
        assert!(matches!(out.kind, NodeKind::Cast { .. }));
        assert_eq!(out.result_name, "sum(n)");
        assert_eq!(out.result_type, NativeType::nullable(NativeType::Int64));
    }

    #[test]
    fn count_output_is_converted_from_unsigned() {
        let (m, r, s) = (mapping(), LoweringRegistry::new(), schema());
        let ctx = LoweringContext::new(&m, &r, &s);
        let call = FunctionCall::new(3, vec![Expression::field(1)], PortableType::required(TypeKind::I64));

        let mut graph = ExpressionGraph::new();
        let mut required = vec![];
        let node = CommonAggregateLowering::new(&ctx, "count").lower(&call, &mut graph, &mut required).unwrap();
        assert_eq!(graph.node(node).unwrap().result_type, NativeType::Int64);
        assert_eq!(required, vec!["n".to_string()]);
    }

    #[test]
    fn unsupported_aggregates_fail() {
        let (m, r, s) = (mapping(), LoweringRegistry::new(), schema());
        let ctx = LoweringContext::new(&m, &r, &s);

        let median = FunctionCall::new(4, vec![Expression::field(1)], PortableType::nullable(TypeKind::Fp64));
        let mut graph = ExpressionGraph::new();
        let err = CommonAggregateLowering::new(&ctx, "median").lower(&median, &mut graph, &mut vec![]).unwrap_err();
        assert_eq!(err, LoweringError::UnknownFunction("median".into()));
        assert!(graph.is_empty());

        let bit_and = FunctionCall::new(5, vec![Expression::field(2)], PortableType::required(TypeKind::String));
        let err = CommonAggregateLowering::new(&ctx, "bit_and").lower(&bit_and, &mut graph, &mut vec![]).unwrap_err();
        assert_eq!(err, LoweringError::UnknownFunction("bit_and(String)".into()));
    }
}
