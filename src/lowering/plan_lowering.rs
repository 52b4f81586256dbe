use tracing::{debug, info};

use crate::{
    lowering::{LoweringConfig, LoweringContext, LoweringRegistry, LoweringResult, PlanWalker},
    native::ExpressionGraph,
    portable::PortablePlan,
};

/// Result of lowering a whole plan fragment.
#[derive(Debug)]
pub struct LoweredPlan {
    pub graph: ExpressionGraph,
    /// Input columns the graph reads, in first-use order.
    pub required_columns: Vec<String>,
}

pub struct PlanLowering;

impl PlanLowering {
    /// Lowers every projection and then every measure of `plan`. Each result
    /// becomes a graph output; the first failure aborts the whole fragment.
    pub fn lower_plan(
        plan: &PortablePlan,
        registry: &LoweringRegistry,
        config: LoweringConfig,
    ) -> LoweringResult<LoweredPlan> {
        let mapping = plan.function_mapping()?;
        let input = plan.input_schema();
        let ctx = LoweringContext::with_config(&mapping, registry, &input, config);

        let mut graph = ExpressionGraph::new();
        let mut required_columns = Vec::new();

        for (i, expr) in plan.projections.iter().enumerate() {
            let node = ctx.lower_expression(expr, &mut graph, &mut required_columns)?;
            graph.add_output(node)?;
            debug!(projection = i, node = %node, "lowered projection");
        }
        for (i, call) in plan.measures.iter().enumerate() {
            let published = graph.outputs().len();
            let node = ctx.lower_aggregate_call(call, &mut graph, &mut required_columns)?;
            // A null patch publishes its node itself when no output has its name yet.
            if graph.outputs().len() == published {
                graph.add_output(node)?;
            }
            debug!(measure = i, node = %node, "lowered measure");
        }

        info!(
            nodes = graph.len(),
            outputs = graph.outputs().len(),
            columns = ?required_columns,
            "lowered plan"
        );
        Ok(LoweredPlan { graph, required_columns })
    }

    /// Same as [`lower_plan`](Self::lower_plan) with the process-wide registry.
    pub fn lower_with_global(plan: &PortablePlan, config: LoweringConfig) -> LoweringResult<LoweredPlan> {
        Self::lower_plan(plan, LoweringRegistry::global()?, config)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        lowering::LoweringError,
        native::{_tests::graph_eval, NativeType, NodeKind},
        portable::{Expression, PortableType, TypeKind},
    };

    const PLAN: &str = r#"{
        "extensions": [
            {"function_reference": 1, "signature": "add:i32_i32"},
            {"function_reference": 2, "signature": "collect_list:i32"},
            {"function_reference": 3, "signature": "collect_set:i32"}
        ],
        "input": [
            {"name": "a", "type": {"kind": "i32"}},
            {"name": "b", "type": {"kind": "i32", "nullable": true}}
        ],
        "projections": [
            {"scalar_function": {
                "function_reference": 1,
                "arguments": [{"field_reference": 0}, {"literal": {"i32": 1}}],
                "output_type": {"kind": "i64"}
            }}
        ],
        "measures": [
            {"function_reference": 2,
             "arguments": [{"field_reference": 1}],
             "output_type": {"kind": {"list": {"kind": "i32"}}}},
            {"function_reference": 3,
             "arguments": [{"field_reference": 1}],
             "output_type": {"kind": {"list": {"kind": "i32"}}}}
        ]
    }"#;

    fn names(lowered: &LoweredPlan) -> Vec<String> {
        lowered
            .graph
            .outputs()
            .iter()
            .map(|id| lowered.graph.node(*id).unwrap().result_name.clone())
            .collect()
    }

    #[test]
    fn lowers_projections_and_measures_into_outputs() {
        let plan = PortablePlan::from_json(PLAN).unwrap();
        let registry = LoweringRegistry::default_registry().unwrap();
        let lowered = PlanLowering::lower_plan(&plan, &registry, LoweringConfig::default()).unwrap();

        let outputs = names(&lowered);
        assert_eq!(outputs.len(), 3);
        assert!(outputs[0].starts_with("plus(a, 1_"));
        assert_eq!(outputs[1], "groupArray(b)");
        assert_eq!(outputs[2], "groupUniqArray(b)");
        assert_eq!(lowered.required_columns, vec!["a", "b"]);

        for id in &lowered.graph.outputs()[1..] {
            let node = lowered.graph.node(*id).unwrap();
            assert!(matches!(&node.kind, NodeKind::Function { name, .. } if name == "ifNull"));
            assert_eq!(node.result_type, NativeType::array(NativeType::Int32));
        }

        let group: Vec<_> = [json!({"a": 1, "b": null}), json!({"a": 2, "b": null})]
            .iter()
            .map(|r| r.as_object().unwrap().clone())
            .collect();
        let list = lowered.graph.outputs()[1];
        assert_eq!(graph_eval::eval_group(&lowered.graph, list, &group), json!([]));
        assert_eq!(graph_eval::eval_row(&lowered.graph, lowered.graph.outputs()[0], &group[1]), json!(3));
    }

    #[test]
    fn repeated_projections_and_measures_keep_their_arity() {
        let mut plan = PortablePlan::from_json(PLAN).unwrap();
        plan.projections = vec![Expression::field(0), Expression::field(0)];
        plan.measures = vec![plan.measures[0].clone(), plan.measures[0].clone()];

        let registry = LoweringRegistry::default_registry().unwrap();
        let lowered = PlanLowering::lower_plan(&plan, &registry, LoweringConfig::default()).unwrap();

        let outputs = lowered.graph.outputs();
        assert_eq!(outputs.len(), 4);
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[2], outputs[3]);
        assert_eq!(names(&lowered), vec!["a", "a", "groupArray(b)", "groupArray(b)"]);
        assert_eq!(lowered.required_columns, vec!["a", "b"]);
    }

    #[test]
    fn one_call_declared_with_two_output_types() {
        let mut plan = PortablePlan::from_json(PLAN).unwrap();
        let add = |output_type| Expression::call(1, vec![Expression::field(0), Expression::field(0)], output_type);
        plan.projections = vec![
            add(PortableType::required(TypeKind::I32)),
            add(PortableType::nullable(TypeKind::I64)),
        ];
        plan.measures.clear();

        let lowered = PlanLowering::lower_with_global(&plan, LoweringConfig::default()).unwrap();
        let types: Vec<_> = lowered
            .graph
            .outputs()
            .iter()
            .map(|id| lowered.graph.node(*id).unwrap().result_type.clone())
            .collect();
        assert_eq!(types, vec![NativeType::Int32, NativeType::nullable(NativeType::Int64)]);
        assert_eq!(names(&lowered), vec!["plus(a, a)", "plus(a, a)"]);
    }

    #[test]
    fn empty_plan_lowers_to_empty_graph() {
        let lowered = PlanLowering::lower_with_global(&PortablePlan::default(), LoweringConfig::default()).unwrap();
        assert!(lowered.graph.is_empty());
        assert!(lowered.required_columns.is_empty());
    }

    #[test]
    fn any_failure_fails_the_plan() {
        let mut plan = PortablePlan::from_json(PLAN).unwrap();
        plan.measures[0].function_reference = 42;
        let err = PlanLowering::lower_with_global(&plan, LoweringConfig::default()).unwrap_err();
        assert_eq!(err, LoweringError::UnknownFunctionReference(42));

        let mut plan = PortablePlan::from_json(PLAN).unwrap();
        plan.extensions[0].signature = "add".into();
        let err = PlanLowering::lower_with_global(&plan, LoweringConfig::default()).unwrap_err();
        assert_eq!(err, LoweringError::InvalidSignature("add".into()));
    }

    #[test]
    fn without_the_registry_collect_results_stay_nullable() {
        let plan = PortablePlan::from_json(PLAN).unwrap();
        let lowered = PlanLowering::lower_plan(&plan, &LoweringRegistry::new(), LoweringConfig::lenient_nullability())
            .unwrap();

        let list = lowered.graph.outputs()[1];
        let node = lowered.graph.node(list).unwrap();
        assert!(matches!(&node.kind, NodeKind::Aggregate { name, .. } if name == "groupArray"));
        assert!(node.result_type.is_nullable());

        let all_null = vec![json!({"b": null}).as_object().unwrap().clone()];
        assert_eq!(graph_eval::eval_group(&lowered.graph, list, &all_null), Value::Null);
    }
}
