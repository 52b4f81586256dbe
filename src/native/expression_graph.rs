use std::{collections::HashMap, fmt};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use crate::native::{GraphError, NativeType, PrimitiveCatalog};

/// Stable index of a node inside one [`ExpressionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Column read from the input block.
    Input,
    Constant(Value),
    Function { name: String, args: Vec<NodeId> },
    Aggregate { name: String, args: Vec<NodeId> },
    /// Conversion of `input` to the node's result type.
    Cast { input: NodeId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub kind: NodeKind,
    pub result_name: String,
    pub result_type: NativeType,
}

impl GraphNode {
    pub fn args(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Function { args, .. } | NodeKind::Aggregate { args, .. } => args,
            NodeKind::Cast { input } => std::slice::from_ref(input),
            NodeKind::Input | NodeKind::Constant(_) => &[],
        }
    }
}

/// Append-only arena of native expression nodes.
///
/// Nodes reference each other by [`NodeId`] and are never removed. Other
/// parts of a plan refer to a node by its result name, so each name is
/// bound to exactly one node at a time. A name can only move to a newer node
/// that directly consumes a node built under that name (a cast or a null
/// patch), which keeps the graph a forward-built DAG.
#[derive(Debug, Default)]
pub struct ExpressionGraph {
    nodes: Vec<GraphNode>,
    /// result name -> node currently answering to it
    bindings: IndexMap<String, NodeId>,
    /// result name -> every node ever created under it, for structural sharing
    history: HashMap<String, Vec<NodeId>>,
    outputs: Vec<NodeId>,
}

impl ExpressionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Result<&GraphNode, GraphError> {
        self.nodes.get(id.0).ok_or(GraphError::InvalidNode(id.0))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Node currently bound to `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.bindings.get(name).copied()
    }

    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    pub fn result_types(&self, ids: &[NodeId]) -> Result<Vec<NativeType>, GraphError> {
        ids.iter().map(|id| self.node(*id).map(|n| n.result_type.clone())).collect()
    }

    /// Deterministic name for a call node: `name(arg1, arg2)`.
    pub fn call_result_name(&self, name: &str, args: &[NodeId]) -> Result<String, GraphError> {
        let mut arg_names = Vec::with_capacity(args.len());
        for id in args {
            arg_names.push(self.node(*id)?.result_name.as_str());
        }
        Ok(format!("{}({})", name, arg_names.join(", ")))
    }

    pub fn add_input(&mut self, name: &str, ty: NativeType) -> Result<NodeId, GraphError> {
        self.insert(NodeKind::Input, name, ty)
    }

    pub fn add_constant(&mut self, name: &str, ty: NativeType, value: Value) -> Result<NodeId, GraphError> {
        self.insert(NodeKind::Constant(value), name, ty)
    }

    pub fn add_function(&mut self, name: &str, args: &[NodeId], result_name: &str) -> Result<NodeId, GraphError> {
        let ty = PrimitiveCatalog::scalar_return_type(name, &self.result_types(args)?)?;
        self.insert(NodeKind::Function { name: name.to_string(), args: args.to_vec() }, result_name, ty)
    }

    pub fn add_aggregate(&mut self, name: &str, args: &[NodeId], result_name: &str) -> Result<NodeId, GraphError> {
        let ty = PrimitiveCatalog::aggregate_return_type(name, &self.result_types(args)?)?;
        self.insert(NodeKind::Aggregate { name: name.to_string(), args: args.to_vec() }, result_name, ty)
    }

    /// Converts `input` to `target`. Passing the input's own result name makes
    /// the cast take over that name.
    pub fn add_cast(&mut self, input: NodeId, target: NativeType, result_name: &str) -> Result<NodeId, GraphError> {
        self.node(input)?;
        self.insert(NodeKind::Cast { input }, result_name, target)
    }

    /// Appends `id` to the outputs, even if it is already there.
    pub fn add_output(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.node(id)?;
        self.outputs.push(id);
        Ok(())
    }

    /// Makes `id` an output, replacing any output with the same result name.
    pub fn add_or_replace_in_outputs(&mut self, id: NodeId) -> Result<(), GraphError> {
        let name = &self.node(id)?.result_name;
        let existing = self.outputs.iter().position(|o| &self.nodes[o.0].result_name == name);
        match existing {
            Some(pos) => self.outputs[pos] = id,
            None => self.outputs.push(id),
        }
        Ok(())
    }

    fn insert(&mut self, kind: NodeKind, result_name: &str, result_type: NativeType) -> Result<NodeId, GraphError> {
        let node = GraphNode { kind, result_name: result_name.to_string(), result_type };

        if let Some(same) = self.history.get(result_name)
            .and_then(|ids| ids.iter().find(|id| self.nodes[id.0] == node))
        {
            return Ok(*same);
        }

        // A name moves only to a node consuming something already built under it.
        if let Some(previous) = self.history.get(result_name) {
            if !node.args().iter().any(|arg| previous.contains(arg)) {
                return Err(GraphError::DuplicateName(result_name.to_string()));
            }
        }

        let id = NodeId(self.nodes.len());
        trace!(node = %id, name = %result_name, ty = %node.result_type, "adding expression node");
        self.nodes.push(node);
        self.bindings.insert(result_name.to_string(), id);
        self.history.entry(result_name.to_string()).or_default().push(id);
        Ok(id)
    }
}
