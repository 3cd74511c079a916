//! The compute engine: dependency ordering, per-kind evaluation rules and
//! composite recursion, with per-node failure isolation.
//!
//! A pass is pure and deterministic. The engine never mutates the supplied
//! [`GraphDefinition`]; all results come back in a [`ComputeOutcome`].

mod custom;
mod kinds;
mod order;

pub use custom::MAX_NESTING_DEPTH;
pub use kinds::PROJECTION_MONTHS;

use ahash::AHashMap;

use crate::error::{ComputeError, NodeFault};
use crate::graph::{CustomNodeConfig, GraphDefinition, NodeDefinition, NodeKind};

use custom::CompositeResult;
use kinds::{Inbound, KindValue};

/// A node annotated with the results of one computation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    /// Scalar result. `None` when the node faulted or the graph was cyclic.
    pub value: Option<f64>,
    /// Monthly projection over [`PROJECTION_MONTHS`], for asset and output
    /// kinds.
    pub series: Option<Vec<f64>>,
}

/// The complete result of one computation pass: every input node with its
/// computed fields, plus the per-node error map.
///
/// An entry in `errors` does not always mean the node has no value. Custom
/// nodes keep their best-effort value alongside their binding problems, so a
/// node can carry both.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeOutcome {
    /// One entry per input node, in definition order.
    pub nodes: Vec<ComputedNode>,
    /// Node id to failure message, for every node that reported a problem.
    pub errors: AHashMap<String, String>,
}

impl ComputeOutcome {
    /// Computed value of a node, if the pass produced one.
    pub fn value_of(&self, node_id: &str) -> Option<f64> {
        self.nodes
            .iter()
            .find(|node| node.id == node_id)
            .and_then(|node| node.value)
    }

    /// Monthly projection series of a node, for asset and output kinds.
    pub fn series_of(&self, node_id: &str) -> Option<&[f64]> {
        self.nodes
            .iter()
            .find(|node| node.id == node_id)
            .and_then(|node| node.series.as_deref())
    }

    /// Failure message recorded for a node, if any.
    pub fn error_of(&self, node_id: &str) -> Option<&str> {
        self.errors.get(node_id).map(String::as_str)
    }
}

/// Computes every node of a flow graph in dependency order.
///
/// The pass is a pure function of the graph: no caches, no shared state, no
/// mutation of the input. Per-node failures (a calc without a formula, an
/// unbound formula variable, an output with nothing feeding it) are recorded
/// in the outcome's error map while every independent node still computes.
/// Only a dependency cycle rejects the pass as a whole, and even that is
/// reported per node rather than raised.
///
/// # Arguments
///
/// * `graph`: The canonical graph definition, usually obtained through
///   [`IntoGraph`](crate::graph::IntoGraph).
///
/// # Returns
///
/// A [`ComputeOutcome`] carrying one [`ComputedNode`] per input node plus the
/// error map.
pub fn compute_graph(graph: &GraphDefinition) -> ComputeOutcome {
    compute_with_depth(graph, 0)
}

/// Runs one pass at the given composite nesting depth. Custom nodes recurse
/// through here with `depth + 1`.
pub(crate) fn compute_with_depth(graph: &GraphDefinition, depth: usize) -> ComputeOutcome {
    ComputePass::new(graph, depth).run()
}

/// Working state of a single pass over one graph.
struct ComputePass<'a> {
    graph: &'a GraphDefinition,
    index: AHashMap<&'a str, &'a NodeDefinition>,
    depth: usize,
    values: AHashMap<String, f64>,
    series: AHashMap<String, Vec<f64>>,
    /// Per-output-port values of evaluated custom nodes.
    port_outputs: AHashMap<String, AHashMap<String, f64>>,
    errors: AHashMap<String, String>,
}

/// What evaluating one node did to the pass state.
enum NodeUpdate {
    Value(KindValue),
    Fault(NodeFault),
    Composite(CompositeResult),
}

impl<'a> ComputePass<'a> {
    fn new(graph: &'a GraphDefinition, depth: usize) -> Self {
        let index = graph
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node))
            .collect();
        Self {
            graph,
            index,
            depth,
            values: AHashMap::new(),
            series: AHashMap::new(),
            port_outputs: AHashMap::new(),
            errors: AHashMap::new(),
        }
    }

    fn run(mut self) -> ComputeOutcome {
        let order = match order::topological_order(&self.graph.nodes, &self.graph.edges) {
            Ok(order) => order,
            Err(error) => return self.fail_all(error),
        };

        for id in order {
            let Some(node) = self.index.get(id).copied() else {
                continue;
            };
            let update = {
                let inbound = self.gather_inbound(id);
                evaluate_node(node, &inbound, self.depth)
            };
            self.apply(node, update);
        }

        self.into_outcome()
    }

    /// Resolves the inbound edges of a node against the values computed so
    /// far. Edges from unknown sources are skipped; a custom source is read
    /// through its output ports.
    fn gather_inbound(&self, target: &str) -> Vec<Inbound<'_>> {
        let mut inbound = Vec::new();
        for edge in &self.graph.edges {
            if edge.target != target {
                continue;
            }
            let source = edge.source.as_str();
            let Some(source_node) = self.index.get(source).copied() else {
                continue;
            };
            let value = match &source_node.kind {
                NodeKind::Custom(config) => {
                    self.custom_port_value(source, edge.source_port.as_deref(), config)
                }
                _ => self.values.get(source).copied().unwrap_or(0.0),
            };
            inbound.push(Inbound {
                source,
                port: edge.target_port.as_deref(),
                value,
                series: self.series.get(source).map(Vec::as_slice),
            });
        }
        inbound
    }

    /// Value a custom source exposes on the requested output port, falling
    /// back to its first declared output when the edge names none.
    fn custom_port_value(
        &self,
        source: &str,
        requested: Option<&str>,
        config: &CustomNodeConfig,
    ) -> f64 {
        let port = requested.or_else(|| config.outputs.first().map(|p| p.id.as_str()));
        let Some(port) = port else {
            return 0.0;
        };
        self.port_outputs
            .get(source)
            .and_then(|ports| ports.get(port))
            .copied()
            .unwrap_or(0.0)
    }

    fn apply(&mut self, node: &NodeDefinition, update: NodeUpdate) {
        match update {
            NodeUpdate::Value(KindValue { value, series }) => {
                self.values.insert(node.id.clone(), value);
                if let Some(series) = series {
                    self.series.insert(node.id.clone(), series);
                }
            }
            NodeUpdate::Fault(fault) => {
                self.errors.insert(node.id.clone(), fault.to_string());
            }
            NodeUpdate::Composite(result) => {
                self.values.insert(node.id.clone(), result.value);
                self.port_outputs.insert(node.id.clone(), result.ports);
                if !result.problems.is_empty() {
                    self.errors.insert(node.id.clone(), result.problems.join("; "));
                }
            }
        }
    }

    /// Marks every node with the same structural error and produces an
    /// outcome without any computed values.
    fn fail_all(mut self, error: ComputeError) -> ComputeOutcome {
        let message = error.to_string();
        for node in &self.graph.nodes {
            self.errors.insert(node.id.clone(), message.clone());
        }
        self.into_outcome()
    }

    fn into_outcome(mut self) -> ComputeOutcome {
        let nodes = self
            .graph
            .nodes
            .iter()
            .map(|node| ComputedNode {
                id: node.id.clone(),
                label: node.label.clone(),
                kind: node.kind.clone(),
                value: self.values.get(node.id.as_str()).copied(),
                series: self.series.remove(node.id.as_str()),
            })
            .collect();
        ComputeOutcome {
            nodes,
            errors: self.errors,
        }
    }
}

/// Evaluates one node against its resolved inbound edges. Custom nodes
/// recurse into their internal graph; every other kind is a local rule.
fn evaluate_node(node: &NodeDefinition, inbound: &[Inbound], depth: usize) -> NodeUpdate {
    let result = match &node.kind {
        NodeKind::Income {
            base_value,
            time_unit,
        }
        | NodeKind::Expense {
            base_value,
            time_unit,
        } => Ok(KindValue::scalar(
            base_value * time_unit.monthly_multiplier(),
        )),
        NodeKind::Calc { formula } => kinds::evaluate_calc(formula.as_deref(), inbound),
        NodeKind::Asset {
            interest_rate_annual,
        } => kinds::evaluate_asset(*interest_rate_annual, inbound),
        NodeKind::Output { target_amount } => kinds::evaluate_output(*target_amount, inbound),
        NodeKind::Value { base_value } => Ok(KindValue::scalar(*base_value)),
        NodeKind::Add => Ok(KindValue::scalar(
            inbound.iter().map(|edge| edge.value).sum(),
        )),
        NodeKind::Multiply => Ok(KindValue::scalar(
            inbound.iter().map(|edge| edge.value).product(),
        )),
        NodeKind::Subtract => {
            let (a, b) = kinds::two_port_operands(inbound);
            Ok(KindValue::scalar(a - b))
        }
        NodeKind::Divide => {
            let (a, b) = kinds::two_port_operands(inbound);
            Ok(KindValue::scalar(a / b))
        }
        NodeKind::Custom(config) => {
            return NodeUpdate::Composite(custom::evaluate_composite(config, inbound, depth));
        }
    };

    match result {
        Ok(value) => NodeUpdate::Value(value),
        Err(fault) => NodeUpdate::Fault(fault),
    }
}
