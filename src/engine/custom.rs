use ahash::AHashMap;

use crate::graph::{CustomNodeConfig, GraphDefinition, NodeKind, TimeUnit};

use super::compute_with_depth;
use super::kinds::Inbound;

/// Upper bound on composite nesting. A configuration that embeds composites
/// past this depth gets a problem entry instead of unbounded recursion.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Best-effort result of evaluating a composite node: its own scalar value,
/// the per-output-port values exposed to the enclosing graph, and every
/// binding problem collected along the way. A problem never clears the
/// value; whatever could be computed is kept.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompositeResult {
    pub value: f64,
    pub ports: AHashMap<String, f64>,
    pub problems: Vec<String>,
}

/// Evaluates a custom node by routing its inbound edges onto the internal
/// graph, computing that graph in isolation, and reading the output bindings
/// back out.
pub(crate) fn evaluate_composite(
    config: &CustomNodeConfig,
    inbound: &[Inbound],
    depth: usize,
) -> CompositeResult {
    let mut problems = Vec::new();

    if config.inputs.is_empty() {
        problems.push("custom node declares no input ports".to_string());
    }
    if config.outputs.is_empty() {
        problems.push("custom node declares no output ports".to_string());
    }

    let port_totals = aggregate_port_inputs(config, inbound, &mut problems);

    // Evaluation always works on a fresh copy of the internal graph so the
    // caller's definition is never mutated between passes.
    let mut inner = config.graph.clone();
    bind_inputs(config, &port_totals, &mut inner, &mut problems);

    let inner_outcome = if depth >= MAX_NESTING_DEPTH {
        problems.push(format!(
            "custom node nesting exceeds {MAX_NESTING_DEPTH} levels, internal graph skipped"
        ));
        None
    } else {
        Some(compute_with_depth(&inner, depth + 1))
    };

    if let Some(outcome) = &inner_outcome {
        if !outcome.errors.is_empty() {
            problems.push("Internal graph errors".to_string());
        }
    }

    let mut ports = AHashMap::new();
    for port in &config.outputs {
        let value = match config.output_bindings.get(&port.id) {
            None => {
                problems.push(format!(
                    "output port '{}' is not bound to an internal node",
                    port.id
                ));
                0.0
            }
            Some(binding) if !inner.nodes.iter().any(|node| node.id == *binding) => {
                problems.push(format!(
                    "output port '{}' is bound to unknown internal node '{}'",
                    port.id, binding
                ));
                0.0
            }
            Some(binding) => inner_outcome
                .as_ref()
                .and_then(|outcome| outcome.value_of(binding))
                .unwrap_or(0.0),
        };
        ports.insert(port.id.clone(), value);
    }

    // With no output ports this sums to 0, with one it is that port's value.
    let value: f64 = config
        .outputs
        .iter()
        .filter_map(|port| ports.get(&port.id))
        .sum();

    CompositeResult {
        value,
        ports,
        problems,
    }
}

/// Sums inbound edge values per requested input port. Edges naming a port
/// the node does not declare are reported and dropped; edges without a port
/// default to the first declared input.
fn aggregate_port_inputs(
    config: &CustomNodeConfig,
    inbound: &[Inbound],
    problems: &mut Vec<String>,
) -> AHashMap<String, f64> {
    let default_port = config.inputs.first().map(|port| port.id.as_str());
    let mut totals: AHashMap<String, f64> = AHashMap::new();

    for edge in inbound {
        let Some(port) = edge.port.or(default_port) else {
            // No port requested and none declared; already reported above.
            continue;
        };
        if !config.inputs.iter().any(|declared| declared.id == port) {
            problems.push(format!(
                "edge from '{}' requests unknown input port '{}'",
                edge.source, port
            ));
            continue;
        }
        *totals.entry(port.to_string()).or_insert(0.0) += edge.value;
    }

    totals
}

/// Routes aggregated port totals onto the internal nodes named by the input
/// bindings. A bound node must be an income node; its base value is replaced
/// by the port total as a plain monthly amount.
fn bind_inputs(
    config: &CustomNodeConfig,
    totals: &AHashMap<String, f64>,
    inner: &mut GraphDefinition,
    problems: &mut Vec<String>,
) {
    for port in &config.inputs {
        let Some(binding) = config.input_bindings.get(&port.id) else {
            problems.push(format!(
                "input port '{}' is not bound to an internal node",
                port.id
            ));
            continue;
        };
        let Some(node) = inner.nodes.iter_mut().find(|node| node.id == *binding) else {
            problems.push(format!(
                "input port '{}' is bound to unknown internal node '{}'",
                port.id, binding
            ));
            continue;
        };
        match &mut node.kind {
            NodeKind::Income {
                base_value,
                time_unit,
            } => {
                *base_value = totals.get(&port.id).copied().unwrap_or(0.0);
                *time_unit = TimeUnit::PerMonth;
            }
            other => {
                problems.push(format!(
                    "input port '{}' must bind to an income node, found '{}'",
                    port.id,
                    other.name()
                ));
            }
        }
    }
}
