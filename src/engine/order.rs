use std::collections::VecDeque;

use ahash::AHashMap;

use crate::error::ComputeError;
use crate::graph::{EdgeDefinition, NodeDefinition};

/// Computes a dependency-respecting evaluation order with Kahn's algorithm.
///
/// Nodes enter a FIFO queue as their in-degree drops to zero, seeded in
/// definition order so the result is stable for a given graph. Edges whose
/// endpoints are not part of the node list are ignored. If the order comes
/// back shorter than the node count, some nodes sit on a cycle and the whole
/// pass is rejected.
pub(crate) fn topological_order<'a>(
    nodes: &'a [NodeDefinition],
    edges: &'a [EdgeDefinition],
) -> Result<Vec<&'a str>, ComputeError> {
    let mut in_degree: AHashMap<&str, usize> =
        nodes.iter().map(|node| (node.id.as_str(), 0)).collect();
    let mut outgoing: AHashMap<&str, Vec<&str>> = AHashMap::new();

    for edge in edges {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        if !in_degree.contains_key(source) || !in_degree.contains_key(target) {
            continue;
        }
        outgoing.entry(source).or_default().push(target);
        if let Some(degree) = in_degree.get_mut(target) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = nodes
        .iter()
        .map(|node| node.id.as_str())
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(id) = queue.pop_front() {
        order.push(id);
        if let Some(targets) = outgoing.get(id) {
            for &target in targets {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    if order.len() < in_degree.len() {
        return Err(ComputeError::CycleDetected);
    }
    Ok(order)
}
