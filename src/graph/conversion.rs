use crate::error::DocumentError;

use super::GraphDefinition;

/// A trait for converting custom user data models into a kakeibo
/// [`GraphDefinition`].
///
/// The engine never parses user formats itself. Implement this trait for
/// whatever structure your editor or storage layer produces and hand the
/// result to [`compute_graph`](crate::engine::compute_graph). The built-in
/// [`GraphDocument`](crate::document::GraphDocument) implements it for the
/// plain JSON export format.
///
/// # Example
///
/// ```rust
/// use kakeibo::error::DocumentError;
/// use kakeibo::graph::{GraphDefinition, IntoGraph, NodeDefinition, NodeKind, TimeUnit};
///
/// struct Ledger {
///     monthly_incomes: Vec<(String, f64)>,
/// }
///
/// impl IntoGraph for Ledger {
///     fn into_graph(self) -> Result<GraphDefinition, DocumentError> {
///         let nodes = self
///             .monthly_incomes
///             .into_iter()
///             .map(|(name, amount)| NodeDefinition {
///                 id: name.clone(),
///                 label: name,
///                 kind: NodeKind::Income {
///                     base_value: amount,
///                     time_unit: TimeUnit::PerMonth,
///                 },
///             })
///             .collect();
///         Ok(GraphDefinition {
///             nodes,
///             edges: Vec::new(),
///         })
///     }
/// }
///
/// let ledger = Ledger {
///     monthly_incomes: vec![("salary".to_string(), 2600.0)],
/// };
/// let graph = ledger.into_graph().unwrap();
/// assert_eq!(graph.nodes.len(), 1);
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a computable flow graph.
    fn into_graph(self) -> Result<GraphDefinition, DocumentError>;
}

impl IntoGraph for GraphDefinition {
    fn into_graph(self) -> Result<GraphDefinition, DocumentError> {
        Ok(self)
    }
}
