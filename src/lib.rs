//! # Kakeibo - Financial Flow Graph Compute Engine
//!
//! **Kakeibo** is a deterministic compute engine for node-based financial flow
//! graphs. A graph wires recurring incomes, expenses, formula nodes,
//! compounding assets and savings goals together with flow edges; the engine
//! orders the nodes by dependency, evaluates each one according to its kind
//! and reports every per-node failure without aborting the rest of the pass.
//!
//! ## Core Workflow
//!
//! The engine is designed to be format-agnostic. It operates on a canonical
//! internal model of a "graph definition." The primary workflow is:
//!
//! 1.  **Load Your Data**: Parse your editor's export format into your own Rust structs, or use the built-in [`document::GraphDocument`] for the plain JSON format.
//! 2.  **Convert to Kakeibo's Model**: Implement the [`graph::IntoGraph`] trait for your structs to provide a translation layer into a [`graph::GraphDefinition`].
//! 3.  **Compute**: Call [`engine::compute_graph`]. Every call is a pure, single pass over the graph: same definition in, same values out, no caches and no mutation.
//! 4.  **Render**: Apply the returned values, projection series and error map to your presentation state.
//!
//! ## Quick Start
//!
//! The following example builds a small graph by hand and computes it.
//!
//! ```rust
//! use kakeibo::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let graph = GraphDefinition {
//!         nodes: vec![
//!             NodeDefinition {
//!                 id: "salary".to_string(),
//!                 label: "Salary".to_string(),
//!                 kind: NodeKind::Income {
//!                     base_value: 300.0,
//!                     time_unit: TimeUnit::PerWeek,
//!                 },
//!             },
//!             NodeDefinition {
//!                 id: "savings".to_string(),
//!                 label: "Savings".to_string(),
//!                 kind: NodeKind::Asset {
//!                     interest_rate_annual: Some(0.04),
//!                 },
//!             },
//!         ],
//!         edges: vec![EdgeDefinition {
//!             id: "e1".to_string(),
//!             source: "salary".to_string(),
//!             target: "savings".to_string(),
//!             ..Default::default()
//!         }],
//!     };
//!
//!     let outcome = compute_graph(&graph);
//!
//!     assert!(outcome.errors.is_empty());
//!     assert_eq!(outcome.value_of("salary"), Some(1300.0));
//!     assert_eq!(outcome.series_of("savings").map(|s| s.len()), Some(120));
//!
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod engine;
pub mod error;
pub mod formula;
pub mod graph;
pub mod prelude;
