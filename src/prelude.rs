//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! kakeibo crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! // Use the prelude to get easy access to all the core types.
//! use kakeibo::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load a graph document and convert it to the canonical model
//! let document = GraphDocument::from_file("path/to/graph.json")?;
//! let graph = document.into_graph()?;
//!
//! // Compute the graph and inspect the results
//! let outcome = compute_graph(&graph);
//!
//! for node in &outcome.nodes {
//!     println!("{}: {:?}", node.label, node.value);
//! }
//! for (node_id, message) in &outcome.errors {
//!     println!("{node_id} failed: {message}");
//! }
//! # Ok(())
//! # }
//! ```

// Core computation
pub use crate::engine::{
    ComputeOutcome, ComputedNode, MAX_NESTING_DEPTH, PROJECTION_MONTHS, compute_graph,
};

// Canonical graph model
pub use crate::graph::{
    CustomNodeConfig, EdgeDefinition, GraphDefinition, IntoGraph, NodeDefinition, NodeKind,
    PortDef, TimeUnit,
};

// Built-in document format
pub use crate::document::{
    DocumentCustomConfig, DocumentEdge, DocumentNode, DocumentPort, GraphDocument,
};

// Error types
pub use crate::error::{ComputeError, DocumentError, FormulaError, NodeFault};

// Map type used across the public API
pub use ahash::AHashMap;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
