//! The canonical in-memory graph model consumed by the compute engine.

pub mod conversion;
pub mod definition;

pub use conversion::*;
pub use definition::*;
