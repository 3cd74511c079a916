//! The built-in JSON document format and its conversion into the canonical
//! graph model.

pub mod model;

pub use model::*;
