use thiserror::Error;

/// Errors that can occur while tokenizing or evaluating a formula expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unexpected character '{ch}' at byte {pos} in formula")]
    UnexpectedCharacter { ch: char, pos: usize },

    #[error("Mismatched parentheses in formula")]
    MismatchedParentheses,

    #[error("Comma outside of a function call in formula")]
    MisplacedComma,

    #[error("Formula references unbound variable '{0}'")]
    UnknownVariable(String),

    #[error("Formula calls unsupported function '{0}'")]
    UnknownFunction(String),

    #[error("'{symbol}' is missing an operand in formula")]
    MissingOperands { symbol: String },

    #[error("Formula did not reduce to a single value")]
    UnbalancedExpression,
}

/// Per-node evaluation failures, captured in the engine's error map.
///
/// A fault never aborts the pass: the failing node's value and series stay
/// unset, its message is recorded, and every independent node still computes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeFault {
    #[error("Calc node has no formula")]
    MissingFormula,

    #[error("Formula evaluation failed: {0}")]
    Formula(#[from] FormulaError),

    #[error("Asset node has no annual interest rate")]
    MissingInterestRate,

    #[error("Output node has no target amount")]
    MissingTargetAmount,

    #[error("Missing asset timeseries for output node")]
    MissingAssetSeries,
}

/// Whole-graph structural failures. The engine maps these onto every node in
/// the error map rather than raising them to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeError {
    #[error("Cycle detected in graph")]
    CycleDetected,
}

/// Errors that can occur when parsing a graph document or converting a custom
/// user format into a [`GraphDefinition`](crate::graph::GraphDefinition).
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    #[error("Failed to parse graph document JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to read graph document '{path}': {message}")]
    FileReadError { path: String, message: String },

    #[error("Node '{node_id}' has an unknown kind: '{kind}'")]
    UnknownNodeKind { node_id: String, kind: String },

    #[error("Node '{node_id}' has an unknown time unit: '{unit}'")]
    UnknownTimeUnit { node_id: String, unit: String },

    #[error("Custom node '{node_id}' has no embedded configuration")]
    MissingCustomConfig { node_id: String },

    #[error("Duplicate node id '{0}' in graph document")]
    DuplicateNodeId(String),
}
