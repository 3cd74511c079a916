use std::fs;

use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::graph::{
    CustomNodeConfig, EdgeDefinition, GraphDefinition, IntoGraph, NodeDefinition, NodeKind,
    PortDef, TimeUnit,
};

/// A flow graph document as exported by the visual editor: plain node and
/// edge lists plus an optional global display-scale hint. The hint is carried
/// through serialization untouched; the engine never consumes it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_scale: Option<f64>,
    #[serde(default)]
    pub nodes: Vec<DocumentNode>,
    #[serde(default)]
    pub edges: Vec<DocumentEdge>,
}

/// One node entry of a graph document. The `kind` string selects which of
/// the optional fields are meaningful; conversion rejects unknown kinds.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate_annual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Box<DocumentCustomConfig>>,
}

/// One edge entry of a graph document. The edge `kind` is always `"flow"`
/// today and is carried without interpretation.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lag_months: Option<u32>,
}

/// The embedded payload of a `custom` node: declared ports, the nested
/// internal document and the port bindings.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCustomConfig {
    #[serde(default)]
    pub inputs: Vec<DocumentPort>,
    #[serde(default)]
    pub outputs: Vec<DocumentPort>,
    #[serde(default)]
    pub graph: GraphDocument,
    #[serde(default)]
    pub input_bindings: AHashMap<String, String>,
    #[serde(default)]
    pub output_bindings: AHashMap<String, String>,
}

/// A declared port on a custom node.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPort {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphDocument {
    /// Parses a document from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::JsonParseError(e.to_string()))
    }

    /// Loads and parses a document from a JSON file on disk.
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|e| DocumentError::FileReadError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    /// Serializes the document back to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::JsonParseError(e.to_string()))
    }
}

impl IntoGraph for GraphDocument {
    /// Validates and converts the document into the canonical graph model.
    ///
    /// Node ids must be unique, every node kind and time unit must be known,
    /// and custom nodes must carry their embedded configuration. Nested
    /// documents inside custom nodes are converted recursively under the same
    /// rules. Edge ids are synthesized as `edge-{index}` when missing.
    fn into_graph(self) -> Result<GraphDefinition, DocumentError> {
        if let Some(duplicate) = self
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .duplicates()
            .next()
        {
            return Err(DocumentError::DuplicateNodeId(duplicate.to_string()));
        }

        let nodes = self
            .nodes
            .into_iter()
            .map(convert_node)
            .collect::<Result<Vec<_>, _>>()?;
        let edges = self
            .edges
            .into_iter()
            .enumerate()
            .map(convert_edge)
            .collect();

        Ok(GraphDefinition { nodes, edges })
    }
}

fn convert_node(node: DocumentNode) -> Result<NodeDefinition, DocumentError> {
    let DocumentNode {
        id,
        label,
        kind,
        base_value,
        time_unit,
        formula,
        interest_rate_annual,
        target_amount,
        custom,
    } = node;

    let kind = match kind.as_str() {
        "income" => NodeKind::Income {
            base_value: base_value.unwrap_or(0.0),
            time_unit: parse_time_unit(&id, time_unit)?,
        },
        "expense" => NodeKind::Expense {
            base_value: base_value.unwrap_or(0.0),
            time_unit: parse_time_unit(&id, time_unit)?,
        },
        "calc" => NodeKind::Calc { formula },
        "asset" => NodeKind::Asset {
            interest_rate_annual,
        },
        "output" => NodeKind::Output { target_amount },
        "value" => NodeKind::Value {
            base_value: base_value.unwrap_or(0.0),
        },
        "add" => NodeKind::Add,
        "subtract" => NodeKind::Subtract,
        "multiply" => NodeKind::Multiply,
        "divide" => NodeKind::Divide,
        "custom" => NodeKind::Custom(convert_custom(&id, custom)?),
        other => {
            return Err(DocumentError::UnknownNodeKind {
                node_id: id,
                kind: other.to_string(),
            });
        }
    };

    Ok(NodeDefinition {
        label: label.unwrap_or_else(|| id.clone()),
        id,
        kind,
    })
}

/// A missing time unit defaults to monthly, matching a missing base value
/// defaulting to zero.
fn parse_time_unit(node_id: &str, unit: Option<String>) -> Result<TimeUnit, DocumentError> {
    match unit.as_deref() {
        None | Some("per_month") => Ok(TimeUnit::PerMonth),
        Some("per_day") => Ok(TimeUnit::PerDay),
        Some("per_week") => Ok(TimeUnit::PerWeek),
        Some("per_year") => Ok(TimeUnit::PerYear),
        Some(other) => Err(DocumentError::UnknownTimeUnit {
            node_id: node_id.to_string(),
            unit: other.to_string(),
        }),
    }
}

fn convert_custom(
    node_id: &str,
    config: Option<Box<DocumentCustomConfig>>,
) -> Result<CustomNodeConfig, DocumentError> {
    let Some(config) = config else {
        return Err(DocumentError::MissingCustomConfig {
            node_id: node_id.to_string(),
        });
    };
    let config = *config;

    Ok(CustomNodeConfig {
        inputs: config.inputs.into_iter().map(convert_port).collect(),
        outputs: config.outputs.into_iter().map(convert_port).collect(),
        graph: config.graph.into_graph()?,
        input_bindings: config.input_bindings,
        output_bindings: config.output_bindings,
    })
}

fn convert_port(port: DocumentPort) -> PortDef {
    PortDef {
        label: port.label.unwrap_or_else(|| port.id.clone()),
        id: port.id,
    }
}

fn convert_edge((index, edge): (usize, DocumentEdge)) -> EdgeDefinition {
    EdgeDefinition {
        id: edge.id.unwrap_or_else(|| format!("edge-{index}")),
        source: edge.source,
        target: edge.target,
        source_port: edge.source_port,
        target_port: edge.target_port,
        weight: edge.weight,
        lag_months: edge.lag_months,
    }
}
