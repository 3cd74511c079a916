use ahash::AHashMap;

/// The complete, canonical definition of a financial flow graph, ready for
/// computation. This is the target structure for any custom document
/// conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphDefinition {
    pub nodes: Vec<NodeDefinition>,
    pub edges: Vec<EdgeDefinition>,
}

/// A single node of a flow graph: a stable identity, a display label and the
/// kind-specific configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDefinition {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
}

/// The closed set of node kinds. Each variant carries exactly the fields that
/// are meaningful for it; optional fields are configuration a user may not
/// have filled in yet, reported as per-node faults at compute time.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A recurring inflow, normalized to a monthly amount.
    Income { base_value: f64, time_unit: TimeUnit },
    /// A recurring outflow, normalized to a monthly amount.
    Expense { base_value: f64, time_unit: TimeUnit },
    /// A formula over the values of incoming nodes, keyed by source node id.
    Calc { formula: Option<String> },
    /// A compounding balance fed by incoming monthly contributions.
    Asset { interest_rate_annual: Option<f64> },
    /// A savings goal checked against the combined incoming asset series.
    Output { target_amount: Option<f64> },
    /// A constant scalar, independent of time units.
    Value { base_value: f64 },
    /// Sum of all incoming values.
    Add,
    /// Difference of the `a` and `b` input ports.
    Subtract,
    /// Product of all incoming values.
    Multiply,
    /// Quotient of the `a` and `b` input ports.
    Divide,
    /// A reusable composite wrapping its own internal graph behind ports.
    Custom(CustomNodeConfig),
}

impl NodeKind {
    /// The document-format name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Income { .. } => "income",
            NodeKind::Expense { .. } => "expense",
            NodeKind::Calc { .. } => "calc",
            NodeKind::Asset { .. } => "asset",
            NodeKind::Output { .. } => "output",
            NodeKind::Value { .. } => "value",
            NodeKind::Add => "add",
            NodeKind::Subtract => "subtract",
            NodeKind::Multiply => "multiply",
            NodeKind::Divide => "divide",
            NodeKind::Custom(_) => "custom",
        }
    }
}

/// How often a base value recurs. The engine computes in months, so every
/// unit converts through a fixed monthly multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    PerDay,
    PerWeek,
    PerMonth,
    PerYear,
}

impl TimeUnit {
    /// Multiplier taking one occurrence of a value to its monthly equivalent
    /// (30 days per month, 52 weeks per year).
    pub fn monthly_multiplier(self) -> f64 {
        match self {
            TimeUnit::PerDay => 30.0,
            TimeUnit::PerWeek => 52.0 / 12.0,
            TimeUnit::PerMonth => 1.0,
            TimeUnit::PerYear => 1.0 / 12.0,
        }
    }

    /// The document-format name of this unit.
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::PerDay => "per_day",
            TimeUnit::PerWeek => "per_week",
            TimeUnit::PerMonth => "per_month",
            TimeUnit::PerYear => "per_year",
        }
    }
}

/// A named input or output slot declared on a custom node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortDef {
    pub id: String,
    pub label: String,
}

/// The embedded configuration of a `custom` node: the declared ports, the
/// owned internal graph, and the bindings routing ports onto internal nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomNodeConfig {
    pub inputs: Vec<PortDef>,
    pub outputs: Vec<PortDef>,
    pub graph: GraphDefinition,
    /// Input port id to internal node id. The bound node must be an income
    /// node; its base value is replaced by the aggregated port total.
    pub input_bindings: AHashMap<String, String>,
    /// Output port id to internal node id whose computed value the port
    /// exposes.
    pub output_bindings: AHashMap<String, String>,
}

/// A directed flow connection between two nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeDefinition {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Output port on the source, when the source is a custom node.
    pub source_port: Option<String>,
    /// Input port on the target, for custom nodes and the two-port
    /// arithmetic kinds.
    pub target_port: Option<String>,
    /// Carried through without interpretation; reserved for weighted flows.
    pub weight: Option<f64>,
    /// Carried through without interpretation; reserved for delayed flows.
    pub lag_months: Option<u32>,
}
