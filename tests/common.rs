//! Common test utilities for building flow graph definitions.
use kakeibo::prelude::*;

#[allow(dead_code)]
pub fn income(id: &str, base_value: f64, time_unit: TimeUnit) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind: NodeKind::Income {
            base_value,
            time_unit,
        },
    }
}

#[allow(dead_code)]
pub fn expense(id: &str, base_value: f64, time_unit: TimeUnit) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind: NodeKind::Expense {
            base_value,
            time_unit,
        },
    }
}

#[allow(dead_code)]
pub fn calc(id: &str, formula: &str) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind: NodeKind::Calc {
            formula: Some(formula.to_string()),
        },
    }
}

#[allow(dead_code)]
pub fn calc_without_formula(id: &str) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind: NodeKind::Calc { formula: None },
    }
}

#[allow(dead_code)]
pub fn asset(id: &str, interest_rate_annual: f64) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind: NodeKind::Asset {
            interest_rate_annual: Some(interest_rate_annual),
        },
    }
}

#[allow(dead_code)]
pub fn output(id: &str, target_amount: f64) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind: NodeKind::Output {
            target_amount: Some(target_amount),
        },
    }
}

#[allow(dead_code)]
pub fn constant(id: &str, base_value: f64) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind: NodeKind::Value { base_value },
    }
}

#[allow(dead_code)]
pub fn plain(id: &str, kind: NodeKind) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        label: id.to_string(),
        kind,
    }
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> EdgeDefinition {
    EdgeDefinition {
        id: format!("{source}->{target}"),
        source: source.to_string(),
        target: target.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn edge_to_port(source: &str, target: &str, target_port: &str) -> EdgeDefinition {
    EdgeDefinition {
        target_port: Some(target_port.to_string()),
        ..edge(source, target)
    }
}

#[allow(dead_code)]
pub fn edge_from_port(source: &str, source_port: &str, target: &str) -> EdgeDefinition {
    EdgeDefinition {
        source_port: Some(source_port.to_string()),
        ..edge(source, target)
    }
}

#[allow(dead_code)]
pub fn graph(nodes: Vec<NodeDefinition>, edges: Vec<EdgeDefinition>) -> GraphDefinition {
    GraphDefinition { nodes, edges }
}

#[allow(dead_code)]
pub fn port(id: &str) -> PortDef {
    PortDef {
        id: id.to_string(),
        label: id.to_string(),
    }
}

/// Creates a "household" composite for custom node tests.
///
/// One input port `in` bound to the internal income `inflow`, an internal
/// rent expense of 400, an internal calc `net = inflow - rent`, and one
/// output port `out` bound to `net`.
#[allow(dead_code)]
pub fn household() -> NodeDefinition {
    let config = CustomNodeConfig {
        inputs: vec![port("in")],
        outputs: vec![port("out")],
        graph: graph(
            vec![
                income("inflow", 0.0, TimeUnit::PerMonth),
                expense("rent", 400.0, TimeUnit::PerMonth),
                calc("net", "inflow - rent"),
            ],
            vec![edge("inflow", "net"), edge("rent", "net")],
        ),
        input_bindings: AHashMap::from([("in".to_string(), "inflow".to_string())]),
        output_bindings: AHashMap::from([("out".to_string(), "net".to_string())]),
    };
    NodeDefinition {
        id: "household".to_string(),
        label: "Household".to_string(),
        kind: NodeKind::Custom(config),
    }
}

/// Creates a chain of `levels` composites, each wrapping the next. The value
/// fed into the outermost `in` port passes through an internal income at
/// every level and comes back out unchanged on `out`.
#[allow(dead_code)]
pub fn nested_custom(levels: usize) -> NodeDefinition {
    let mut node = wrapper(0, None);
    for level in 1..levels {
        node = wrapper(level, Some(node));
    }
    node
}

#[allow(dead_code)]
fn wrapper(level: usize, inner: Option<NodeDefinition>) -> NodeDefinition {
    let cell_id = format!("cell_{level}");
    let (nodes, edges, out_binding) = match inner {
        Some(inner) => {
            let inner_id = inner.id.clone();
            (
                vec![income(&cell_id, 0.0, TimeUnit::PerMonth), inner],
                vec![edge(&cell_id, &inner_id)],
                inner_id,
            )
        }
        None => (
            vec![income(&cell_id, 0.0, TimeUnit::PerMonth)],
            vec![],
            cell_id.clone(),
        ),
    };

    let config = CustomNodeConfig {
        inputs: vec![port("in")],
        outputs: vec![port("out")],
        graph: graph(nodes, edges),
        input_bindings: AHashMap::from([("in".to_string(), cell_id)]),
        output_bindings: AHashMap::from([("out".to_string(), out_binding)]),
    };
    NodeDefinition {
        id: format!("wrap_{level}"),
        label: format!("wrap_{level}"),
        kind: NodeKind::Custom(config),
    }
}
