//! Tests for composite (custom) nodes: port routing, bindings and recursion.
mod common;
use common::*;
use kakeibo::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_household_composite_end_to_end() {
    // salary -> household(in) ; household internals: net = inflow - rent
    let graph = graph(
        vec![
            income("salary", 1000.0, TimeUnit::PerMonth),
            household(),
        ],
        vec![edge("salary", "household")],
    );

    let outcome = compute_graph(&graph);

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.value_of("household"), Some(600.0));
}

#[test]
fn test_edges_without_a_port_use_the_first_declared_input() {
    // Two unported edges both land on `in` and sum before binding
    let graph = graph(
        vec![
            income("salary", 600.0, TimeUnit::PerMonth),
            income("bonus", 400.0, TimeUnit::PerMonth),
            household(),
        ],
        vec![edge("salary", "household"), edge("bonus", "household")],
    );

    let outcome = compute_graph(&graph);
    assert_eq!(outcome.value_of("household"), Some(600.0));
}

#[test]
fn test_input_binding_overrides_internal_income_settings() {
    // The bound internal income is configured per_week, but the written
    // total must be treated as a plain monthly amount.
    let mut node = household();
    if let NodeKind::Custom(config) = &mut node.kind {
        config.graph.nodes[0] = income("inflow", 9999.0, TimeUnit::PerWeek);
    }

    let graph = graph(
        vec![income("salary", 1000.0, TimeUnit::PerMonth), node],
        vec![edge("salary", "household")],
    );

    let outcome = compute_graph(&graph);
    assert_eq!(outcome.value_of("household"), Some(600.0));
}

#[test]
fn test_downstream_nodes_read_custom_output_ports() {
    let graph = graph(
        vec![
            income("salary", 1000.0, TimeUnit::PerMonth),
            household(),
            calc("scaled", "household * 2"),
        ],
        vec![
            edge("salary", "household"),
            edge_from_port("household", "out", "scaled"),
        ],
    );

    let outcome = compute_graph(&graph);
    assert_eq!(outcome.value_of("scaled"), Some(1200.0));
}

#[test]
fn test_multiple_output_ports_and_port_selection() {
    // Two outputs bound to two independent internal incomes (10 and 20).
    let config = CustomNodeConfig {
        inputs: vec![port("in")],
        outputs: vec![port("small"), port("large")],
        graph: graph(
            vec![
                income("feed", 0.0, TimeUnit::PerMonth),
                income("ten", 10.0, TimeUnit::PerMonth),
                income("twenty", 20.0, TimeUnit::PerMonth),
            ],
            vec![],
        ),
        input_bindings: AHashMap::from([("in".to_string(), "feed".to_string())]),
        output_bindings: AHashMap::from([
            ("small".to_string(), "ten".to_string()),
            ("large".to_string(), "twenty".to_string()),
        ]),
    };
    let graph = graph(
        vec![
            NodeDefinition {
                id: "box".to_string(),
                label: "Box".to_string(),
                kind: NodeKind::Custom(config),
            },
            calc("picked", "box"),
            calc("defaulted", "box"),
        ],
        vec![
            edge_from_port("box", "large", "picked"),
            edge("box", "defaulted"),
        ],
    );

    let outcome = compute_graph(&graph);

    // Own value is the sum over all output ports
    assert_eq!(outcome.value_of("box"), Some(30.0));
    assert_eq!(outcome.value_of("picked"), Some(20.0));
    // An edge without a source port reads the first declared output
    assert_eq!(outcome.value_of("defaulted"), Some(10.0));
}

#[test]
fn test_unbound_input_port_reports_and_defaults() {
    let mut node = household();
    if let NodeKind::Custom(config) = &mut node.kind {
        config.input_bindings.clear();
    }

    let graph = graph(
        vec![income("salary", 1000.0, TimeUnit::PerMonth), node],
        vec![edge("salary", "household")],
    );

    let outcome = compute_graph(&graph);

    let message = outcome.error_of("household").unwrap();
    assert!(message.contains("'in'"));
    assert!(message.contains("not bound"));
    // The internal graph still computes: inflow stays 0, net = 0 - 400
    assert_eq!(outcome.value_of("household"), Some(-400.0));
}

#[test]
fn test_unknown_requested_input_port_is_dropped() {
    let graph = graph(
        vec![
            income("salary", 1000.0, TimeUnit::PerMonth),
            household(),
        ],
        vec![edge_to_port("salary", "household", "sideways")],
    );

    let outcome = compute_graph(&graph);

    let message = outcome.error_of("household").unwrap();
    assert!(message.contains("'sideways'"));
    // The value is still computed, with the dropped edge contributing nothing
    assert_eq!(outcome.value_of("household"), Some(-400.0));
}

#[test]
fn test_input_binding_must_point_at_an_income() {
    let mut node = household();
    if let NodeKind::Custom(config) = &mut node.kind {
        config
            .input_bindings
            .insert("in".to_string(), "rent".to_string());
    }

    let graph = graph(
        vec![income("salary", 1000.0, TimeUnit::PerMonth), node],
        vec![edge("salary", "household")],
    );

    let outcome = compute_graph(&graph);

    let message = outcome.error_of("household").unwrap();
    assert!(message.contains("income"));
    assert!(message.contains("'in'"));
}

#[test]
fn test_binding_to_a_missing_internal_node_reports() {
    let mut node = household();
    if let NodeKind::Custom(config) = &mut node.kind {
        config
            .output_bindings
            .insert("out".to_string(), "nowhere".to_string());
    }

    let graph = graph(
        vec![income("salary", 1000.0, TimeUnit::PerMonth), node],
        vec![edge("salary", "household")],
    );

    let outcome = compute_graph(&graph);

    let message = outcome.error_of("household").unwrap();
    assert!(message.contains("'nowhere'"));
    // The unresolvable port defaults to 0
    assert_eq!(outcome.value_of("household"), Some(0.0));
}

#[test]
fn test_internal_faults_surface_as_a_single_entry() {
    let mut node = household();
    if let NodeKind::Custom(config) = &mut node.kind {
        config.graph.nodes[2] = calc("net", "inflow - phantom");
    }

    let graph = graph(
        vec![income("salary", 1000.0, TimeUnit::PerMonth), node],
        vec![edge("salary", "household")],
    );

    let outcome = compute_graph(&graph);

    assert_eq!(
        outcome.error_of("household"),
        Some("Internal graph errors")
    );
    // net faulted inside, so the bound output port reads 0
    assert_eq!(outcome.value_of("household"), Some(0.0));
}

#[test]
fn test_composite_without_ports_reports_both() {
    let node = NodeDefinition {
        id: "empty".to_string(),
        label: "Empty".to_string(),
        kind: NodeKind::Custom(CustomNodeConfig::default()),
    };
    let graph = graph(vec![node], vec![]);

    let outcome = compute_graph(&graph);

    let message = outcome.error_of("empty").unwrap();
    assert!(message.contains("no input ports"));
    assert!(message.contains("no output ports"));
    assert_eq!(outcome.value_of("empty"), Some(0.0));
}

#[test]
fn test_nested_composites_pass_values_through() {
    let graph = graph(
        vec![income("pay", 250.0, TimeUnit::PerMonth), nested_custom(3)],
        vec![edge("pay", "wrap_2")],
    );

    let outcome = compute_graph(&graph);

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.value_of("wrap_2"), Some(250.0));
}

#[test]
fn test_nesting_up_to_the_limit_is_clean() {
    let top = format!("wrap_{}", MAX_NESTING_DEPTH - 1);
    let graph = graph(
        vec![
            income("pay", 250.0, TimeUnit::PerMonth),
            nested_custom(MAX_NESTING_DEPTH),
        ],
        vec![edge("pay", &top)],
    );

    let outcome = compute_graph(&graph);

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.value_of(&top), Some(250.0));
}

#[test]
fn test_nesting_past_the_limit_degrades_to_a_problem() {
    let top = format!("wrap_{}", MAX_NESTING_DEPTH);
    let graph = graph(
        vec![
            income("pay", 250.0, TimeUnit::PerMonth),
            nested_custom(MAX_NESTING_DEPTH + 1),
        ],
        vec![edge("pay", &top)],
    );

    let outcome = compute_graph(&graph);

    // The level that hit the limit is internal, so the outermost node
    // reports the propagated internal failure and passes a 0 up the chain.
    assert_eq!(outcome.error_of(&top), Some("Internal graph errors"));
    assert_eq!(outcome.value_of(&top), Some(0.0));
}

#[test]
fn test_caller_graph_is_not_mutated_by_binding() {
    let graph = graph(
        vec![
            income("salary", 1000.0, TimeUnit::PerMonth),
            household(),
        ],
        vec![edge("salary", "household")],
    );

    let before = graph.clone();
    let _ = compute_graph(&graph);
    assert_eq!(graph, before);
}
