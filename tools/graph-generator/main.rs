use clap::Parser;
use kakeibo::document::{DocumentEdge, DocumentNode, GraphDocument};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;

/// A CLI tool to generate random flow graph documents for the Kakeibo engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON document to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// The number of income and expense source nodes
    #[arg(long, default_value_t = 12)]
    sources: usize,

    /// The number of calc nodes combining the sources
    #[arg(long, default_value_t = 6)]
    calcs: usize,

    /// The number of asset/output goal chains fed by the calcs
    #[arg(long, default_value_t = 3)]
    goals: usize,
}

const INCOME_NAMES: [&str; 6] = [
    "Salary",
    "Freelance",
    "Dividends",
    "Rental income",
    "Side project",
    "Bonus",
];

const EXPENSE_NAMES: [&str; 6] = [
    "Rent",
    "Groceries",
    "Insurance",
    "Transport",
    "Utilities",
    "Subscriptions",
];

const TIME_UNITS: [&str; 4] = ["per_day", "per_week", "per_month", "per_year"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.sources < 2 {
        eprintln!("Error: --sources must be at least 2");
        std::process::exit(1);
    }

    println!(
        "Generating a flow graph ({} sources, {} calcs, {} goals)...",
        cli.sources, cli.calcs, cli.goals
    );

    let mut document = GraphDocument {
        display_scale: Some(1.0),
        nodes: Vec::new(),
        edges: Vec::new(),
    };

    generate_sources(&mut rng, &mut document, cli.sources);
    generate_calcs(&mut rng, &mut document, cli.sources, cli.calcs);
    generate_goals(&mut rng, &mut document, cli.sources, cli.calcs, cli.goals);

    let json_output = document.to_json_pretty()?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved graph to '{}'",
        cli.output
    );

    Ok(())
}

/// Generates alternating income and expense source nodes with random base
/// values and recurrence units.
fn generate_sources(rng: &mut ThreadRng, document: &mut GraphDocument, count: usize) {
    for index in 0..count {
        let is_income = index % 2 == 0;
        let names: &[&str] = if is_income {
            &INCOME_NAMES
        } else {
            &EXPENSE_NAMES
        };
        document.nodes.push(DocumentNode {
            id: format!("src_{index}"),
            label: Some(names[(index / 2) % names.len()].to_string()),
            kind: if is_income { "income" } else { "expense" }.to_string(),
            base_value: Some(rng.random_range(20.0..3000.0_f64).round()),
            time_unit: Some(TIME_UNITS[rng.random_range(0..TIME_UNITS.len())].to_string()),
            ..Default::default()
        });
    }
    println!("-> Generated {} source node(s).", count);
}

/// Generates calc nodes, each wiring two distinct random sources into a
/// formula. The second source is subtracted when it is an expense.
fn generate_calcs(
    rng: &mut ThreadRng,
    document: &mut GraphDocument,
    source_count: usize,
    count: usize,
) {
    for index in 0..count {
        let first = rng.random_range(0..source_count);
        let second = (first + 1 + rng.random_range(0..source_count - 1)) % source_count;

        let mut formula = format!("src_{first}");
        formula.push_str(if second % 2 == 0 { " + " } else { " - " });
        formula.push_str(&format!("src_{second}"));

        let calc_id = format!("calc_{index}");
        document.nodes.push(DocumentNode {
            id: calc_id.clone(),
            label: Some(format!("Cashflow {index}")),
            kind: "calc".to_string(),
            formula: Some(formula),
            ..Default::default()
        });
        push_edge(document, &format!("src_{first}"), &calc_id);
        push_edge(document, &format!("src_{second}"), &calc_id);
    }
    println!("-> Generated {} calc node(s).", count);
}

/// Generates asset/output chains. Each asset is fed by one calc (or a source
/// when no calcs were requested) and feeds one output goal.
fn generate_goals(
    rng: &mut ThreadRng,
    document: &mut GraphDocument,
    source_count: usize,
    calc_count: usize,
    count: usize,
) {
    for index in 0..count {
        let feeder = if calc_count > 0 {
            format!("calc_{}", index % calc_count)
        } else {
            format!("src_{}", index % source_count)
        };

        let asset_id = format!("asset_{index}");
        document.nodes.push(DocumentNode {
            id: asset_id.clone(),
            label: Some(format!("Portfolio {index}")),
            kind: "asset".to_string(),
            interest_rate_annual: Some((rng.random_range(0.01..0.08_f64) * 1000.0).round() / 1000.0),
            ..Default::default()
        });
        push_edge(document, &feeder, &asset_id);

        let goal_id = format!("goal_{index}");
        document.nodes.push(DocumentNode {
            id: goal_id.clone(),
            label: Some(format!("Goal {index}")),
            kind: "output".to_string(),
            target_amount: Some(rng.random_range(5_000.0..150_000.0_f64).round()),
            ..Default::default()
        });
        push_edge(document, &asset_id, &goal_id);
    }
    println!("-> Generated {} goal chain(s).", count);
}

fn push_edge(document: &mut GraphDocument, source: &str, target: &str) {
    document.edges.push(DocumentEdge {
        id: Some(format!("e{}", document.edges.len())),
        source: source.to_string(),
        target: target.to_string(),
        kind: Some("flow".to_string()),
        ..Default::default()
    });
}
