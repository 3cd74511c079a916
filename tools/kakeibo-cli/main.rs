use clap::{Parser, ValueEnum};
use kakeibo::prelude::*;
use serde_json::json;
use std::io::{self, Write};
use std::time::Instant;

/// How the computed results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// A deterministic compute engine for node-based financial flow graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph document JSON file
    graph_path: Option<String>,

    /// The output format for computed results
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Include the monthly projection series of asset and output nodes
    #[arg(short, long)]
    series: bool,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.human {
        run_interactive(cli.series);
    } else {
        run_non_interactive(cli);
    }
}

fn run_computation(graph_path: String, format: OutputFormat, with_series: bool) {
    let total_start = Instant::now();

    // --- 1. File Loading and Parsing ---
    let load_start = Instant::now();
    let document = GraphDocument::from_file(&graph_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph document: {}", e)));
    let load_duration = load_start.elapsed();

    // --- 2. Conversion to the Canonical Model ---
    let convert_start = Instant::now();
    let graph = document
        .into_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid graph document: {}", e)));
    let convert_duration = convert_start.elapsed();

    // --- 3. Computation ---
    if format == OutputFormat::Table {
        println!("\nComputing financial flow graph...");
    }
    let compute_start = Instant::now();
    let outcome = compute_graph(&graph);
    let compute_duration = compute_start.elapsed();

    // --- 4. Results ---
    match format {
        OutputFormat::Table => print_table(&outcome, with_series),
        OutputFormat::Json => print_json(&outcome, with_series),
    }

    if format == OutputFormat::Table {
        let total_duration = total_start.elapsed();
        println!("\n--- Graph Summary ---");
        println!("Nodes:    {}", graph.nodes.len());
        println!("Edges:    {}", graph.edges.len());
        println!("Problems: {}", outcome.errors.len());

        println!("\n--- Performance Summary ---");
        println!("File Loading:     {:?}", load_duration);
        println!("Conversion:       {:?}", convert_duration);
        println!("Computation:      {:?}", compute_duration);
        println!("---------------------------");
        println!("Total Execution:  {:?}", total_duration);
        println!();
    }
}

fn print_table(outcome: &ComputeOutcome, with_series: bool) {
    let label_width = outcome
        .nodes
        .iter()
        .map(|node| node.label.len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("\n{:<label_width$}  {:<9}  {}", "Node", "Kind", "Result");
    for node in &outcome.nodes {
        println!(
            "{:<label_width$}  {:<9}  {}",
            node.label,
            node.kind.name(),
            render_result(node, outcome)
        );
        if with_series {
            if let Some(series) = &node.series {
                println!("{:<label_width$}  {:<9}  {}", "", "", render_series(series));
            }
        }
    }

    if !outcome.errors.is_empty() {
        println!("\nProblems:");
        for node in &outcome.nodes {
            if let Some(message) = outcome.error_of(&node.id) {
                println!("  {} -> {}", node.id, message);
            }
        }
    }
}

/// One human-readable cell for a computed node. Output nodes report the
/// month their goal is reached; everything else reports a monthly amount.
fn render_result(node: &ComputedNode, outcome: &ComputeOutcome) -> String {
    match (&node.kind, node.value) {
        (NodeKind::Output { .. }, Some(value)) if value < 0.0 => "unreachable".to_string(),
        (NodeKind::Output { .. }, Some(value)) => format!("reached in month {}", value as i64),
        (_, Some(value)) => format!("{:.2}", value),
        (_, None) => match outcome.error_of(&node.id) {
            Some(_) => "error".to_string(),
            None => "-".to_string(),
        },
    }
}

/// A compact yearly sample of a monthly series.
fn render_series(series: &[f64]) -> String {
    let samples: Vec<String> = series
        .iter()
        .enumerate()
        .filter(|(month, _)| (month + 1) % 12 == 0)
        .map(|(month, balance)| format!("m{}={:.0}", month + 1, balance))
        .collect();
    samples.join(" ")
}

fn print_json(outcome: &ComputeOutcome, with_series: bool) {
    let nodes: Vec<serde_json::Value> = outcome
        .nodes
        .iter()
        .map(|node| {
            let mut entry = json!({
                "id": node.id,
                "label": node.label,
                "kind": node.kind.name(),
                "value": node.value,
            });
            if with_series {
                entry["series"] = json!(node.series);
            }
            if let Some(message) = outcome.error_of(&node.id) {
                entry["error"] = json!(message);
            }
            entry
        })
        .collect();

    let rendered = serde_json::to_string_pretty(&json!({ "nodes": nodes }))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to render JSON output: {}", e)));
    println!("{}", rendered);
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) {
    let graph_path = cli.graph_path.unwrap_or_else(|| {
        exit_with_error("Graph document path is required in non-interactive mode.");
    });
    let format = cli.format.unwrap_or(OutputFormat::Table);

    run_computation(graph_path, format, cli.series);
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive(with_series: bool) {
    println!("--- Kakeibo Interactive Mode ---");

    let graph_path = prompt_for_input("Enter graph document path", Some("data/graph.json"));

    let format = loop {
        println!("\nPlease select an output format:");
        println!("  1: Table (human-readable overview)");
        println!("  2: JSON (machine-readable results)");
        let choice_str = prompt_for_input("Enter choice", Some("1"));

        match choice_str.trim() {
            "1" => break OutputFormat::Table,
            "2" => break OutputFormat::Json,
            _ => println!("Invalid choice. Please enter 1 or 2."),
        }
    };

    run_computation(graph_path, format, with_series);
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    io::stdout().flush().unwrap();

    io::stdin()
        .read_line(&mut line)
        .expect("Failed to read line");
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
