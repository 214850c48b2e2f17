use clap::{Parser, Subcommand};
use sekkei::catalog::NodeCatalog;
use sekkei::codegen::DEFAULT_STRATEGY_NAME;
use sekkei::prelude::*;
use std::fs;
use std::sync::Arc;
use std::time::Instant;

/// Validate blueprints and compile them into strategy source
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report structural issues in a blueprint
    Validate {
        /// Path to the blueprint JSON file
        blueprint_path: String,
    },
    /// Generate strategy source from a blueprint
    Generate {
        /// Path to the blueprint JSON file
        blueprint_path: String,

        /// Class name of the generated strategy
        #[arg(short, long, default_value = DEFAULT_STRATEGY_NAME)]
        name: String,

        /// Write the source to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Emit a diagnostic artifact instead of failing on invalid blueprints
        #[arg(long)]
        preview: bool,
    },
    /// List every registered node type by category
    Catalog,
}

fn main() {
    let cli = Cli::parse();
    let catalog = Arc::new(NodeCatalog::builtin());

    match cli.command {
        Command::Validate { blueprint_path } => {
            let graph = load_graph(&catalog, &blueprint_path);
            run_validate(&graph);
        }
        Command::Generate {
            blueprint_path,
            name,
            output,
            preview,
        } => {
            let graph = load_graph(&catalog, &blueprint_path);
            run_generate(&graph, &name, output.as_deref(), preview);
        }
        Command::Catalog => print_catalog(&catalog),
    }
}

fn load_graph(catalog: &Arc<NodeCatalog>, path: &str) -> Graph {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read blueprint file '{}': {}", path, e)));
    Graph::from_document(Arc::clone(catalog), json.as_str())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load blueprint '{}': {}", path, e)))
}

fn run_validate(graph: &Graph) {
    let report = validate(graph);
    println!(
        "Blueprint: {} node(s), {} connection(s)",
        graph.node_count(),
        graph.connections().len()
    );

    if report.is_valid() {
        println!("  -> Valid");
        return;
    }
    for issue in &report.issues {
        println!("  -> {}", issue);
    }
    exit_with_error(&format!("{} issue(s) found", report.issues.len()));
}

fn run_generate(graph: &Graph, name: &str, output: Option<&str>, preview: bool) {
    let start = Instant::now();
    let generator = CodeGenerator::new(graph);

    let source = if preview {
        generator.generate_preview()
    } else {
        match generator.compile(name) {
            Ok(strategy) => {
                eprintln!(
                    "Generated '{}': {} statement(s), {} parameter(s), lookback {} in {:?}",
                    strategy.name,
                    strategy.statements.len(),
                    strategy.parameters.len(),
                    strategy.lookback,
                    start.elapsed()
                );
                strategy.source
            }
            Err(GenerateError::Invalid(issues)) => {
                for issue in &issues {
                    eprintln!("  -> {}", issue);
                }
                exit_with_error(&format!("Blueprint validation failed with {} issue(s)", issues.len()))
            }
            Err(e) => exit_with_error(&format!("Generation failed: {}", e)),
        }
    };

    match output {
        Some(path) => {
            fs::write(path, &source)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
            eprintln!("Saved strategy source to '{}'", path);
        }
        None => print!("{}", source),
    }
}

fn print_catalog(catalog: &NodeCatalog) {
    for category in catalog.categories() {
        let nodes = catalog.by_category(*category);
        if nodes.is_empty() {
            continue;
        }
        println!("[{}]", category);
        for info in nodes {
            println!("  {:<24} {:<20} {}", info.node_type, info.title, info.description);
        }
        println!();
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
