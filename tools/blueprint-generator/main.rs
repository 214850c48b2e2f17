use clap::Parser;
use rand::seq::IndexedRandom;
use rand::{Rng, rngs::ThreadRng};
use sekkei::prelude::*;
use std::fs;

/// A CLI tool to generate random, valid blueprints for manual testing
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_blueprint.json")]
    output: String,

    /// Number of independent signal chains feeding trade nodes
    #[arg(long, default_value_t = 1)]
    chains: usize,
}

const SMOOTHERS: &[&str] = &["indicator.ma", "indicator.ema", "indicator.wma"];
const COMPARISONS: &[&str] = &["logic.greater", "logic.less", "logic.greater_equal", "logic.less_equal"];
const ACTIONS: &[&str] = &["trade.buy", "trade.sell", "trade.conditional_buy", "trade.conditional_sell"];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.chains == 0 {
        eprintln!("Error: --chains must be at least 1");
        std::process::exit(1);
    }

    println!("Generating a blueprint with {} chain(s)...", cli.chains);

    let mut graph = Graph::new();
    let closes = graph.add_node("data.close_prices", Point::new(0.0, 0.0))?;
    graph.set_parameter(&closes, "count", rng.random_range(20..=120_i64))?;

    for chain in 0..cli.chains {
        add_chain(&mut graph, &mut rng, &closes, chain)?;
    }

    let report = validate(&graph);
    if !report.is_valid() {
        return Err(format!("generated blueprint is invalid: {:?}", report.issues).into());
    }

    fs::write(&cli.output, graph.to_json()?)?;
    println!(
        "Successfully generated {} node(s) and saved the blueprint to '{}'",
        graph.node_count(),
        cli.output
    );

    Ok(())
}

/// close prices -> smoother -> comparison against the latest close -> trade.
fn add_chain(graph: &mut Graph, rng: &mut ThreadRng, closes: &NodeId, chain: usize) -> Result<()> {
    let row = chain as f64 * 160.0;
    let pick = |rng: &mut ThreadRng, options: &[&'static str]| -> &'static str {
        options.choose(rng).copied().unwrap_or(options[0])
    };

    let smoother = graph.add_node(pick(rng, SMOOTHERS), Point::new(220.0, row))?;
    graph.set_parameter(&smoother, "period", rng.random_range(5..=60_i64))?;
    let comparison = graph.add_node(pick(rng, COMPARISONS), Point::new(440.0, row))?;
    let action = graph.add_node(pick(rng, ACTIONS), Point::new(660.0, row))?;

    graph.add_connection(PortRef::output(closes, "prices"), PortRef::input(&smoother, "data"))?;
    graph.add_connection(PortRef::output(closes, "current"), PortRef::input(&comparison, "a"))?;
    graph.add_connection(PortRef::output(&smoother, "current"), PortRef::input(&comparison, "b"))?;
    graph.add_connection(PortRef::output(&comparison, "result"), PortRef::input(&action, "condition"))?;

    println!("-> Added chain {} ending in '{}'.", chain + 1, action);
    Ok(())
}
