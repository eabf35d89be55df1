use anyhow::Context;
use clap::Parser;

use nobelnet::db::Db;
use nobelnet::graph::{build_graph, find_person, format_path, shortest_path, Graph};
use nobelnet::{source, Config, NobelnetError};

#[derive(Parser, Debug)]
#[command(name = "nobelnet")]
#[command(about = "Shortest connection between two people in the award network")]
struct Args {
    /// First person name (case-insensitive substring match)
    person_a: String,

    /// Second person name (case-insensitive substring match)
    person_b: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info"),
    )
    .init();

    let args = Args::parse();
    let config = Config::load()?;

    // An absent store means the batch load never ran; abort before querying.
    if !config.db_path().exists() {
        anyhow::bail!(
            "Graph store not found at {}. Run `extract` and `import` first.",
            config.db_path().display()
        );
    }
    let db = Db::new(config.db_path());

    // Drain all triples into memory, then build the graph once.
    let triples = source::from_store(&db)
        .await
        .with_context(|| format!("Failed to read triples from {}", config.db_path().display()))?;
    if triples.is_empty() {
        anyhow::bail!(
            "Graph store at {} holds no relations. Run `import` first.",
            config.db_path().display()
        );
    }
    let graph = build_graph(&triples);
    log::info!(
        "Graph ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    match run_query(&graph, &args, config.step_budget()) {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        // Terminal, user-visible outcomes: report and exit non-zero
        Err(err @ (NobelnetError::PersonNotFound(_) | NobelnetError::NoPath { .. })) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

fn run_query(graph: &Graph, args: &Args, budget: Option<usize>) -> nobelnet::Result<String> {
    let node_a = find_person(graph, &args.person_a)?;
    let node_b = find_person(graph, &args.person_b)?;

    log::info!(
        "Resolved '{}' to {} and '{}' to {}",
        args.person_a,
        graph.node(node_a).map(|n| n.qualified_name()).unwrap_or_default(),
        args.person_b,
        graph.node(node_b).map(|n| n.qualified_name()).unwrap_or_default(),
    );

    let path = shortest_path(graph, node_a, node_b, budget)?;
    Ok(format_path(graph, &path))
}
