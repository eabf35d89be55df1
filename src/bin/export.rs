use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use nobelnet::db::Db;
use nobelnet::export::{export_graph, export_triplets};
use nobelnet::Config;

#[derive(Parser, Debug)]
#[command(name = "export")]
#[command(about = "Export the graph store as JSON")]
struct Args {
    /// Output path for the full node/relation dump
    #[arg(long, default_value = "nobel_network.json")]
    graph_out: PathBuf,

    /// Output path for the compact [{start, relation, end}] triplets
    #[arg(long, default_value = "triplets.json")]
    triplets_out: PathBuf,

    /// Only write the triplet file
    #[arg(long)]
    triplets_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info"),
    )
    .init();

    let args = Args::parse();
    let config = Config::load()?;

    if !config.db_path().exists() {
        anyhow::bail!(
            "Graph store not found at {}. Run `import` first.",
            config.db_path().display()
        );
    }
    let db = Db::new(config.db_path());

    if !args.triplets_only {
        let export = export_graph(&db, &args.graph_out).await?;
        println!(
            "Wrote {} nodes and {} relations to {}",
            export.nodes.len(),
            export.relations.len(),
            args.graph_out.display()
        );
    }

    let count = export_triplets(&db, &args.triplets_out).await?;
    println!("Wrote {} triplets to {}", count, args.triplets_out.display());

    Ok(())
}
