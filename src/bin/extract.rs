use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use nobelnet::extract::{reshape, write_nodes, write_relations};
use nobelnet::Config;

#[derive(Parser, Debug)]
#[command(name = "extract")]
#[command(about = "Reshape the raw award export into staged node/relation CSVs")]
struct Args {
    /// Raw export CSV (defaults to nobelnet.source_csv from config.toml)
    #[arg(short, long)]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info"),
    )
    .init();

    let args = Args::parse();

    log::info!("Starting extraction");
    let config = Config::load()?;

    let input = args
        .input
        .unwrap_or_else(|| config.nobelnet.source_csv.clone());
    log::info!("Source export: {}", input.display());
    log::info!("Staging directory: {}", config.staging_dir().display());

    // A missing export is fatal; nothing downstream can run without it.
    let file = File::open(&input)
        .with_context(|| format!("Failed to open source export: {}", input.display()))?;

    let output = reshape(file)?;

    write_nodes(config.staging_dir(), &output.nodes)?;
    write_relations(config.staging_dir(), &output.relations)?;

    log::info!("=== Extraction Complete ===");
    log::info!("Rows read: {}", output.rows);
    log::info!("Node records: {}", output.nodes.total());
    log::info!("  Person: {}", output.nodes.people.len());
    log::info!("  Award: {}", output.nodes.awards.len());
    log::info!("  AwardStatement: {}", output.nodes.statements.len());
    log::info!("  Country: {}", output.nodes.countries.len());
    log::info!("  Occupation: {}", output.nodes.occupations.len());
    log::info!("  Field: {}", output.nodes.fields.len());
    log::info!("  Organization: {}", output.nodes.organizations.len());
    log::info!("  Position: {}", output.nodes.positions.len());
    log::info!("Relation rows: {}", output.relations.len());
    if output.dropped > 0 {
        log::warn!("Dropped {} rows/references with empty identity fields", output.dropped);
    }

    Ok(())
}
