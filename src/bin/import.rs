use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::time::Instant;

use nobelnet::db::{migrate, Db};
use nobelnet::extract::relations_csv_path;
use nobelnet::import::{
    clear_store, compute_file_hash, import_relations, last_run_hash, read_relation_rows,
    read_staged_nodes, record_run, upsert_nodes, NodeUpsert,
};
use nobelnet::{schema, Config};

#[derive(Parser, Debug)]
#[command(name = "import")]
#[command(about = "Upload staged node/relation CSVs into the graph store")]
struct Args {
    /// Re-import even if the staged relations file hash is unchanged
    #[arg(short, long)]
    force: bool,

    /// Keep existing nodes/relations instead of clearing the store first
    #[arg(short, long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info"),
    )
    .init();

    let args = Args::parse();

    log::info!("Starting import");
    let config = Config::load()?;
    log::info!("Staging directory: {}", config.staging_dir().display());
    log::info!("Store path: {}", config.db_path().display());

    // The relation schema is static; fail fast if it is inconsistent.
    schema::validate()?;

    let db = Db::new(config.db_path());
    let migrations_dir = Path::new("migrations");
    db.with_connection(|conn| migrate::run_migrations(conn, migrations_dir))
        .await?;
    log::info!("Store initialized");

    let relations_path = relations_csv_path(config.staging_dir());
    if !relations_path.exists() {
        anyhow::bail!(
            "No staged relations at {}. Run `extract` first.",
            relations_path.display()
        );
    }

    // Skip unchanged inputs unless forced
    let source_hash = compute_file_hash(&relations_path)?;
    let source_key = relations_path.display().to_string();
    if !args.force {
        if last_run_hash(&db, &source_key).await?.as_deref() == Some(source_hash.as_str()) {
            log::info!("Staged relations unchanged since last import. Use --force to re-import.");
            return Ok(());
        }
    }

    let start = Instant::now();

    if !args.keep {
        clear_store(&db).await?;
    }

    let nodes = read_staged_nodes(config.staging_dir())?;
    let batch_size = config.import.batch_size;

    let mut rows: Vec<NodeUpsert> = Vec::with_capacity(nodes.total());
    rows.extend(nodes.people.into_iter().map(NodeUpsert::person));
    rows.extend(nodes.awards.into_iter().map(NodeUpsert::award));
    rows.extend(nodes.statements.into_iter().map(NodeUpsert::statement));
    rows.extend(
        nodes
            .countries
            .into_iter()
            .map(|n| NodeUpsert::named(schema::COUNTRY, n)),
    );
    rows.extend(
        nodes
            .occupations
            .into_iter()
            .map(|n| NodeUpsert::named(schema::OCCUPATION, n)),
    );
    rows.extend(
        nodes
            .fields
            .into_iter()
            .map(|n| NodeUpsert::named(schema::FIELD, n)),
    );
    rows.extend(
        nodes
            .organizations
            .into_iter()
            .map(|n| NodeUpsert::named(schema::ORGANIZATION, n)),
    );
    rows.extend(
        nodes
            .positions
            .into_iter()
            .map(|n| NodeUpsert::named(schema::POSITION, n)),
    );

    let node_count = upsert_nodes(&db, rows, batch_size).await?;
    log::info!("Imported {} nodes", node_count);

    let relation_rows = read_relation_rows(&relations_path)?;
    let summary = import_relations(&db, relation_rows, batch_size).await?;

    let run_id = record_run(&db, &source_key, &source_hash, node_count, summary.imported).await?;

    let elapsed = start.elapsed();
    log::info!("=== Import Complete ===");
    log::info!("Run: {}", run_id);
    log::info!("Nodes: {}", node_count);
    log::info!("Relations: {}", summary.imported);
    if summary.missing_endpoints > 0 {
        log::warn!(
            "Relations skipped for missing endpoints: {}",
            summary.missing_endpoints
        );
    }
    log::info!("Time: {:?}", elapsed);

    Ok(())
}
