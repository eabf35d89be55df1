use nobelnet::db::Db;
use nobelnet::error::NobelnetError;
use nobelnet::import::run_history;
use nobelnet::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    if !config.db_path().exists() {
        eprintln!(
            "Graph store not found at {}. Run `import` first.",
            config.db_path().display()
        );
        std::process::exit(1);
    }
    let db = Db::new(config.db_path());

    println!("\n=== Award Network Store Statistics ===\n");

    // Node counts per label
    let label_counts = db
        .with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT label, COUNT(*) FROM nodes GROUP BY label ORDER BY COUNT(*) DESC",
            )?;
            let mut rows = stmt.query([])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push((row.get::<_, String>(0)?, row.get::<_, i64>(1)?));
            }
            Ok::<Vec<_>, NobelnetError>(results)
        })
        .await?;

    if label_counts.is_empty() {
        println!("Store is empty. Run `extract` and `import` to populate it.");
        return Ok(());
    }

    println!("Nodes by label:\n");
    println!("{:-<40}", "");
    println!("{:<25} {:>12}", "Label", "Count");
    println!("{:-<40}", "");
    let mut total_nodes = 0i64;
    for (label, count) in &label_counts {
        println!("{:<25} {:>12}", label, count);
        total_nodes += count;
    }
    println!("{:-<40}", "");
    println!("{:<25} {:>12}", "Total", total_nodes);

    // Relation counts per type
    let relation_counts = db
        .with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT relation, COUNT(*) FROM relations GROUP BY relation ORDER BY COUNT(*) DESC",
            )?;
            let mut rows = stmt.query([])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push((row.get::<_, String>(0)?, row.get::<_, i64>(1)?));
            }
            Ok::<Vec<_>, NobelnetError>(results)
        })
        .await?;

    println!("\nRelations by type:\n");
    println!("{:-<40}", "");
    println!("{:<25} {:>12}", "Relation", "Count");
    println!("{:-<40}", "");
    let mut total_relations = 0i64;
    for (relation, count) in &relation_counts {
        println!("{:<25} {:>12}", relation, count);
        total_relations += count;
    }
    println!("{:-<40}", "");
    println!("{:<25} {:>12}", "Total", total_relations);

    // Import run history
    let runs = run_history(&db, 5).await?;
    if !runs.is_empty() {
        println!("\nRecent import runs:\n");
        println!("{:-<80}", "");
        println!(
            "{:<26} {:>10} {:>12} {}",
            "Imported at", "Nodes", "Relations", "Source"
        );
        println!("{:-<80}", "");
        for run in &runs {
            println!(
                "{:<26} {:>10} {:>12} {}",
                run.imported_at, run.node_count, run.relation_count, run.source_path
            );
        }
        println!("{:-<80}", "");
    }

    println!();

    Ok(())
}
