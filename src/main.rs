use anyhow::{Context, Result};
use draftgraph::{DumpFormat, EngineConfig, GraphDump, GraphStore, QueryEngine};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

fn main() -> Result<()> {
    let config = EngineConfig::from_env().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level()?)
        .with_writer(std::io::stderr)
        .init();

    info!("Draft Graph v{} ({})", draftgraph::version(), config.name);

    let store = GraphStore::new();
    if let Some(path) = &config.dump_path {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("opening dump {}", path.display()))?,
        );
        let dump = match config.dump_format {
            DumpFormat::Json => GraphDump::read_json(reader),
            DumpFormat::Binary => GraphDump::read_binary(reader),
        }
        .with_context(|| format!("reading {} dump {}", config.dump_format, path.display()))?;
        store.load(&dump).context("replaying dump")?;
    }

    let stats = store.statistics();
    info!(
        "Graph ready: {} nodes, {} edges",
        stats.node_count, stats.edge_count
    );

    let engine = QueryEngine::new();
    for query in std::env::args().skip(1) {
        let result = engine
            .execute(&query, &store)
            .with_context(|| format!("query failed: {}", query))?;
        println!("{}", result.dump().to_json_pretty()?);
    }

    Ok(())
}
