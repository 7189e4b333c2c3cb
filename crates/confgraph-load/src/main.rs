//! CLI entry point for the confgraph-load batch job.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use confgraph_core::{NodeLabel, RelType};
use confgraph_graph::{GraphClient, MemoryGraph};

use confgraph_load::config::{load_settings, MissingIdPolicy};
use confgraph_load::export::read_export;
use confgraph_load::loader::{run_load, LoadOptions};

#[derive(Parser)]
#[command(name = "confgraph-load")]
#[command(about = "Load a conference program export into the Neo4j program graph")]
struct Cli {
    /// Export file to load (overrides load.input).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Config file prefix (default: confgraph).
    #[arg(short, long, default_value = "confgraph")]
    config: String,

    /// Target database (overrides neo4j.database).
    #[arg(long)]
    database: Option<String>,

    /// Records without a session id: skip, abort (overrides load.on_missing_id).
    #[arg(long)]
    on_missing_id: Option<String>,

    /// Write the run summary as JSON to this path (overrides load.report_path).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Run the full pipeline against an in-memory graph; no database access.
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let (load_config, mut graph_config) = load_settings(&cli.config)?;
    if let Some(database) = &cli.database {
        graph_config.database = database.clone();
    }

    let on_missing_id = match cli.on_missing_id.as_deref() {
        Some(raw) => raw.parse::<MissingIdPolicy>()?,
        None => load_config.on_missing_id,
    };
    let options = LoadOptions {
        on_missing_id,
        dry_run: cli.dry_run,
    };

    // Parse the whole export before touching the store.
    let input = cli
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&load_config.input));
    let export = read_export(&input)?;
    tracing::info!(
        path = %input.display(),
        records = export.records.len(),
        export_hash = %export.content_hash,
        "Export read"
    );

    let summary = if cli.dry_run {
        let mut graph = MemoryGraph::new();
        let summary = run_load(&mut graph, &export, &options).await?;
        for label in NodeLabel::ALL {
            tracing::info!(label = %label, nodes = graph.node_count(label), "Dry run nodes");
        }
        for rel in RelType::ALL {
            tracing::info!(rel = %rel, edges = graph.edge_count(rel), "Dry run relationships");
        }
        summary
    } else {
        let mut graph = GraphClient::connect(&graph_config).await?;
        let summary = run_load(&mut graph, &export, &options).await?;
        for label in NodeLabel::ALL {
            let nodes = graph.count_nodes(label).await?;
            tracing::info!(label = %label, nodes, database = %graph.database(), "Graph nodes");
        }
        summary
    };

    summary.log();

    let report_path = cli
        .report
        .clone()
        .or_else(|| load_config.report_path.as_ref().map(PathBuf::from));
    if let Some(path) = report_path {
        summary.write_to(&path)?;
    }

    Ok(())
}
