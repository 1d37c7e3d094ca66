//! oncograph: builds a patient / sample / variant / gene / drug graph from
//! flat genomic and clinical exports.
//! Entry point for the `oncograph` binary.

mod config;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use oncograph_kg::adapters::{ClinicalAdapter, CopyNumberAdapter, OncoKbAdapter, OncodashAdapter, VariantsAdapter};
use oncograph_kg::{stream_into, GraphAdapter, GraphSink, MergePolicy, MergedGraph};

use config::Config;
use output::JsonLinesWriter;

#[derive(Debug, Parser)]
#[command(name = "oncograph", version, about = "Build a knowledge graph from variant, copy-number, clinical, OncoKB and oncodash exports")]
struct Cli {
    /// Config file (TOML, or YAML by extension). Defaults to $ONCOGRAPH_CONFIG, then ./oncograph.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory; overrides `output.dir`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// last_write_wins, first_write_wins or error_on_conflict; overrides `output.merge_policy`.
    #[arg(long)]
    merge_policy: Option<MergePolicy>,

    /// Merge and report, but write nothing.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("oncograph=debug,info")),
        )
        .init();

    let cli = Cli::parse();
    info!("oncograph {}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output {
        config.output.dir = dir;
    }
    if let Some(policy) = cli.merge_policy {
        config.output.merge_policy = policy;
    }
    info!(
        sources = ?config.enabled_sources(),
        merge_policy = ?config.output.merge_policy,
        "Configuration loaded"
    );

    let adapters = build_adapters(&config)?;
    if adapters.is_empty() {
        warn!("No sources configured, nothing to do");
        return Ok(());
    }

    let mut graph = MergedGraph::new(config.output.merge_policy);
    for adapter in &adapters {
        stream_into(adapter.as_ref(), &mut graph)
            .with_context(|| format!("merging the {} graph", adapter.name()))?;
    }

    let dangling = graph.dangling_edges();
    if !dangling.is_empty() {
        warn!(count = dangling.len(), "Edges reference nodes no source emitted");
    }
    info!("Merged graph:\n{}", graph.summary());

    if cli.dry_run {
        return Ok(());
    }

    let dir = &config.output.dir;
    let mut writer = JsonLinesWriter::create(dir).with_context(|| format!("creating {}", dir.display()))?;
    writer.write_nodes(Box::new(graph.nodes().iter().cloned()))?;
    writer.write_edges(Box::new(graph.edges().iter().cloned()))?;
    writer.finish()?;
    Ok(())
}

type Loader<'a> = Box<dyn Fn() -> anyhow::Result<Box<dyn GraphAdapter>> + Send + Sync + 'a>;

fn loader<'a, A, F>(load: F) -> Loader<'a>
where
    A: GraphAdapter + 'static,
    F: Fn() -> oncograph_common::Result<A> + Send + Sync + 'a,
{
    Box::new(move || Ok(Box::new(load()?) as Box<dyn GraphAdapter>))
}

/// Load every configured source in parallel. The result keeps the fixed
/// order of [`Config::enabled_sources`] so merges are reproducible.
fn build_adapters(config: &Config) -> anyhow::Result<Vec<Box<dyn GraphAdapter>>> {
    let mut loaders: Vec<(&'static str, Loader<'_>)> = Vec::new();
    if let Some(src) = &config.variants {
        loaders.push(("variants", loader(move || VariantsAdapter::load(&src.path, &src.settings))));
    }
    if let Some(src) = &config.copy_number {
        loaders.push(("copy_number", loader(move || CopyNumberAdapter::load(&src.path, &src.settings))));
    }
    if let Some(src) = &config.clinical {
        loaders.push(("clinical", loader(move || ClinicalAdapter::load(&src.path, &src.settings))));
    }
    if let Some(src) = &config.oncokb {
        loaders.push(("oncokb", loader(move || OncoKbAdapter::load(&src.path, &src.settings))));
    }
    if let Some(src) = &config.oncodash {
        loaders.push(("oncodash", loader(move || OncodashAdapter::load(&src.nodes, &src.edges, &src.settings))));
    }

    loaders
        .par_iter()
        .map(|(name, load)| load().with_context(|| format!("loading the {name} source")))
        .collect()
}
