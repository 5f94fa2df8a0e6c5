//! CLI binary for breedpath: find the shortest breeding chain between two pokemon.

use anyhow::{Context, Result};
use breed_core::config::BreedConfig;
use breed_core::error::BreedError;
use breed_core::graph::BreedGraph;
use breed_core::records::{self, NameField};
use breed_nav::path::{BreedChain, find_chain};
use breed_nav::search::SearchOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "breedpath",
    version,
    about = "Find the shortest Pokemon breeding chain between two pokemon",
    after_help = "Example: breedpath eevee charmander"
)]
struct Cli {
    /// Pokemon to start from (case-insensitive)
    source: String,

    /// Pokemon to end up with (case-insensitive)
    target: String,

    /// Project root holding .breedpath/config.toml (defaults to current directory)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Egg-group record file (overrides input.data_file)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Names in the record file are written once instead of doubled
    #[arg(long)]
    plain_names: bool,

    /// Separator placed between pokemon in the printed chain
    #[arg(long)]
    separator: Option<String>,

    /// Give up on chains longer than this many hops
    #[arg(long)]
    max_hops: Option<usize>,

    /// List the egg group that links each pair in the chain
    #[arg(long)]
    show_groups: bool,

    /// Print the chain (and --stats output) as JSON
    #[arg(long)]
    json: bool,

    /// Print graph statistics to stderr before searching
    #[arg(long)]
    stats: bool,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = resolve_config(&cli, &project_root)?;

    let data_path = config.data_path(&project_root);
    let records = records::load_records(&data_path, config.input.name_field)?;
    let graph = BreedGraph::from_records(records, config.input.duplicates)
        .with_context(|| format!("failed to build breeding graph from {}", data_path.display()))?;
    tracing::debug!("{} pokemon loaded from {}", graph.len(), data_path.display());

    if cli.stats {
        print_stats(&graph, cli.json)?;
    }

    let options = SearchOptions {
        max_hops: config.search.max_hops,
        deadline: None,
    };
    let chain = match find_chain(&graph, &cli.source, &cli.target, &options) {
        Ok(chain) => chain,
        Err(err) if err.is_unknown_entity() => {
            anyhow::bail!("{}", describe_unknown(&graph, &err))
        }
        Err(err) => return Err(err.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&chain)?);
    } else {
        print!(
            "{}",
            render_chain(&chain, &config.output.separator, cli.show_groups)
        );
    }

    Ok(())
}

/// Config file and environment, then command-line flags on top.
fn resolve_config(cli: &Cli, project_root: &std::path::Path) -> Result<BreedConfig> {
    let mut config = BreedConfig::load(project_root).context("failed to load configuration")?;
    if let Some(data) = &cli.data {
        config.input.data_file = data.clone();
    }
    if cli.plain_names {
        config.input.name_field = NameField::Plain;
    }
    if let Some(separator) = &cli.separator {
        config.output.separator = separator.clone();
    }
    if cli.max_hops.is_some() {
        config.search.max_hops = cli.max_hops;
    }
    config.validate()?;
    Ok(config)
}

fn render_chain(chain: &BreedChain, separator: &str, show_groups: bool) -> String {
    let mut out = chain.join(separator);
    out.push('\n');
    if show_groups {
        for (pair, groups) in chain.names.windows(2).zip(&chain.via) {
            out.push_str(&format!("  {} + {}: {}\n", pair[0], pair[1], groups.join(", ")));
        }
    }
    out
}

fn describe_unknown(graph: &BreedGraph, err: &BreedError) -> String {
    let name = match err {
        BreedError::InvalidSource { name } | BreedError::InvalidTarget { name } => name.as_str(),
        _ => return err.to_string(),
    };
    let suggestions = graph.registry().suggest(name, 3);
    if suggestions.is_empty() {
        format!("{err} (not in the egg-group data)")
    } else {
        format!("{err} (did you mean: {}?)", suggestions.join(", "))
    }
}

fn print_stats(graph: &BreedGraph, json: bool) -> Result<()> {
    let stats = graph.stats();
    if json {
        eprintln!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    eprintln!("Pokemon: {}", stats.total_entities);
    eprintln!("Egg groups: {}", stats.total_groups);
    eprintln!("Breeding links: {}", stats.total_edges);
    eprintln!("Isolated: {}", stats.isolated_entities);
    if let Some((group, members)) = &stats.largest_group {
        eprintln!("Largest egg group: {} ({} pokemon)", group, members);
    }
    Ok(())
}
