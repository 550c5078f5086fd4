use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use secnews_aggregator::{
    export, Collection, CollectionCache, Collector, CollectorConfig, SourceRegistry,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "secnews")]
#[command(about = "Collect, classify and search security news from RSS/Atom feeds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one collection cycle and print summary statistics
    Collect {
        #[command(flatten)]
        cycle: CycleArgs,

        /// Write the collection as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List configured sources
    Sources {
        /// JSON file of extra or overriding sources (name -> feed URL)
        #[arg(long)]
        sources_file: Option<PathBuf>,
    },
    /// Run one collection cycle and print the matching items
    Search {
        /// Text to look for in titles, summaries and keywords
        query: String,

        #[command(flatten)]
        cycle: CycleArgs,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        source: Option<String>,

        /// Earliest date, e.g. "2025-01-01" or "2025-01-01 08:00"
        #[arg(long)]
        since: Option<String>,

        /// Latest date, same format as --since
        #[arg(long)]
        until: Option<String>,
    },
}

#[derive(Args)]
struct CycleArgs {
    /// Maximum simultaneous feed fetches
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-feed timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// JSON file of extra or overriding sources (name -> feed URL)
    #[arg(long)]
    sources_file: Option<PathBuf>,

    /// Fall back to the built-in demo items when nothing could be collected
    #[arg(long)]
    demo_fallback: bool,
}

impl CycleArgs {
    async fn run(&self) -> Result<Collection> {
        let mut config = CollectorConfig::from_env().context("Failed to read configuration")?;
        if let Some(workers) = self.workers {
            config = config.with_max_workers(workers);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout_seconds(timeout);
        }
        config.validate().context("Invalid configuration")?;

        let mut collector = Collector::new(config).context("Failed to set up collector")?;
        if let Some(path) = &self.sources_file {
            let registry = SourceRegistry::new().with_sources_file(path);
            *collector.registry_mut() = registry;
        }

        let run = collector
            .collect_with_reports()
            .await
            .context("Collection cycle failed")?;

        for report in run.reports.iter().filter(|r| !r.success) {
            warn!(
                "{}: no items ({})",
                report.source,
                report.error.as_deref().unwrap_or("unknown error")
            );
        }

        if self.demo_fallback {
            Ok(run.collection.or_demo())
        } else {
            Ok(run.collection)
        }
    }
}

fn print_stats(collection: &Collection) -> Result<()> {
    let stats = collection.summary_stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Collect { cycle, output } => {
            let cache = CollectionCache::new();
            let collection = cache.store(cycle.run().await?).await;
            print_stats(&collection)?;
            println!("{}", serde_json::to_string_pretty(&cache.status().await)?);

            if let Some(path) = output {
                export::write_json(&collection, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
        Command::Sources { sources_file } => {
            let registry = match sources_file {
                Some(path) => SourceRegistry::new().with_sources_file(path),
                None => SourceRegistry::new(),
            };

            println!("{} sources", registry.len());
            for source in registry.list() {
                let marker = if source.is_default { "*" } else { "+" };
                println!("{} {}\n    {}", marker, source.name, source.endpoint);
            }
        }
        Command::Search {
            query,
            cycle,
            category,
            source,
            since,
            until,
        } => {
            let mut results = cycle.run().await?.search(&query);
            if let Some(category) = category {
                results = results.filter_by_category(&category);
            }
            if let Some(source) = source {
                results = results.filter_by_source(&source);
            }
            results = results.filter_by_date_range(since.as_deref(), until.as_deref());

            info!("{} matching items", results.len());
            for item in &results {
                println!("[{}] {} | {} | {}", item.date, item.source, item.category, item.title);
                if !item.keywords.is_empty() {
                    println!("    keywords: {}", item.keywords_str());
                }
                println!("    {}", item.link);
            }
        }
    }

    Ok(())
}
