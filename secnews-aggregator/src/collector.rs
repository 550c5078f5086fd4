use crate::classifier::classify;
use crate::collection::Collection;
use crate::config::CollectorConfig;
use crate::dedup::Deduplicator;
use crate::fetcher::HttpFeedFetcher;
use crate::html::ScraperStripper;
use crate::normalizer::{NormalizedEntry, Normalizer};
use crate::registry::SourceRegistry;
use crate::traits::{FeedFetcher, HtmlStripper};
use crate::types::{AggregatorError, NewsItem, Result, Source, SourceReport};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Output of one collection cycle.
#[derive(Debug, Clone)]
pub struct CollectionRun {
    pub collection: Collection,
    /// One report per source, in registry order.
    pub reports: Vec<SourceReport>,
}

/// What one source task hands back to the merge step.
struct SourceHarvest {
    index: usize,
    source: Source,
    entries: Vec<NormalizedEntry>,
    report: SourceReport,
}

/// Runs collection cycles over a [`SourceRegistry`].
pub struct Collector {
    registry: SourceRegistry,
    fetcher: Arc<dyn FeedFetcher>,
    normalizer: Normalizer,
    config: CollectorConfig,
}

impl Collector {
    /// HTTP fetching, `scraper` HTML stripping, the default sources.
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFeedFetcher::new(config.fetch.clone())?);
        Self::with_fetcher(config, SourceRegistry::new(), fetcher)
    }

    pub fn with_fetcher(
        config: CollectorConfig,
        registry: SourceRegistry,
        fetcher: Arc<dyn FeedFetcher>,
    ) -> Result<Self> {
        Self::with_components(config, registry, fetcher, Arc::new(ScraperStripper))
    }

    pub fn with_components(
        config: CollectorConfig,
        registry: SourceRegistry,
        fetcher: Arc<dyn FeedFetcher>,
        stripper: Arc<dyn HtmlStripper>,
    ) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(stripper, config.summary_max_length);

        Ok(Self {
            registry,
            fetcher,
            normalizer,
            config,
        })
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SourceRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Run one collection cycle and return the merged, sorted collection.
    pub async fn collect(&self) -> Result<Collection> {
        Ok(self.collect_with_reports().await?.collection)
    }

    /// Run one collection cycle.
    ///
    /// Source failures never fail the cycle; they show up as unsuccessful
    /// reports and contribute no items. Only invalid configuration is an error.
    pub async fn collect_with_reports(&self) -> Result<CollectionRun> {
        self.config.validate()?;

        let sources = self.registry.snapshot();
        let total_sources = sources.len();
        info!(
            "Collecting from {} sources ({} workers, fetcher: {})",
            total_sources,
            self.config.max_workers,
            self.fetcher.fetcher_name()
        );

        let mut harvests: Vec<SourceHarvest> = stream::iter(sources.into_iter().enumerate())
            .map(|(index, source)| self.harvest_source(index, source))
            .buffer_unordered(self.config.max_workers)
            .collect()
            .await;

        // Completion order is arbitrary; merge in registry order.
        harvests.sort_by_key(|h| h.index);

        let run = merge_harvests(harvests);
        let successful = run.reports.iter().filter(|r| r.success).count();
        info!(
            "Collected {} unique items ({}/{} sources succeeded)",
            run.collection.len(),
            successful,
            total_sources
        );
        Ok(run)
    }

    async fn harvest_source(&self, index: usize, source: Source) -> SourceHarvest {
        let start_time = Instant::now();
        let timeout_seconds = self.config.fetch.timeout_seconds;

        debug!(source = %source.name, "Fetching {}", source.endpoint);
        let fetched = match tokio::time::timeout(
            Duration::from_secs(timeout_seconds),
            self.fetcher.fetch(&source.endpoint),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AggregatorError::Timeout {
                seconds: timeout_seconds,
            }),
        };
        let response_time_ms = start_time.elapsed().as_millis() as u64;

        let mut report = SourceReport {
            source: source.name.clone(),
            endpoint: source.endpoint.clone(),
            success: false,
            entries_found: 0,
            new_items: 0,
            error: None,
            response_time_ms,
        };

        let entries = match fetched {
            Ok(raw_entries) => {
                report.success = true;
                report.entries_found = raw_entries.len();
                raw_entries
                    .iter()
                    .take(self.config.max_entries_per_source)
                    .filter_map(|entry| self.normalizer.normalize(entry))
                    .collect()
            }
            Err(e) => {
                warn!(source = %source.name, "Fetch failed: {}", e);
                report.error = Some(e.to_string());
                Vec::new()
            }
        };

        SourceHarvest {
            index,
            source,
            entries,
            report,
        }
    }
}

/// Admit, classify and sort the per-source results.
///
/// `harvests` must already be in registry order: for an item published by
/// several sources, the earliest source in that order keeps it.
fn merge_harvests(harvests: Vec<SourceHarvest>) -> CollectionRun {
    let dedup = Deduplicator::new();
    let mut items: Vec<NewsItem> = Vec::new();
    let mut reports = Vec::with_capacity(harvests.len());

    for harvest in harvests {
        let SourceHarvest {
            source,
            entries,
            mut report,
            ..
        } = harvest;

        for entry in entries {
            let admission = dedup.admit(&entry.title, &entry.link);
            if !admission.is_novel {
                continue;
            }

            let classification = classify(&entry.title, &entry.summary);
            items.push(NewsItem {
                title: entry.title,
                link: entry.link,
                date: entry.date,
                summary: entry.summary,
                source: source.name.clone(),
                category: classification.category,
                keywords: classification.keywords,
                content_hash: admission.fingerprint,
            });
            report.new_items += 1;
        }

        if report.success {
            info!(source = %report.source, "{} new items", report.new_items);
        }
        reports.push(report);
    }

    CollectionRun {
        collection: Collection::from_items(items),
        reports,
    }
}
