//! Scrape coordinator - run orchestration logic
//!
//! This module drives the three run modes:
//! - Enumerating the work list from directory pages
//! - Fanning fetch+extract tasks out over the worker set
//! - Folding results as they complete and recording skipped items
//! - Writing the JSON artifact

use crate::aggregate::{AggregateOutput, NationTotals, SportTable, Tallies};
use crate::config::Config;
use crate::crawler::dispatch::{dispatch, WorkItem, WorkOutcome};
use crate::crawler::fetcher::{Document, Fetcher};
use crate::crawler::Mode;
use crate::extract::{
    extract_athlete, extract_directory, extract_nation_totals, extract_sport_table,
    DirectoryEntry, DirectoryKind,
};
use crate::output::{write_json, RunReport};
use crate::proxy::ProxyPool;
use crate::PodiumError;
use scraper::Html;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// Main scrape coordinator
///
/// Owns the configuration and the fetcher (and through it the proxy pool).
/// Results from workers come back over a channel and are folded here only.
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<Fetcher>,
}

impl Coordinator {
    /// Creates a coordinator from configuration
    ///
    /// Loads the proxy list; a missing list aborts before any work starts.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(PodiumError)` - Proxy list missing or malformed, or client setup failed
    pub fn new(config: Config) -> Result<Self, PodiumError> {
        let pool = ProxyPool::from_config(&config)?;
        let fetcher = Fetcher::new(Arc::new(pool), &config.http)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
        }
    }

    /// Runs one mode end to end and writes its JSON artifact
    pub async fn run(&self, mode: Mode) -> Result<RunReport, PodiumError> {
        tracing::info!("Starting {} run against {}", mode, self.config.site.base_url);
        let path = PathBuf::from(mode.output_path(&self.config.output));

        let mut report = match mode {
            Mode::Athletes => {
                let (output, report) = self.collect_athletes().await?;
                write_json(&path, &output)?;
                report
            }
            Mode::Nations => {
                let (totals, report) = self.collect_nations().await?;
                write_json(&path, &totals)?;
                report
            }
            Mode::Sports => {
                let (table, report) = self.collect_sports().await?;
                write_json(&path, &table)?;
                report
            }
        };

        report.output_path = Some(path);
        tracing::info!(
            "{} run finished: {}/{} processed, {} skipped, {} directory pages skipped, {} proxies left",
            mode,
            report.processed,
            report.listed,
            report.skipped_items(),
            report.skipped_listings,
            self.fetcher.pool().len()
        );
        tracing::debug!("Proxies still pooled: {:?}", self.fetcher.pool().endpoints());

        Ok(report)
    }

    /// Athletes mode: letter pages -> athlete pages -> aggregated tallies
    pub async fn collect_athletes(&self) -> Result<(AggregateOutput, RunReport), PodiumError> {
        let base = self.base_url()?;
        let mut report = RunReport::new(Mode::Athletes);

        let links = self.gather_athlete_links(&base, &mut report).await?;
        report.listed = links.len();
        tracing::info!("Total athletes: {}", links.len());

        let mut outcomes = self.fetch_all(links, extract_athlete);
        let mut athletes = Vec::new();
        let mut tallies = Tallies::new();

        while let Some(WorkOutcome { item, result }) = outcomes.recv().await {
            match result {
                Ok(record) => {
                    tallies.fold(&record);
                    athletes.push(record);
                    report.processed += 1;
                }
                Err(error) => report.skip(&item, &error),
            }
            log_progress(&report);
        }

        if cfg!(debug_assertions) {
            for (country, tally) in tallies.by_country() {
                if tallies.sport_sum(country) != *tally {
                    tracing::warn!("Per-sport tallies for {} do not sum to its total", country);
                }
            }
        }

        Ok((tallies.into_output(athletes), report))
    }

    /// Nations mode: nation directory -> per-nation medal totals
    ///
    /// Output follows directory order; nations whose page failed are left out.
    pub async fn collect_nations(&self) -> Result<(Vec<NationTotals>, RunReport), PodiumError> {
        let base = self.base_url()?;
        let mut report = RunReport::new(Mode::Nations);

        let nations = self.load_nation_directory(&base).await?;
        report.listed = nations.len();
        tracing::info!("Total nations: {}", nations.len());

        let indexed: Vec<(usize, DirectoryEntry)> = nations.into_iter().enumerate().collect();
        let mut outcomes = self.fetch_all(indexed, extract_nation_totals);
        let mut totals = BTreeMap::new();

        while let Some(WorkOutcome { item: (index, nation), result }) = outcomes.recv().await {
            match result {
                Ok(medals) => {
                    tracing::debug!(
                        "{}: {} medals ({} gold, {} silver, {} bronze)",
                        nation.name,
                        medals.total(),
                        medals.gold,
                        medals.silver,
                        medals.bronze
                    );
                    totals.insert(
                        index,
                        NationTotals {
                            country: nation.name,
                            medals,
                        },
                    );
                    report.processed += 1;
                }
                Err(error) => report.skip(&nation.url, &error),
            }
            log_progress(&report);
        }

        Ok((totals.into_values().collect(), report))
    }

    /// Sports mode: sport directory -> country x sport medal table
    pub async fn collect_sports(&self) -> Result<(SportTable, RunReport), PodiumError> {
        let base = self.base_url()?;
        let mut report = RunReport::new(Mode::Sports);

        let directory = self.fetch_directory(&self.config.site.sports_url()).await?;
        let sports = directory.extract(|html| extract_directory(html, DirectoryKind::Sport, &base));
        let sports = non_empty(sports, DirectoryKind::Sport)?;
        report.listed = sports.len();
        tracing::info!("Total sports: {}", sports.len());

        let mut outcomes = self.fetch_all(sports, extract_sport_table);
        let mut table = SportTable::new();

        while let Some(WorkOutcome { item: sport, result }) = outcomes.recv().await {
            match result {
                Ok(rows) => {
                    tracing::debug!("{}: {} countries", sport.name, rows.len());
                    for (country, tally) in rows {
                        table.insert(&country, &sport.name, tally);
                    }
                    report.processed += 1;
                }
                Err(error) => report.skip(&sport.url, &error),
            }
            log_progress(&report);
        }

        tracing::info!("Sport table covers {} countries", table.country_count());
        Ok((table, report))
    }

    /// Fetches every letter page and collects the athlete URLs they list
    ///
    /// Failed letter pages are skipped; if none succeeds, the run cannot start.
    async fn gather_athlete_links(
        &self,
        base: &Url,
        report: &mut RunReport,
    ) -> Result<Vec<String>, PodiumError> {
        let site = &self.config.site;
        let pages: Vec<String> = site.letters.iter().map(|l| site.letter_url(l)).collect();
        let page_count = pages.len();

        let listing_base = base.clone();
        let mut outcomes = self.fetch_all(pages, move |html: &Html| {
            extract_directory(html, DirectoryKind::Athlete, &listing_base)
        });

        let mut reached = 0;
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        while let Some(WorkOutcome { item: page, result }) = outcomes.recv().await {
            match result {
                Ok(entries) => {
                    reached += 1;
                    tracing::info!("{} lists {} athletes", page, entries.len());
                    links.extend(
                        entries
                            .into_iter()
                            .map(|entry| entry.url)
                            .filter(|url| seen.insert(url.clone())),
                    );
                }
                Err(error) => report.skip_listing(&page, &error),
            }
        }

        if reached == 0 {
            return Err(PodiumError::DirectoryUnavailable {
                what: DirectoryKind::Athlete.label().to_string(),
                reason: format!("none of {} letter pages could be fetched", page_count),
            });
        }

        non_empty(links, DirectoryKind::Athlete)
    }

    /// Reads the nation directory from the local cache, or fetches it
    async fn load_nation_directory(&self, base: &Url) -> Result<Vec<DirectoryEntry>, PodiumError> {
        let cache = Path::new(&self.config.output.nations_cache);

        let directory = if !self.config.output.nations_cache.is_empty() && cache.is_file() {
            tracing::info!("Reading nation directory from {}", cache.display());
            Document::new(cache.display().to_string(), std::fs::read_to_string(cache)?)
        } else {
            self.fetch_directory(&self.config.site.nations_url()).await?
        };

        let nations = directory.extract(|html| extract_directory(html, DirectoryKind::Nation, base));
        non_empty(nations, DirectoryKind::Nation)
    }

    /// Fetches a directory page; failure here is fatal for the run
    async fn fetch_directory(&self, url: &str) -> Result<Document, PodiumError> {
        self.fetcher
            .fetch_default(url)
            .await
            .map_err(|error| PodiumError::DirectoryUnavailable {
                what: url.to_string(),
                reason: error.to_string(),
            })
    }

    /// Fans fetch+extract out over the worker set
    fn fetch_all<T, R, E>(&self, items: Vec<T>, extract: E) -> mpsc::Receiver<WorkOutcome<T, R>>
    where
        T: WorkItem + Clone + Send + 'static,
        R: Send + 'static,
        E: Fn(&Html) -> R + Clone + Send + Sync + 'static,
    {
        let fetcher = Arc::clone(&self.fetcher);

        dispatch(items, self.config.http.workers, move |item: T| {
            let fetcher = Arc::clone(&fetcher);
            let extract = extract.clone();
            let url = item.url().to_owned();
            async move {
                let document = fetcher.fetch_default(&url).await?;
                Ok(document.extract(extract))
            }
        })
    }

    fn base_url(&self) -> Result<Url, PodiumError> {
        Ok(Url::parse(&self.config.site.base_url)?)
    }
}

/// Rejects an empty work list
fn non_empty<T>(items: Vec<T>, kind: DirectoryKind) -> Result<Vec<T>, PodiumError> {
    if items.is_empty() {
        return Err(PodiumError::DirectoryUnavailable {
            what: kind.label().to_string(),
            reason: "the directory lists no entries".to_string(),
        });
    }
    Ok(items)
}

fn log_progress(report: &RunReport) {
    let done = report.completed();
    if done % 10 == 0 || done >= report.listed {
        tracing::info!("Progress: {}/{} ({} skipped)", done, report.listed, report.skipped_items());
    }
}
