//! Per-run report of processed and skipped work items

use crate::crawler::{FetchError, Mode};
use std::path::PathBuf;

/// A work item that was given up on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub url: String,
    pub error: String,
}

/// Summary of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: Mode,

    /// Entity pages found in the directory
    pub listed: usize,

    /// Entity pages fetched and extracted
    pub processed: usize,

    /// Directory and entity pages that failed terminally
    pub skipped: Vec<SkippedItem>,

    /// How many of `skipped` are directory pages rather than listed items
    pub skipped_listings: usize,

    /// Where the JSON artifact was written
    pub output_path: Option<PathBuf>,
}

impl RunReport {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            listed: 0,
            processed: 0,
            skipped: Vec::new(),
            skipped_listings: 0,
            output_path: None,
        }
    }

    /// Records a terminal failure for `url`
    pub fn skip(&mut self, url: &str, error: &FetchError) {
        tracing::warn!("Skipping {}: {}", url, error);
        self.skipped.push(SkippedItem {
            url: url.to_string(),
            error: error.to_string(),
        });
    }

    /// Records a terminal failure for a directory page
    ///
    /// Directory pages are not part of `listed`, so they do not count
    /// toward progress.
    pub fn skip_listing(&mut self, url: &str, error: &FetchError) {
        self.skip(url, error);
        self.skipped_listings += 1;
    }

    /// Listed items skipped after a terminal failure
    pub fn skipped_items(&self) -> usize {
        self.skipped.len() - self.skipped_listings
    }

    /// Listed items finished so far, successfully or not
    pub fn completed(&self) -> usize {
        self.processed + self.skipped_items()
    }

    /// Whether every listed page was processed and no directory page failed
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.processed == self.listed
    }
}

/// Prints the report to stdout
pub fn print_report(report: &RunReport) {
    println!("=== Podium {} run ===\n", report.mode);
    println!("Listed:    {}", report.listed);
    println!("Processed: {}", report.processed);
    println!("Skipped:   {}", report.skipped_items());
    if report.skipped_listings > 0 {
        println!("Directory pages skipped: {}", report.skipped_listings);
    }

    for item in &report.skipped {
        println!("  - {} ({})", item.url, item.error);
    }

    if let Some(path) = &report.output_path {
        println!("\n✓ Results written to: {}", path.display());
    }
}
