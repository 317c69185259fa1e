//! Crawler module for page fetching and run orchestration
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with retry logic and proxy rotation
//! - Bounded concurrent dispatch of fetch+extract tasks
//! - Overall run coordination for each mode

mod coordinator;
mod dispatch;
mod fetcher;

pub use coordinator::Coordinator;
pub use dispatch::{dispatch, WorkItem, WorkOutcome};
pub use fetcher::{AttemptError, Document, FetchError, Fetcher};

use crate::config::{Config, OutputConfig};
use crate::output::RunReport;
use crate::PodiumError;
use std::fmt;

/// Which data set a run collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every athlete page, folded into per-country and per-sport tallies
    Athletes,
    /// Medal totals from each nation's summary page
    Nations,
    /// Per-country counts from each sport's summary page
    Sports,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Athletes => "athletes",
            Mode::Nations => "nations",
            Mode::Sports => "sports",
        }
    }

    /// Where this mode writes its JSON artifact
    pub fn output_path(self, output: &OutputConfig) -> &str {
        match self {
            Mode::Athletes => &output.athletes_path,
            Mode::Nations => &output.nations_path,
            Mode::Sports => &output.sports_path,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runs one complete scrape
///
/// This is the main entry point for a run. It will:
/// 1. Load the proxy list and build the fetcher
/// 2. Enumerate the mode's directory pages
/// 3. Fetch and extract every listed page
/// 4. Write the JSON artifact
///
/// # Returns
///
/// * `Ok(RunReport)` - The run finished; skipped pages are listed in the report
/// * `Err(PodiumError)` - The run could not start or its output could not be written
pub async fn scrape(config: Config, mode: Mode) -> Result<RunReport, PodiumError> {
    Coordinator::new(config)?.run(mode).await
}
