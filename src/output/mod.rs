//! Output module for writing scrape results
//!
//! This module handles:
//! - Writing the JSON artifact of each run mode
//! - Recording and printing per-run reports

mod json;
mod report;

pub use json::write_json;
pub use report::{print_report, RunReport, SkippedItem};
