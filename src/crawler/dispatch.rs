//! Bounded fan-out of fetch+extract tasks
//!
//! Tasks run on the tokio runtime, at most `workers` at a time, and report
//! back over a channel in completion order. The receiving side is the only
//! place results are folded, so no shared mutable state crosses tasks.

use crate::crawler::fetcher::FetchError;
use crate::extract::DirectoryEntry;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// A unit of work identified by the page it fetches
pub trait WorkItem {
    fn url(&self) -> &str;
}

impl WorkItem for String {
    fn url(&self) -> &str {
        self
    }
}

impl WorkItem for DirectoryEntry {
    fn url(&self) -> &str {
        &self.url
    }
}

/// Items tagged with their position in the listing
impl<W: WorkItem> WorkItem for (usize, W) {
    fn url(&self) -> &str {
        self.1.url()
    }
}

/// The result of one task, paired with the item it ran on
#[derive(Debug)]
pub struct WorkOutcome<T, R> {
    pub item: T,
    pub result: Result<R, FetchError>,
}

/// Runs `task` over every item with at most `workers` tasks in flight
///
/// Outcomes arrive on the returned receiver as tasks complete; the channel
/// closes once every item has reported.
///
/// # Arguments
///
/// * `items` - The work list
/// * `workers` - Size of the worker set (zero is treated as one)
/// * `task` - Fetch+extract step run for each item
pub fn dispatch<T, R, F, Fut>(
    items: Vec<T>,
    workers: usize,
    task: F,
) -> mpsc::Receiver<WorkOutcome<T, R>>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, FetchError>> + Send + 'static,
{
    let workers = workers.max(1);
    let (tx, rx) = mpsc::channel(workers);
    let semaphore = Arc::new(Semaphore::new(workers));
    let task = Arc::new(task);

    tokio::spawn(async move {
        for item in items {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };

            let tx = tx.clone();
            let future = (*task)(item.clone());

            tokio::spawn(async move {
                let result = future.await;
                // Receiver gone means the run was abandoned
                let _ = tx.send(WorkOutcome { item, result }).await;
                drop(permit);
            });
        }
    });

    rx
}
