use crossbeam_channel::{unbounded, Receiver, Sender};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

use super::matcher::WordMatcher;
use super::scanner::BatchScanner;
use crate::config::SearchConfig;
use crate::discovery::FileDiscoverer;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::results::{SearchMessage, SearchOutput, SearchSummary};

/// Groups discovered files into batches and runs one scan task per batch on
/// a fixed-size worker pool.
///
/// Discovery and submission happen on the thread calling [`run`]; workers
/// only ever receive an owned `Vec<PathBuf>`. Submission never waits for
/// earlier batches, and `run` returns only after every submitted batch has
/// finished, successfully or not.
///
/// The result channel is unbounded. A query that matches nearly every line
/// grows memory with the number of matches until the receiver drains it.
///
/// [`run`]: BatchScheduler::run
pub struct BatchScheduler {
    root: PathBuf,
    matcher: Arc<WordMatcher>,
    batch_size: usize,
    pool: ThreadPool,
}

impl BatchScheduler {
    /// Compiles the matcher and starts a pool of exactly `thread_count` workers
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        let matcher = Arc::new(WordMatcher::new(&config.query)?);
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.thread_count.get())
            .thread_name(|i| format!("threadgrep-worker-{}", i))
            .build()
            .map_err(|e| SearchError::worker_pool(e.to_string()))?;

        Ok(Self {
            root: config.root_path.clone(),
            matcher,
            batch_size: config.batch_size.get(),
            pool,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs the search to completion, sending every message to `sender`.
    ///
    /// The receiving end may be drained concurrently or after this returns.
    pub fn run(&self, sender: &Sender<SearchMessage>) -> SearchSummary {
        info!(
            "Starting search in {} for \"{}\" ({} workers, batches of {})",
            self.root.display(),
            self.matcher.query(),
            self.worker_count(),
            self.batch_size
        );

        let metrics = SearchMetrics::new();
        let scanner = BatchScanner::new(self.matcher.clone(), metrics.clone(), sender.clone());
        let mut discoverer = FileDiscoverer::new(&self.root);

        self.pool.in_place_scope(|scope| {
            let mut batch_id = 0usize;
            loop {
                let batch: Vec<PathBuf> = discoverer.by_ref().take(self.batch_size).collect();
                if batch.is_empty() {
                    break;
                }

                debug!("Dispatching batch {} with {} files", batch_id, batch.len());
                metrics.record_batch_dispatched();

                let scanner = scanner.clone();
                let metrics = metrics.clone();
                scope.spawn(move |_| {
                    run_batch(batch_id, batch.len(), &metrics, || scanner.scan(&batch))
                });
                batch_id += 1;
            }
        });

        let summary = metrics.summary();
        metrics.log_stats();
        info!(
            "All batches completed. {} files contain \"{}\"",
            summary.files_with_matches,
            self.matcher.query()
        );
        summary
    }

    /// Runs the search on a background thread and returns immediately.
    ///
    /// Messages can be consumed while the search is in progress.
    pub fn spawn(self) -> SearchResult<SearchHandle> {
        let (sender, receiver) = unbounded();
        let worker = thread::Builder::new()
            .name("threadgrep-scheduler".to_string())
            .spawn(move || self.run(&sender))?;

        Ok(SearchHandle { receiver, worker })
    }
}

/// Runs one batch task, containing any panic so sibling batches are unaffected
fn run_batch<F: FnOnce()>(batch_id: usize, files: usize, metrics: &SearchMetrics, task: F) {
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(()) => debug!("Batch {} done", batch_id),
        Err(_) => {
            warn!("Batch {} aborted while scanning {} files", batch_id, files);
            metrics.record_batch_failed();
        }
    }
}

/// A search running in the background
pub struct SearchHandle {
    receiver: Receiver<SearchMessage>,
    worker: JoinHandle<SearchSummary>,
}

impl SearchHandle {
    /// Blocking iterator over messages; ends once every batch has finished
    pub fn messages(&self) -> crossbeam_channel::Iter<'_, SearchMessage> {
        self.receiver.iter()
    }

    /// Waits for the run to finish and returns its summary
    pub fn join(self) -> SearchResult<SearchSummary> {
        self.worker
            .join()
            .map_err(|_| SearchError::worker_pool("scheduler thread panicked"))
    }
}

/// Runs a whole search and drains the result channel after the completion barrier.
///
/// Records come back sorted by path then line number.
pub fn run_search(config: &SearchConfig) -> SearchResult<SearchOutput> {
    let scheduler = BatchScheduler::new(config)?;
    let (sender, receiver) = unbounded();

    let summary = scheduler.run(&sender);
    drop(sender);

    let mut output = SearchOutput::new(summary);
    output.extend(receiver.try_iter());
    output.sort();
    Ok(output)
}

/// Starts a search on a background thread; see [`BatchScheduler::spawn`]
pub fn spawn_search(config: &SearchConfig) -> SearchResult<SearchHandle> {
    BatchScheduler::new(config)?.spawn()
}
