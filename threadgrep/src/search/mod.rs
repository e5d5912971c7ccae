//! The concurrent search engine.
//!
//! A run is a three-stage pipeline:
//!
//! 1. [`crate::discovery::FileDiscoverer`] lazily yields candidate paths.
//! 2. [`BatchScheduler`] pulls fixed-size batches off that iterator on the
//!    calling thread and submits one task per batch to a rayon pool.
//! 3. [`BatchScanner`] runs inside each task, searching its batch's files in
//!    order and sending [`crate::results::SearchMessage`]s to an unbounded
//!    crossbeam channel.
//!
//! The scheduler's scope is the completion barrier: nothing is summarised
//! until every submitted batch has finished.
//!
//! ```rust,no_run
//! use threadgrep::{run_search, SearchConfig};
//!
//! let config = SearchConfig::new("src", "TODO");
//! let output = run_search(&config)?;
//! for record in &output.records {
//!     println!("{}", record);
//! }
//! println!("{} files contain TODO", output.files_with_matches());
//! # Ok::<(), threadgrep::SearchError>(())
//! ```
pub mod matcher;
pub mod scanner;
pub mod scheduler;

pub use matcher::WordMatcher;
pub use scanner::BatchScanner;
pub use scheduler::{run_search, spawn_search, BatchScheduler, SearchHandle};
