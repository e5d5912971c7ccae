//! Messages produced by a search run and the summary returned at the end.
//!
//! Workers never share mutable result state beyond the counters in
//! [`crate::metrics`]; everything else is an owned, immutable value moved
//! through the result channel.
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One line of one file containing the query as a whole word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// The file containing the match
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// The decoded line, without its line terminator
    pub line_content: String,
    /// Pre-rendered, human-readable report line
    pub message: String,
}

impl MatchRecord {
    pub fn new(path: PathBuf, line_number: usize, line_content: String) -> Self {
        let message = format!("Found in \"{}\" on line {}", path.display(), line_number);
        Self {
            path,
            line_number,
            line_content,
            message,
        }
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A file that could not be searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAdvisory {
    pub path: PathBuf,
    pub error: String,
}

impl fmt::Display for FileAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skipped {}: {}", self.path.display(), self.error)
    }
}

/// An element of the result queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMessage {
    Match(MatchRecord),
    Skipped(FileAdvisory),
}

/// Aggregate counts for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    /// Distinct files with at least one matching line
    pub files_with_matches: usize,
    /// Files opened and read to the end
    pub files_searched: usize,
    /// Files that could not be opened or read
    pub files_skipped: usize,
    /// Total matching lines across all files
    pub matched_lines: usize,
    /// Batches submitted to the pool
    pub batches_dispatched: usize,
    /// Batches whose task aborted unexpectedly
    pub batches_failed: usize,
}

/// Everything a run produced, drained after the completion barrier
#[derive(Debug, Clone, Default)]
pub struct SearchOutput {
    pub records: Vec<MatchRecord>,
    pub advisories: Vec<FileAdvisory>,
    pub summary: SearchSummary,
}

impl SearchOutput {
    pub fn new(summary: SearchSummary) -> Self {
        Self {
            records: Vec::new(),
            advisories: Vec::new(),
            summary,
        }
    }

    /// Files the caller should report as containing the query
    pub fn files_with_matches(&self) -> usize {
        self.summary.files_with_matches
    }

    /// Sorts records by path then line, for callers that want a stable listing
    pub fn sort(&mut self) {
        self.records
            .sort_by(|a, b| (&a.path, a.line_number).cmp(&(&b.path, b.line_number)));
        self.advisories.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn push(&mut self, message: SearchMessage) {
        match message {
            SearchMessage::Match(record) => self.records.push(record),
            SearchMessage::Skipped(advisory) => self.advisories.push(advisory),
        }
    }
}

impl Extend<SearchMessage> for SearchOutput {
    fn extend<I: IntoIterator<Item = SearchMessage>>(&mut self, iter: I) {
        for message in iter {
            self.push(message);
        }
    }
}
