use crossbeam_channel::Sender;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{trace, warn};

use super::matcher::WordMatcher;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::results::{FileAdvisory, MatchRecord, SearchMessage};

const BUFFER_CAPACITY: usize = 65536;

/// The unit of work run by a pool worker: searches every file of one batch,
/// in order, and reports what it finds on the result channel.
#[derive(Debug, Clone)]
pub struct BatchScanner {
    matcher: Arc<WordMatcher>,
    metrics: SearchMetrics,
    sender: Sender<SearchMessage>,
}

impl BatchScanner {
    pub fn new(
        matcher: Arc<WordMatcher>,
        metrics: SearchMetrics,
        sender: Sender<SearchMessage>,
    ) -> Self {
        Self {
            matcher,
            metrics,
            sender,
        }
    }

    /// Scans each file of `batch` in order.
    ///
    /// A file that cannot be opened or read produces one
    /// [`SearchMessage::Skipped`] and contributes nothing else; the rest of
    /// the batch is still scanned.
    pub fn scan(&self, batch: &[PathBuf]) {
        for path in batch {
            match self.scan_file(path) {
                Ok(records) => {
                    self.metrics.record_file_searched(records.len());
                    for record in records {
                        self.send(SearchMessage::Match(record));
                    }
                }
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    self.metrics.record_file_skipped();
                    self.send(SearchMessage::Skipped(FileAdvisory {
                        path: path.clone(),
                        error: err.to_string(),
                    }));
                }
            }
        }
    }

    /// Reads `path` line by line and returns one record per matching line.
    ///
    /// Records are only released once the whole file was read, so a file that
    /// fails half-way never shows up as a match.
    fn scan_file(&self, path: &Path) -> SearchResult<Vec<MatchRecord>> {
        trace!("Processing file: {}", path.display());
        let file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;

        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut buffer = Vec::with_capacity(256);
        let mut records = Vec::new();
        let mut line_number = 0;

        loop {
            buffer.clear();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|e| SearchError::from_io(path, e))?;
            if read == 0 {
                break;
            }

            for raw in split_lines(&buffer) {
                line_number += 1;
                let line = String::from_utf8_lossy(raw);
                if self.matcher.is_match(&line) {
                    trace!("Found match at line {}: {}", line_number, line);
                    records.push(MatchRecord::new(
                        path.to_path_buf(),
                        line_number,
                        line.into_owned(),
                    ));
                }
            }
        }

        Ok(records)
    }

    fn send(&self, message: SearchMessage) {
        if self.sender.send(message).is_err() {
            trace!("Result receiver dropped, discarding message");
        }
    }
}

/// Splits a chunk read up to `\n` into lines.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. The chunk's own terminator is
/// dropped first, so a chunk ending in `\r` does not produce a trailing empty line.
fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = match chunk {
        [rest @ .., b'\r', b'\n'] => rest,
        [rest @ .., b'\n'] | [rest @ .., b'\r'] => rest,
        _ => chunk,
    };
    body.split(|&b| b == b'\r')
}
