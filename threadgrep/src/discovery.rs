use ignore::{DirEntry, Walk, WalkBuilder};
use std::fs;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::errors::unify_path;
use crate::filters::{has_excluded_segment, is_excluded_name, should_include_file};

/// Lazily walks a directory tree and yields the absolute paths of files
/// that pass the extension allow-list and directory exclusion filters.
///
/// The walk is single-pass: once exhausted it keeps returning `None`.
/// Only the walker's cursor is held in memory, never the list of files.
/// Yield order is whatever the filesystem enumeration produces. A root that
/// itself lies inside an excluded directory yields nothing.
pub struct FileDiscoverer {
    root: PathBuf,
    walker: Walk,
    exhausted: bool,
}

impl FileDiscoverer {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = absolute_root(root.as_ref());
        debug!("Scanning directory: {}", root.display());

        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(|entry| !is_excluded_dir(entry));

        let exhausted = has_excluded_segment(&root);
        if exhausted {
            debug!("Root {} lies in an excluded directory", root.display());
        }

        Self {
            walker: builder.build(),
            root,
            exhausted,
        }
    }

    /// The absolute root this discoverer walks
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for FileDiscoverer {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        if self.exhausted {
            return None;
        }
        loop {
            let entry = match self.walker.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
                None => {
                    self.exhausted = true;
                    return None;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            let path = entry.into_path();
            if should_include_file(&path) {
                trace!("Discovered candidate: {}", path.display());
                return Some(path);
            }
        }
    }
}

impl FusedIterator for FileDiscoverer {}

/// Convenience constructor matching the discoverer's contract
pub fn discover(root: impl AsRef<Path>) -> FileDiscoverer {
    FileDiscoverer::new(root)
}

fn absolute_root(root: &Path) -> PathBuf {
    let unified = unify_path(root);
    if unified.is_absolute() {
        return unified;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(unified),
        Err(_) => unified,
    }
}

/// Prunes excluded directories so their subtrees are never read
fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|ft| ft.is_dir())
        && entry.file_name().to_str().is_some_and(is_excluded_name)
}

/// Regular files, and symlinks whose target is a regular file
fn is_regular_file(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => fs::metadata(entry.path()).is_ok_and(|m| m.is_file()),
        _ => false,
    }
}
