use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};

/// Number of candidate paths handed to a worker as one unit of work.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations, later entries
/// overriding earlier ones:
/// 1. Global `$CONFIG_DIR/threadgrep/config.yaml`
/// 2. Local `.threadgrep.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// # Configuration Format
///
/// ```yaml
/// # Directory to search
/// root_path: "."
///
/// # Literal word to look for
/// query: "TODO"
///
/// # Worker threads (default: CPU cores)
/// thread_count: 4
///
/// # Files per batch
/// batch_size: 50
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// Command-line values take precedence over file values; see
/// [`SearchConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Root directory to start search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Literal word to search for, matched case-sensitively on word boundaries
    #[serde(default)]
    pub query: String,

    /// Size of the worker pool.
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Maximum number of files per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Values supplied on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_path: Option<PathBuf>,
    pub query: Option<String>,
    pub thread_count: Option<NonZeroUsize>,
    pub batch_size: Option<NonZeroUsize>,
    pub log_level: Option<String>,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl SearchConfig {
    /// Creates a config for `query` under `root_path` with default pool and batch sizes
    pub fn new(root_path: impl Into<PathBuf>, query: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            query: query.into(),
            thread_count: default_thread_count(),
            batch_size: default_batch_size(),
            log_level: default_log_level(),
        }
    }

    pub fn with_thread_count(mut self, thread_count: NonZeroUsize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Loads configuration from the default locations
    pub fn load() -> SearchResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an explicit file.
    ///
    /// The explicit file must exist; the default locations are optional.
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            dirs::config_dir().map(|p| p.join("threadgrep/config.yaml")),
            Some(PathBuf::from(".threadgrep.yaml")),
        ];

        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| SearchError::config_error(e.to_string()))
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(query) = cli.query {
            self.query = query;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(batch_size) = cli.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Pre-run checks. The engine itself does not look at the root; callers
    /// that want a descriptive failure for a bad root call this first.
    pub fn validate(&self) -> SearchResult<()> {
        if self.query.is_empty() {
            return Err(SearchError::invalid_pattern("query must not be empty"));
        }
        if !self.root_path.exists() {
            return Err(SearchError::config_error(format!(
                "path {} does not exist",
                self.root_path.display()
            )));
        }
        if !self.root_path.is_dir() {
            return Err(SearchError::config_error(format!(
                "path {} is not a directory",
                self.root_path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        config_path
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = write_config(
            &dir,
            r#"
            root_path: "src"
            query: "TODO"
            thread_count: 4
            batch_size: 10
            log_level: "debug"
        "#,
        );

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.root_path, PathBuf::from("src"));
        assert_eq!(config.query, "TODO");
        assert_eq!(config.thread_count, NonZeroUsize::new(4).unwrap());
        assert_eq!(config.batch_size, NonZeroUsize::new(10).unwrap());
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = write_config(&dir, "query: \"needle\"\n");

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.query, "needle");
        assert_eq!(config.root_path, PathBuf::from("."));
        assert_eq!(config.batch_size.get(), DEFAULT_BATCH_SIZE);
        assert_eq!(config.thread_count.get(), num_cpus::get().max(1));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = tempdir().unwrap();
        let config_path = write_config(&dir, "query: \"x\"\nthread_count: 0\n");

        let result = SearchConfig::load_from(Some(&config_path));
        assert!(matches!(result, Err(SearchError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = write_config(
            &dir,
            r#"
            root_path: []
            batch_size: "lots"
        "#,
        );

        let result = SearchConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SearchConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let file_config = SearchConfig::new("src", "TODO")
            .with_thread_count(NonZeroUsize::new(4).unwrap())
            .with_batch_size(NonZeroUsize::new(20).unwrap());

        let merged = file_config.merge_with_cli(ConfigOverrides {
            root_path: Some(PathBuf::from("tests")),
            query: None,
            thread_count: Some(NonZeroUsize::new(8).unwrap()),
            batch_size: None,
            log_level: Some("debug".to_string()),
        });

        assert_eq!(merged.root_path, PathBuf::from("tests")); // CLI value
        assert_eq!(merged.query, "TODO"); // File value
        assert_eq!(merged.thread_count.get(), 8); // CLI value
        assert_eq!(merged.batch_size.get(), 20); // File value
        assert_eq!(merged.log_level, "debug"); // CLI value
    }

    #[test]
    fn test_validate() {
        let dir = tempdir().unwrap();

        assert!(SearchConfig::new(dir.path(), "word").validate().is_ok());

        let err = SearchConfig::new(dir.path(), "").validate().unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern(_)));

        let missing = dir.path().join("missing");
        let err = SearchConfig::new(&missing, "word").validate().unwrap_err();
        assert!(matches!(err, SearchError::ConfigError(_)));

        let file = dir.path().join("file.txt");
        std::fs::write(&file, "word").unwrap();
        let err = SearchConfig::new(&file, "word").validate().unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
