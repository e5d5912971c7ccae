pub mod config;
pub mod discovery;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod search;

pub use config::{ConfigOverrides, SearchConfig};
pub use discovery::{discover, FileDiscoverer};
pub use errors::{SearchError, SearchResult};
pub use results::{FileAdvisory, MatchRecord, SearchMessage, SearchOutput, SearchSummary};
pub use search::{run_search, spawn_search, BatchScheduler, SearchHandle};
