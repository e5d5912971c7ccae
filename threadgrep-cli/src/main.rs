use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use threadgrep::{spawn_search, ConfigOverrides, SearchConfig, SearchMessage, SearchSummary};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Look for a whole word in every text file under a directory
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to search in, relative to the current directory
    path: PathBuf,

    /// Word to search for (case-sensitive, whole words only)
    query: String,

    /// Number of worker threads
    #[arg(short = 'j', long = "max-workers")]
    max_workers: Option<NonZeroUsize>,

    /// Number of files handed to a worker at a time
    #[arg(short = 'b', long)]
    batch_size: Option<NonZeroUsize>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print matches as JSON lines
    #[arg(long)]
    json: bool,

    /// Log level when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dir = std::env::current_dir()
        .context("cannot determine current directory")?
        .join(&cli.path);
    if !dir.exists() {
        eprintln!(
            "{} Path {} does not exist",
            "ERROR:".red(),
            dir.display().to_string().yellow()
        );
        process::exit(1);
    }

    let loaded = match cli.config.as_deref() {
        Some(path) => SearchConfig::load_from(Some(path))?,
        None => SearchConfig::load()?,
    };
    let config = loaded.merge_with_cli(ConfigOverrides {
        root_path: Some(dir),
        query: Some(cli.query),
        thread_count: cli.max_workers,
        batch_size: cli.batch_size,
        log_level: cli.log_level,
    });

    init_tracing(&config.log_level);
    debug!("Resolved configuration: {:?}", config);
    config.validate()?;

    if cli.json {
        run_json(&config)
    } else {
        run_text(&config)
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_text(config: &SearchConfig) -> Result<()> {
    println!(
        "{} Starting a search in {} for {}",
        "LOG:".yellow(),
        format!("\"{}\"", config.root_path.display()).green(),
        format!("\"{}\"", config.query).green()
    );

    let start = Instant::now();
    let handle = spawn_search(config)?;
    for message in handle.messages() {
        match message {
            SearchMessage::Match(record) => println!("{} {}", "LOG:".yellow(), record),
            SearchMessage::Skipped(advisory) => {
                let line = format!("SKIPPED {}: {}", advisory.path.display(), advisory.error);
                eprintln!("{}", line.red());
            }
        }
    }
    let summary = handle.join()?;

    print_summary(&summary, &config.query);
    println!(
        "{} Execution ended in {}",
        "LOG:".yellow(),
        humantime::format_duration(start.elapsed())
    );
    Ok(())
}

fn run_json(config: &SearchConfig) -> Result<()> {
    let handle = spawn_search(config)?;
    for message in handle.messages() {
        match message {
            SearchMessage::Match(record) => println!("{}", serde_json::to_string(&record)?),
            SearchMessage::Skipped(advisory) => {
                eprintln!("{}", serde_json::to_string(&advisory)?)
            }
        }
    }
    let summary = handle.join()?;
    println!("{}", serde_json::json!({ "summary": summary }));
    Ok(())
}

fn print_summary(summary: &SearchSummary, query: &str) {
    println!(
        "{} All batches completed. {} files contain {}",
        "LOG:".yellow(),
        summary.files_with_matches.to_string().green(),
        query
    );
}
