use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arxiv_ingest::app::{App, IngestOptions, Termination};
use arxiv_ingest::arxiv::ArxivHttpClient;
use arxiv_ingest::config::ConfigLoader;
use arxiv_ingest::error::IngestError;
use arxiv_ingest::fetcher::{
    DEFAULT_RESULTS_PER_ITERATION, DEFAULT_SEARCH_QUERY, DEFAULT_WAIT_SECS,
};
use arxiv_ingest::pacing::ThreadSleeper;

#[derive(Parser)]
#[command(name = "arxiv-ingest")]
#[command(about = "Poll the arXiv API and merge new paper versions into a local store")]
#[command(version, author)]
struct Cli {
    /// Query used for the arXiv API, already URL-encoded.
    /// See http://arxiv.org/help/api/user-manual#detailed_examples
    #[arg(long, default_value = DEFAULT_SEARCH_QUERY)]
    search_query: String,

    /// 0 = most recent API result; defaults to the current store size
    #[arg(long)]
    start_index: Option<usize>,

    /// Upper bound on the paper index to fetch; defaults to the paper cap
    #[arg(long)]
    max_index: Option<usize>,

    /// Passed to the arXiv API as max_results
    #[arg(long, default_value_t = DEFAULT_RESULTS_PER_ITERATION)]
    results_per_iteration: usize,

    /// Base delay between pages in seconds
    #[arg(long, default_value_t = DEFAULT_WAIT_SECS)]
    wait_time: f64,

    /// Stop a cycle early when a page adds nothing? 1=yes, 0=no
    #[arg(long, default_value_t = 1)]
    break_on_no_added: u8,

    /// Log empty and zero-added pages without ending the cycle
    #[arg(long)]
    observe_stop_signals: bool,

    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    db_path: Option<String>,

    /// Start from an empty store when the existing one cannot be loaded
    #[arg(long)]
    non_production: bool,

    #[arg(long)]
    max_cycles: Option<u64>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<IngestError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &IngestError) -> u8 {
    match error {
        IngestError::StoreLoad { .. } => 2,
        IngestError::ArxivHttp(_) | IngestError::ArxivStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ConfigLoader::resolve(cli.config.as_deref())?;
    if let Some(path) = cli.db_path {
        config.db_path = Utf8PathBuf::from(path);
    }
    if cli.non_production {
        config.production_mode = false;
    }

    let options = IngestOptions {
        search_query: cli.search_query,
        start_index: cli.start_index,
        max_index: cli.max_index,
        results_per_iteration: cli.results_per_iteration,
        wait_time_secs: cli.wait_time,
        break_on_no_added: cli.break_on_no_added == 1,
        enforce_stop_signals: !cli.observe_stop_signals,
        max_cycles: cli.max_cycles,
    };

    let client = ArxivHttpClient::new(&config.base_url, &config.user_agent)?;
    let app = App::new(config, client, ThreadSleeper);
    let summary = app.run(&options)?;

    match summary.termination {
        Termination::CapReached => info!(
            papers = summary.final_size,
            cycles = summary.cycles,
            "paper cap reached"
        ),
        Termination::CycleLimit => info!(
            papers = summary.final_size,
            cycles = summary.cycles,
            "cycle limit reached"
        ),
    }
    Ok(())
}
