use tracing::{error, info, warn};

use crate::arxiv::ArxivClient;
use crate::config::ResolvedConfig;
use crate::error::IngestError;
use crate::fetcher::{
    CycleOptions, CycleSummary, DEFAULT_RESULTS_PER_ITERATION, DEFAULT_SEARCH_QUERY,
    DEFAULT_WAIT_SECS, fetch_cycle,
};
use crate::pacing::{Sleeper, politeness_delay};
use crate::store::PaperStore;

/// Per-run knobs. Unset `start_index` follows the store size at the start of
/// each cycle; unset `max_index` falls back to the configured paper cap.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    pub search_query: String,
    pub start_index: Option<usize>,
    pub max_index: Option<usize>,
    pub results_per_iteration: usize,
    pub wait_time_secs: f64,
    pub break_on_no_added: bool,
    pub enforce_stop_signals: bool,
    pub max_cycles: Option<u64>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            search_query: DEFAULT_SEARCH_QUERY.to_string(),
            start_index: None,
            max_index: None,
            results_per_iteration: DEFAULT_RESULTS_PER_ITERATION,
            wait_time_secs: DEFAULT_WAIT_SECS,
            break_on_no_added: true,
            enforce_stop_signals: true,
            max_cycles: None,
        }
    }
}

impl IngestOptions {
    pub fn cycle_options(&self, store_len: usize, paper_cap: usize) -> CycleOptions {
        CycleOptions {
            search_query: self.search_query.clone(),
            start_index: self.start_index.unwrap_or(store_len),
            max_index: self.max_index.unwrap_or(paper_cap),
            results_per_iteration: self.results_per_iteration,
            wait_time_secs: self.wait_time_secs,
            break_on_no_added: self.break_on_no_added,
            enforce_stop_signals: self.enforce_stop_signals,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    CapReached,
    CycleLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub final_size: usize,
    pub termination: Termination,
    pub last_cycle: CycleSummary,
}

pub struct App<C: ArxivClient, S: Sleeper> {
    config: ResolvedConfig,
    client: C,
    sleeper: S,
}

impl<C: ArxivClient, S: Sleeper> App<C, S> {
    pub fn new(config: ResolvedConfig, client: C, sleeper: S) -> Self {
        Self {
            config,
            client,
            sleeper,
        }
    }

    /// Production mode treats an unreadable store as fatal; otherwise a fresh
    /// empty store is started.
    pub fn load_store(&self) -> Result<PaperStore, IngestError> {
        match PaperStore::load(&self.config.db_path) {
            Ok(store) => Ok(store),
            Err(err) if self.config.production_mode => {
                error!(%err, "error loading existing database, exiting");
                Err(err)
            }
            Err(err) => {
                warn!(%err, "error loading existing database");
                info!("Start new database: {}", self.config.db_path);
                Ok(PaperStore::new())
            }
        }
    }

    /// Runs fetch cycles until the paper cap is reached (production mode) or
    /// `max_cycles` cycles have completed. Without either bound this never
    /// returns on success.
    pub fn run(&self, options: &IngestOptions) -> Result<RunSummary, IngestError> {
        options
            .cycle_options(0, self.config.paper_cap)
            .validate()?;
        let mut cycles = 0u64;
        loop {
            let mut store = self.load_store()?;
            info!("Existing files count: {}", store.len());

            let cycle = options.cycle_options(store.len(), self.config.paper_cap);
            info!("Searching arXiv for {}", cycle.search_query);
            let summary = fetch_cycle(&self.client, &self.sleeper, &mut store, &cycle)?;
            cycles += 1;

            if summary.added > 0 {
                info!(
                    "Saving database with {} papers to {}",
                    store.len(),
                    self.config.db_path
                );
                store.save(&self.config.db_path)?;
            }

            let delay = politeness_delay(self.config.cycle_wait_secs);
            info!("Sleeping for {} seconds", delay.as_secs());
            self.sleeper.sleep(delay);

            let cap_reached = store.len() >= self.config.paper_cap;
            let termination = if self.config.production_mode && cap_reached {
                info!("I have now {} paper info, stopping.", store.len());
                Some(Termination::CapReached)
            } else if options.max_cycles.is_some_and(|max| cycles >= max) {
                info!(cycles, "cycle limit reached");
                Some(Termination::CycleLimit)
            } else {
                None
            };

            if let Some(termination) = termination {
                return Ok(RunSummary {
                    cycles,
                    final_size: store.len(),
                    termination,
                    last_cycle: summary,
                });
            }
        }
    }
}
