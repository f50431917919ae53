use tracing::{info, warn};

use crate::arxiv::{ArxivClient, PageRequest};
use crate::error::IngestError;
use crate::feed::parse_feed;
use crate::merge::{MergeTally, merge_record};
use crate::normalize::normalize_entry;
use crate::pacing::{Sleeper, politeness_delay};
use crate::store::PaperStore;

pub const DEFAULT_SEARCH_QUERY: &str =
    "cat:cs.CV+OR+cat:cs.AI+OR+cat:cs.LG+OR+cat:cs.CL+OR+cat:cs.NE+OR+cat:stat.ML";
pub const DEFAULT_RESULTS_PER_ITERATION: usize = 200;
pub const DEFAULT_WAIT_SECS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CycleOptions {
    pub search_query: String,
    pub start_index: usize,
    pub max_index: usize,
    pub results_per_iteration: usize,
    pub wait_time_secs: f64,
    pub break_on_no_added: bool,
    /// When false, stop signals are only logged and paging runs on to
    /// `max_index`.
    pub enforce_stop_signals: bool,
}

impl CycleOptions {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.results_per_iteration == 0 {
            return Err(IngestError::InvalidArgument(
                "results per iteration must be at least 1".to_string(),
            ));
        }
        if !self.wait_time_secs.is_finite() || self.wait_time_secs < 0.0 {
            return Err(IngestError::InvalidArgument(format!(
                "wait time must be a non-negative number of seconds, got {}",
                self.wait_time_secs
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EmptyPage,
    NoNewPapers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub pages: usize,
    pub added: usize,
    pub skipped: usize,
    pub stop: Option<StopReason>,
}

/// Pages through `[start_index, max_index)` and merges every entry into
/// `store`. Any entry whose URL cannot be parsed aborts the cycle; records
/// merged before the failure stay in the in-memory store.
pub fn fetch_cycle<C, S>(
    client: &C,
    sleeper: &S,
    store: &mut PaperStore,
    options: &CycleOptions,
) -> Result<CycleSummary, IngestError>
where
    C: ArxivClient + ?Sized,
    S: Sleeper + ?Sized,
{
    options.validate()?;
    let mut summary = CycleSummary::default();
    info!(entries = store.len(), "database has {} entries at start", store.len());

    let mut offset = options.start_index;
    while offset < options.max_index {
        let request = PageRequest {
            search_query: options.search_query.clone(),
            start: offset,
            max_results: options.results_per_iteration,
        };
        info!(
            "Results {} - {}",
            offset,
            offset.saturating_add(options.results_per_iteration)
        );
        let body = client.fetch_page(&request)?;
        let feed = parse_feed(&body)?;

        let mut tally = MergeTally::default();
        for entry in &feed.entries {
            let record = normalize_entry(entry)?;
            let updated = record.updated().unwrap_or_default().to_string();
            let title = record.title().unwrap_or_default().to_string();
            let outcome = merge_record(store, record);
            if outcome.is_added() {
                info!("Updated {updated} added {title}");
            }
            tally.record(outcome);
        }
        summary.pages += 1;
        summary.added += tally.added;
        summary.skipped += tally.skipped;
        info!(
            total_results = feed.total_results,
            "Added {} papers, already had {}.",
            tally.added,
            tally.skipped
        );

        let signal = if feed.entries.is_empty() {
            warn!(response = %body, "Received no results from arxiv. Rate limiting? Restart later maybe.");
            Some(StopReason::EmptyPage)
        } else if tally.added == 0 && options.break_on_no_added {
            warn!("No new papers were added. Assuming no new papers exist.");
            Some(StopReason::NoNewPapers)
        } else {
            None
        };

        let delay = politeness_delay(options.wait_time_secs);
        info!("Sleeping for {} seconds", delay.as_secs());
        sleeper.sleep(delay);

        if let Some(reason) = signal {
            if options.enforce_stop_signals {
                summary.stop = Some(reason);
                break;
            }
            info!(?reason, "stop signal observed, continuing");
        }
        offset = offset.saturating_add(options.results_per_iteration);
    }

    Ok(summary)
}
