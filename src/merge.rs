use tracing::debug;

use crate::domain::Record;
use crate::store::PaperStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Replaced { previous_version: u32 },
    AlreadyPresent,
}

impl MergeOutcome {
    pub fn is_added(self) -> bool {
        !matches!(self, MergeOutcome::AlreadyPresent)
    }
}

/// Inserts unseen papers and replaces stored ones when the incoming version is
/// strictly newer. Replacement swaps the whole record; fields are never merged.
pub fn merge_record(store: &mut PaperStore, record: Record) -> MergeOutcome {
    let outcome = match store.get(&record.raw_id) {
        None => MergeOutcome::Inserted,
        Some(existing) if record.version > existing.version => MergeOutcome::Replaced {
            previous_version: existing.version,
        },
        Some(_) => MergeOutcome::AlreadyPresent,
    };
    debug!(raw_id = %record.raw_id, version = record.version, ?outcome, "merge");
    if outcome.is_added() {
        store.put(record);
    }
    outcome
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeTally {
    pub added: usize,
    pub skipped: usize,
}

impl MergeTally {
    pub fn record(&mut self, outcome: MergeOutcome) {
        if outcome.is_added() {
            self.added += 1;
        } else {
            self.skipped += 1;
        }
    }
}
