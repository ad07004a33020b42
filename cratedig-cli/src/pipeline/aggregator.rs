//! Run-wide collection point for resolved download jobs.

use parking_lot::Mutex;

use super::job::DownloadJob;

/// Collects every directory's resolved entries into one queue.
///
/// One aggregator exists per run, owned by the orchestrator. Resolution
/// tasks append batches through a shared reference; each batch keeps its
/// internal order, while batches land in completion order. The queue must
/// only be taken after every appender has finished, which the
/// orchestrator's phase barrier guarantees.
#[derive(Debug, Default)]
pub struct WorkAggregator {
    queue: Mutex<Vec<DownloadJob>>,
}

impl WorkAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one directory's batch.
    pub fn append(&self, jobs: Vec<DownloadJob>) {
        if jobs.is_empty() {
            return;
        }
        self.queue.lock().extend(jobs);
    }

    /// Take the accumulated queue, leaving the aggregator empty.
    pub fn drain(&self) -> Vec<DownloadJob> {
        std::mem::take(&mut *self.queue.lock())
    }
}
