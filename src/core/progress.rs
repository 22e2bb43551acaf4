/// Emits a progress event every `interval` processed rows.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    interval: usize,
    total: usize,
    processed: usize,
}

impl ProgressReporter {
    pub fn new(interval: usize, total: usize) -> Self {
        Self {
            interval: interval.max(1),
            total,
            processed: 0,
        }
    }

    /// Counts one processed row. Returns true when an event was emitted.
    pub fn tick(&mut self) -> bool {
        self.processed += 1;
        if self.processed % self.interval != 0 {
            return false;
        }

        let percent = if self.total > 0 {
            self.processed as f64 / self.total as f64 * 100.0
        } else {
            100.0
        };
        tracing::info!(
            processed = self.processed,
            total = self.total,
            "⏳ processing {}/{} rows ({:.0}%)",
            self.processed,
            self.total,
            percent
        );
        true
    }
}
