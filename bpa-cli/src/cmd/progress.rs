use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bpa_exec::executor::{Event, EventSink};

/// Single-line step progress on stderr for interactive runs.
#[derive(Default)]
pub struct ProgressEventSink {
    total_steps: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

impl ProgressEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn update_progress(&self, current: Option<(i64, &str)>) {
        let succeeded = self.succeeded.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let total = self.total_steps.load(Ordering::Relaxed);
        let done = succeeded + failed;
        let percent = if total > 0 { (done * 100) / total } else { 100 };
        let current = current
            .map(|(order, kind)| format!(" → step {order} ({kind})"))
            .unwrap_or_default();
        // Trailing spaces overwrite a longer previous line.
        eprint!(
            "\rProgress: [{done}/{total}] {percent}% (✓{succeeded} ✗{failed}){current}          "
        );
    }
}

#[async_trait]
impl EventSink for ProgressEventSink {
    async fn emit(&self, event: Event) {
        match event {
            Event::RunStarted { steps, .. } => {
                self.total_steps.store(steps, Ordering::Relaxed);
                self.update_progress(None);
            }
            Event::StepStarted { order, kind, .. } => {
                self.update_progress(Some((order, kind.as_str())));
            }
            Event::StepSucceeded { .. } => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
                self.update_progress(None);
            }
            Event::StepFailed { .. } => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.update_progress(None);
            }
            Event::RunFinished { .. } => eprintln!(),
        }
    }
}
