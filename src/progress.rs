use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Spinner-style progress for batch ACL runs. The total is unknown up front
/// because keys stream in lazily, so the display counts completions.
pub struct AclProgressTracker {
    pub progress_bar: ProgressBar,
}

impl AclProgressTracker {
    pub fn new(operation: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(&format!("{}: {{spinner:.green}} {{msg}}", operation))
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("0 objects");
        Self { progress_bar: pb }
    }

    pub fn update(&self, objects_completed: u64) {
        self.progress_bar
            .set_message(format!("{} objects", objects_completed));
    }

    /// Finish with a completion message.
    pub fn finish(&self, objects_completed: u64, duration: Duration) {
        self.progress_bar.finish_with_message(format!(
            "{} objects in {:.2}s",
            objects_completed,
            duration.as_secs_f64()
        ));
    }
}

/// Completion callback the engine invokes once per finished object, whether
/// the update succeeded or failed.
pub struct ProgressCallback {
    pub tracker: Arc<AclProgressTracker>,
    pub objects_completed: AtomicU64,
}

impl ProgressCallback {
    pub fn new(tracker: Arc<AclProgressTracker>) -> Self {
        Self {
            tracker,
            objects_completed: AtomicU64::new(0),
        }
    }

    /// Call this when one object's ACL update completes.
    pub fn object_completed(&self) {
        let completed = self.objects_completed.fetch_add(1, Ordering::Relaxed) + 1;
        self.tracker.update(completed);
    }
}
