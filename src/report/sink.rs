use std::path::Path;
use tracing::{info, warn};

/// Where benchmarks report completion and non-fatal cleanup problems.
pub trait EventSink: Send + Sync {
    fn benchmark_completed(&self, name: &str, elapsed_secs: f64);

    fn cleanup_failed(&self, path: &Path, error: &std::io::Error);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn benchmark_completed(&self, name: &str, elapsed_secs: f64) {
        info!("{} Benchmark completed in {:.2} seconds", name, elapsed_secs);
    }

    fn cleanup_failed(&self, path: &Path, error: &std::io::Error) {
        warn!("Failed to remove scratch file {}: {}", path.display(), error);
    }
}

/// Keeps every event in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn benchmark_completed(&self, name: &str, elapsed_secs: f64) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{} Benchmark completed in {:.2} seconds", name, elapsed_secs));
    }

    fn cleanup_failed(&self, path: &Path, error: &std::io::Error) {
        self.events
            .lock()
            .unwrap()
            .push(format!("cleanup failed for {}: {}", path.display(), error));
    }
}
