//! Progress reporting for preprocessing runs.
//!
//! A run reports once per completed stage. Callbacks are fanned out by a
//! [`ProgressTracker`]; the library installs none by default.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use crate::stages::Stage;

/// Snapshot emitted after each stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Stage the run has just reached.
    pub stage: Stage,
    /// Completed fraction of the run in `[0, 1]`, never decreasing.
    pub fraction: f64,
    /// Time elapsed since the run started.
    pub elapsed: Duration,
}

impl ProgressInfo {
    pub fn new(stage: Stage, elapsed: Duration) -> Self {
        Self {
            stage,
            fraction: stage.fraction(),
            elapsed,
        }
    }

    pub fn progress_percent(&self) -> f64 {
        self.fraction * 100.0
    }
}

/// Progress callback trait for monitoring a run.
pub trait ProgressCallback: Send + Sync {
    /// Called after each stage completes.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called when a run starts.
    fn on_start(&self) {}

    /// Called when a run has published its outputs.
    fn on_complete(&self, _info: &ProgressInfo) {}

    /// Called when a run fails.
    fn on_error(&self, _error: &str) {}
}

/// Logs progress through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct ConsoleProgressCallback;

impl ConsoleProgressCallback {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        tracing::info!(
            "Stage {:?} ({:.0}%) | Elapsed: {:.2}s",
            info.stage,
            info.progress_percent(),
            info.elapsed.as_secs_f64()
        );
    }

    fn on_start(&self) {
        tracing::info!("Preprocessing started");
    }

    fn on_complete(&self, info: &ProgressInfo) {
        tracing::info!("Preprocessing completed in {:.2}s", info.elapsed.as_secs_f64());
    }

    fn on_error(&self, error: &str) {
        tracing::error!("Preprocessing failed: {}", error);
    }
}

/// Records every snapshot it receives.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl HistoryCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots received so far.
    pub fn get_history(&self) -> Vec<ProgressInfo> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// Error messages received so far.
    pub fn get_errors(&self) -> Vec<String> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut history) = self.history.lock() {
            history.clear();
        }
        if let Ok(mut errors) = self.errors.lock() {
            errors.clear();
        }
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Ok(mut history) = self.history.lock() {
            history.push(info.clone());
        }
    }

    fn on_error(&self, error: &str) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(error.to_string());
        }
    }
}

/// Fans progress out to any number of callbacks.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    callbacks: Vec<Arc<dyn ProgressCallback>>,
    start_time: Option<Instant>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker forwarding to a single optional callback.
    pub fn with_callback(callback: Option<Arc<dyn ProgressCallback>>) -> Self {
        let mut tracker = Self::new();
        if let Some(callback) = callback {
            tracker.add_callback(callback);
        }
        tracker
    }

    pub fn add_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.callbacks.push(callback);
    }

    fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        for callback in &self.callbacks {
            callback.on_start();
        }
    }

    /// Report that `stage` has been reached.
    pub fn update(&self, stage: Stage) {
        let info = ProgressInfo::new(stage, self.elapsed());
        for callback in &self.callbacks {
            callback.on_progress(&info);
        }
    }

    pub fn complete(&self) {
        let info = ProgressInfo::new(Stage::Done, self.elapsed());
        for callback in &self.callbacks {
            callback.on_complete(&info);
        }
    }

    pub fn error(&self, error: &str) {
        for callback in &self.callbacks {
            callback.on_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_info_fraction_follows_stage() {
        let info = ProgressInfo::new(Stage::Extracted, Duration::from_secs(1));
        assert_eq!(info.stage, Stage::Extracted);
        assert!(info.fraction > 0.0 && info.fraction < 1.0);
        assert_eq!(ProgressInfo::new(Stage::Done, Duration::ZERO).progress_percent(), 100.0);
    }

    #[test]
    fn test_history_callback() {
        let callback = HistoryCallback::new();
        callback.on_progress(&ProgressInfo::new(Stage::GeometryReconciled, Duration::ZERO));
        callback.on_progress(&ProgressInfo::new(Stage::Extracted, Duration::ZERO));
        callback.on_error("boom");

        let history = callback.get_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].stage, Stage::Extracted);
        assert_eq!(callback.get_errors(), vec!["boom".to_string()]);

        callback.clear();
        assert!(callback.get_history().is_empty());
    }

    #[test]
    fn test_tracker_fans_out() {
        let first = Arc::new(HistoryCallback::new());
        let second = Arc::new(HistoryCallback::new());
        let mut tracker = ProgressTracker::new();
        tracker.add_callback(first.clone());
        tracker.add_callback(second.clone());

        tracker.start();
        tracker.update(Stage::GeometryReconciled);
        tracker.update(Stage::Extracted);
        tracker.complete();

        assert_eq!(first.get_history().len(), 2);
        assert_eq!(second.get_history().len(), 2);
    }
}
