//! Progress reporting for acquisition runs
//!
//! Progress is informational only; reporters never influence the run.

use crate::processor::AcquisitionSummary;

/// Trait for reporting progress while records are materialized
pub trait ProgressReporter: Send + Sync {
    /// Called after each record is fully processed
    ///
    /// # Arguments
    /// * `processed` - Number of records processed so far (1-based)
    fn report_processed(&self, processed: u64);

    /// Called once after the metadata file is written
    fn report_completion(&self, summary: &AcquisitionSummary);
}

/// No-op progress reporter that discards all progress updates
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report_processed(&self, _processed: u64) {
        // Intentionally empty
    }

    fn report_completion(&self, _summary: &AcquisitionSummary) {
        // Intentionally empty
    }
}

/// Logs `Processed N examples...` every `interval` records
pub struct LogProgressReporter {
    interval: u64,
}

impl LogProgressReporter {
    /// Create a reporter; an interval of zero is treated as one
    #[must_use]
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    /// Whether `processed` falls on a reporting boundary
    #[must_use]
    pub fn should_report(&self, processed: u64) -> bool {
        processed > 0 && processed % self.interval == 0
    }
}

impl ProgressReporter for LogProgressReporter {
    fn report_processed(&self, processed: u64) {
        if self.should_report(processed) {
            tracing::info!(processed, "Processed {} examples...", processed);
        }
    }

    fn report_completion(&self, summary: &AcquisitionSummary) {
        tracing::info!(
            records = summary.records,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Total images saved: {}, metadata saved to: {}",
            summary.records,
            summary.metadata_path.display()
        );
    }
}

/// Indicatif spinner showing a running record count
#[cfg(feature = "cli")]
pub struct SpinnerProgressReporter {
    bar: indicatif::ProgressBar,
}

#[cfg(feature = "cli")]
impl SpinnerProgressReporter {
    #[must_use]
    pub fn new() -> Self {
        use indicatif::{ProgressBar, ProgressStyle};

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} records ({per_sec}) {msg}")
        {
            bar.set_style(style);
        }
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self { bar }
    }
}

#[cfg(feature = "cli")]
impl Default for SpinnerProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "cli")]
impl ProgressReporter for SpinnerProgressReporter {
    fn report_processed(&self, processed: u64) {
        self.bar.set_position(processed);
    }

    fn report_completion(&self, summary: &AcquisitionSummary) {
        self.bar
            .finish_with_message(format!("✅ {} images saved", summary.records));
    }
}

/// Pick a reporter for the CLI
///
/// # Arguments
/// * `enable_spinner` - Whether the --progress flag was set
/// * `interval` - Records between log lines when no spinner is shown
#[cfg(feature = "cli")]
#[must_use]
pub fn create_cli_progress_reporter(enable_spinner: bool, interval: u64) -> Box<dyn ProgressReporter> {
    if enable_spinner {
        Box::new(SpinnerProgressReporter::new())
    } else {
        Box::new(LogProgressReporter::new(interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct RecordingReporter {
        processed: Arc<Mutex<Vec<u64>>>,
        completions: Arc<Mutex<u32>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report_processed(&self, processed: u64) {
            self.processed.lock().unwrap().push(processed);
        }

        fn report_completion(&self, _summary: &AcquisitionSummary) {
            *self.completions.lock().unwrap() += 1;
        }
    }

    fn summary() -> AcquisitionSummary {
        AcquisitionSummary {
            records: 3,
            dataset_dir: PathBuf::from("data/raw/Kvasir-VQA"),
            images_dir: PathBuf::from("data/raw/Kvasir-VQA/images"),
            metadata_path: PathBuf::from("data/raw/Kvasir-VQA/metadata.csv"),
            started_at: chrono::Utc::now(),
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_log_reporter_boundaries() {
        let reporter = LogProgressReporter::new(1000);
        assert!(!reporter.should_report(0));
        assert!(!reporter.should_report(1));
        assert!(!reporter.should_report(999));
        assert!(reporter.should_report(1000));
        assert!(!reporter.should_report(1001));
        assert!(reporter.should_report(2000));
    }

    #[test]
    fn test_log_reporter_zero_interval() {
        let reporter = LogProgressReporter::new(0);
        assert!(reporter.should_report(1));
        assert!(reporter.should_report(2));
    }

    #[test]
    fn test_no_op_reporter() {
        let reporter = NoOpProgressReporter;
        reporter.report_processed(1);
        reporter.report_completion(&summary());
    }

    #[test]
    fn test_reporter_trait_object() {
        let processed = Arc::new(Mutex::new(Vec::new()));
        let completions = Arc::new(Mutex::new(0));
        let reporter: Box<dyn ProgressReporter> = Box::new(RecordingReporter {
            processed: Arc::clone(&processed),
            completions: Arc::clone(&completions),
        });

        for i in 1..=3 {
            reporter.report_processed(i);
        }
        reporter.report_completion(&summary());

        assert_eq!(*processed.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(*completions.lock().unwrap(), 1);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_spinner_reporter() {
        let reporter = SpinnerProgressReporter::new();
        reporter.report_processed(5);
        reporter.report_completion(&summary());
    }
}
