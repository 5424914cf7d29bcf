use crate::install_guard::domain::ScanProgress;

/// ProgressReporter port for reporting progress during a guarded install
///
/// This port abstracts user-facing progress output (e.g., to stderr) so the
/// package manager's own stdout stays untouched.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);

    /// Starts rendering the shared scan counters
    ///
    /// # Arguments
    /// * `progress` - Counters updated by fetch and analysis tasks
    /// * `label` - What is being scanned (e.g. the root package)
    fn start_tracking(&self, progress: &ScanProgress, label: &str);

    /// Stops rendering the scan counters started by `start_tracking`
    fn stop_tracking(&self);
}
