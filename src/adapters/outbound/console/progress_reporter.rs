use crate::install_guard::domain::ScanProgress;
use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Background thread mirroring `ScanProgress` counters into a spinner.
struct Tracker {
    bar: ProgressBar,
    done: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// This adapter implements the ProgressReporter port, writing progress
/// information to stderr so it doesn't interfere with the package manager's
/// stdout. Scan counters are rendered with an indicatif spinner that a
/// polling thread refreshes from the shared atomics, so fetch and analysis
/// tasks never touch the terminal themselves.
pub struct StderrProgressReporter {
    tracker: RefCell<Option<Tracker>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            tracker: RefCell::new(None),
        }
    }

    fn spinner(label: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("   {spinner:.green} {prefix} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_prefix(label.to_string());
        bar
    }

    fn render(progress: &ScanProgress) -> String {
        format!(
            "fetched {} | analyzed {}/{}",
            progress.fetched(),
            progress.analyzed(),
            progress.enqueued()
        )
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StderrProgressReporter {
    fn drop(&mut self) {
        self.stop_tracking();
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        match self.tracker.borrow().as_ref() {
            // A hidden bar (stderr not a terminal) swallows println.
            Some(tracker) if !tracker.bar.is_hidden() => tracker.bar.println(message),
            _ => eprintln!("{}", message),
        }
    }

    fn report_error(&self, message: &str) {
        self.stop_tracking();
        eprintln!("{}", message);
    }

    fn report_completion(&self, message: &str) {
        self.stop_tracking();
        eprintln!();
        eprintln!("{}", message);
    }

    fn start_tracking(&self, progress: &ScanProgress, label: &str) {
        self.stop_tracking();

        let bar = Self::spinner(label);
        let done = Arc::new(AtomicBool::new(false));

        let handle = {
            let bar = bar.clone();
            let done = Arc::clone(&done);
            let progress = progress.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    bar.set_message(Self::render(&progress));
                    bar.tick();
                    thread::sleep(REFRESH_INTERVAL);
                }
                bar.set_message(Self::render(&progress));
            })
        };

        *self.tracker.borrow_mut() = Some(Tracker { bar, done, handle });
    }

    fn stop_tracking(&self) {
        let Some(tracker) = self.tracker.borrow_mut().take() else {
            return;
        };
        tracker.done.store(true, Ordering::Relaxed);
        let _ = tracker.handle.join();
        tracker.bar.finish_and_clear();
    }
}
