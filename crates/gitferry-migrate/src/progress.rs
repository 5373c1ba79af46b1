//! Progress reporting for migration operations.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Progress update information.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Current phase of migration.
    pub phase: MigrationPhase,

    /// Optional message.
    pub message: Option<String>,
}

/// Phases of the migration process, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MigrationPhase {
    /// Building the configuration.
    Configuring = 0,
    /// Checking both platforms are usable.
    Validating = 1,
    /// Mirror-cloning the source repository.
    Cloning = 2,
    /// Creating the repository on the target platform.
    CreatingRepository = 3,
    /// Mirror-pushing to the target.
    Pushing = 4,
    /// Removing the workspace.
    CleaningUp = 5,
    /// Migration finished successfully.
    Complete = 6,
    /// Migration failed.
    Failed = 7,
}

impl MigrationPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Configuring,
            1 => Self::Validating,
            2 => Self::Cloning,
            3 => Self::CreatingRepository,
            4 => Self::Pushing,
            5 => Self::CleaningUp,
            6 => Self::Complete,
            _ => Self::Failed,
        }
    }
}

impl std::fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuring => write!(f, "Configuring"),
            Self::Validating => write!(f, "Validating platforms"),
            Self::Cloning => write!(f, "Cloning source repository"),
            Self::CreatingRepository => write!(f, "Creating target repository"),
            Self::Pushing => write!(f, "Pushing to target"),
            Self::CleaningUp => write!(f, "Cleaning up"),
            Self::Complete => write!(f, "Complete"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Progress tracker for migration operations.
pub struct MigrationProgress {
    phase: AtomicU8,
    callback: Option<Arc<ProgressCallback>>,
}

impl MigrationProgress {
    /// Create a new progress tracker.
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(MigrationPhase::Configuring as u8),
            callback: None,
        }
    }

    /// Create a progress tracker with a callback.
    pub fn with_callback(callback: ProgressCallback) -> Self {
        Self {
            phase: AtomicU8::new(MigrationPhase::Configuring as u8),
            callback: Some(Arc::new(callback)),
        }
    }

    /// Set the current phase.
    pub fn set_phase(&self, phase: MigrationPhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
        self.notify(None);
    }

    /// Switch to [`MigrationPhase::Failed`] and report why.
    pub fn fail(&self, reason: &str) {
        self.phase
            .store(MigrationPhase::Failed as u8, Ordering::SeqCst);
        self.notify(Some(reason.to_string()));
    }

    /// Report a message within the current phase.
    pub fn message(&self, msg: &str) {
        self.notify(Some(msg.to_string()));
    }

    /// Get current phase.
    pub fn current_phase(&self) -> MigrationPhase {
        MigrationPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    fn notify(&self, message: Option<String>) {
        if let Some(callback) = &self.callback {
            callback(ProgressUpdate {
                phase: self.current_phase(),
                message,
            });
        }
    }
}

impl Default for MigrationProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Console progress reporter using indicatif.
///
/// Shows a spinner for the running phase and leaves one status line per
/// phase behind it.
pub struct ConsoleProgressReporter {
    spinner: indicatif::ProgressBar,
}

impl ConsoleProgressReporter {
    /// Create a new console progress reporter.
    pub fn new() -> Self {
        let spinner = indicatif::ProgressBar::new_spinner();
        spinner.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));

        Self { spinner }
    }

    /// Create a progress callback for use with migration.
    pub fn callback(&self) -> ProgressCallback {
        let spinner = self.spinner.clone();
        Box::new(move |update: ProgressUpdate| {
            let line = match &update.message {
                Some(message) => format!("{} - {message}", update.phase),
                None => format!("{}...", update.phase),
            };

            // A hidden bar (no terminal) drops println output.
            let print = |text: String| {
                if spinner.is_hidden() {
                    eprintln!("{text}");
                } else {
                    spinner.println(text);
                }
            };

            match update.phase {
                MigrationPhase::Complete => {
                    print(format!("{} {line}", console::style("✓").green()));
                }
                MigrationPhase::Failed => {
                    print(format!("{} {line}", console::style("✗").red()));
                }
                _ => {
                    print(format!("{} {line}", console::style("→").cyan()));
                    spinner.set_message(update.phase.to_string());
                }
            }
        })
    }

    /// Finish the spinner.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ConsoleProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_tracker() {
        let progress = MigrationProgress::new();
        assert_eq!(progress.current_phase(), MigrationPhase::Configuring);

        progress.set_phase(MigrationPhase::Pushing);
        assert_eq!(progress.current_phase(), MigrationPhase::Pushing);

        progress.fail("Git push failed: remote rejected");
        assert_eq!(progress.current_phase(), MigrationPhase::Failed);
    }

    #[test]
    fn test_progress_with_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let progress = MigrationProgress::with_callback(Box::new(move |update| {
            seen_clone.lock().unwrap().push((update.phase, update.message));
        }));

        progress.set_phase(MigrationPhase::Cloning);
        progress.message("https://github.com/org/r.git");
        progress.set_phase(MigrationPhase::Complete);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (MigrationPhase::Cloning, None),
                (
                    MigrationPhase::Cloning,
                    Some("https://github.com/org/r.git".to_string())
                ),
                (MigrationPhase::Complete, None),
            ]
        );
    }
}
