//! Common types for migration operations.

use crate::error::{MigrationError, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// States of a single migration run.
///
/// A run moves forward through `Init`, `WorkspaceCreated`, `Cloned`,
/// `TargetCreated` and `Pushed`; any of them can fall to `Failed`. The
/// workspace is cleaned up after either terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Init,
    WorkspaceCreated,
    Cloned,
    TargetCreated,
    Pushed,
    Failed,
}

/// Outcome of a migration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    /// Whether every step succeeded.
    pub success: bool,

    /// Error text of the failing step.
    pub error: Option<String>,

    /// Non-fatal problems, such as a workspace that could not be removed.
    pub warnings: Vec<String>,

    /// State the run ended in: `Pushed` on success, otherwise `Failed`.
    pub last_state: MigrationState,

    /// State the run was in when it failed.
    pub failed_from: Option<MigrationState>,

    /// Repository name derived from the source URL.
    pub repo_name: Option<String>,

    /// Credential-free URL of the target repository.
    pub target_url: Option<String>,

    /// Start time of migration.
    pub started_at: DateTime<Utc>,

    /// End time of migration.
    pub completed_at: Option<DateTime<Utc>>,
}

impl MigrationResult {
    /// Create a result for a run that is just starting.
    pub fn new() -> Self {
        Self {
            success: false,
            error: None,
            warnings: Vec::new(),
            last_state: MigrationState::Init,
            failed_from: None,
            repo_name: None,
            target_url: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record that the run reached `state`.
    pub fn advance(&mut self, state: MigrationState) {
        self.last_state = state;
    }

    /// Mark the run as failed with `error`.
    pub fn fail(&mut self, error: &MigrationError) {
        self.success = false;
        self.error = Some(error.to_string());
        self.failed_from = Some(self.last_state);
        self.last_state = MigrationState::Failed;
    }

    /// Add a warning to the result.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Stamp the completion time. Success requires the push to have happened
    /// and no error recorded.
    pub fn complete(&mut self) {
        self.success = self.error.is_none() && self.last_state == MigrationState::Pushed;
        self.completed_at = Some(Utc::now());
    }

    /// Get the duration of the migration.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }

    /// Print a summary of the migration.
    pub fn print_summary(&self) {
        println!("\n=== Migration Summary ===\n");
        if let Some(name) = &self.repo_name {
            println!("Repository:   {name}");
        }
        if let Some(url) = &self.target_url {
            println!("Target:       {url}");
        }
        match self.failed_from {
            Some(state) => println!("Failed after: {state:?}"),
            None => println!("Reached:      {:?}", self.last_state),
        }

        if let Some(duration) = self.duration() {
            println!("Completed in {} seconds", duration.num_seconds());
        }

        if let Some(error) = &self.error {
            println!("\nError: {error}");
        }

        if !self.warnings.is_empty() {
            println!("\nWarnings ({}):", self.warnings.len());
            for warning in &self.warnings {
                println!("  - {warning}");
            }
        }

        let status = if self.success { "SUCCESS" } else { "FAILED" };
        println!("\nOverall Status: {status}");
    }
}

impl Default for MigrationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the repository name from a clone URL.
///
/// Takes the last path segment (after `/`, or after `:` for scp-style
/// `git@host:owner/repo.git`) and strips one trailing `.git`.
pub fn repo_name_from_url(source_url: &str) -> Result<String> {
    let trimmed = source_url.trim().trim_end_matches('/');
    let segment = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or_default();
    let name = segment.strip_suffix(".git").unwrap_or(segment);

    if name.is_empty() || trimmed.len() == segment.len() {
        return Err(MigrationError::InvalidSourceUrl(source_url.to_string()));
    }
    Ok(name.to_string())
}
