//! Scratch directory holding the mirror clone.

use crate::error::{MigrationError, Result};

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Name prefix of every workspace directory.
pub const WORKSPACE_PREFIX: &str = "temp_migration_";

/// Temporary directory owned by exactly one migration.
///
/// Named `temp_migration_<unix seconds>_<random>` so runs started within the
/// same second never share a directory. The directory is removed by
/// [`Workspace::cleanup`], or by `Drop` if the migration never gets there.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace under `root`.
    pub fn create(root: &Path) -> Result<Self> {
        let prefix = format!("{WORKSPACE_PREFIX}{}_", chrono::Utc::now().timestamp());
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(root)
            .map_err(|e| {
                MigrationError::Workspace(format!(
                    "cannot create workspace in {}: {e}",
                    root.display()
                ))
            })?;

        debug!(path = %dir.path().display(), "Workspace created");
        Ok(Self { dir })
    }

    /// Path of the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the workspace recursively.
    ///
    /// Removal problems never fail a migration; they come back as a warning
    /// message instead.
    pub fn cleanup(self) -> Option<String> {
        let path: PathBuf = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => {
                debug!(path = %path.display(), "Workspace removed");
                None
            }
            Err(e) => {
                let message = format!("failed to remove workspace {}: {e}", path.display());
                warn!("{message}");
                Some(message)
            }
        }
    }
}
