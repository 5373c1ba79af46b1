//! # gitferry migration core
//!
//! Moves a Git repository, with every branch and tag, between GitHub,
//! GitLab and self-hosted Gitea instances.
//!
//! A migration mirror-clones the source into a temporary workspace, creates
//! the target repository through the target platform's REST API, and
//! mirror-pushes into it. Every run is all-or-nothing; the workspace is
//! removed whatever the outcome.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gitferry_migrate::{MigrationConfig, Migrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MigrationConfig::configure(
//!         "github_token",
//!         "gitea_token",
//!         "github",
//!         "gitea",
//!         Some("https://git.example.com"),
//!     )?;
//!
//!     let migrator = Migrator::new(config)?;
//!     let result = migrator
//!         .migrate("https://github.com/owner/repo.git", "my-org")
//!         .await;
//!
//!     result.print_summary();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod git;
pub mod migrator;
pub mod platform;
pub mod progress;
pub mod secret;
pub mod types;
pub mod workspace;

// Re-export main types
pub use client::{PlatformClient, RepoDescriptor};
pub use config::{Credentials, MigrationConfig, DEFAULT_HTTP_TIMEOUT};
pub use error::{MigrationError, Result};
pub use git::{GitCredential, GitRunner, SystemGit};
pub use migrator::Migrator;
pub use platform::{CreateRepoBody, CreateRepoRequest, PlatformConfig, PlatformKind};
pub use progress::{
    ConsoleProgressReporter, MigrationPhase, MigrationProgress, ProgressCallback, ProgressUpdate,
};
pub use secret::SecretString;
pub use types::*;
pub use workspace::Workspace;

/// Version of the migration tools.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
