//! End-to-end repository migration.

use crate::client::{PlatformClient, RepoDescriptor};
use crate::config::MigrationConfig;
use crate::error::Result;
use crate::git::{GitRunner, SystemGit};
use crate::progress::{MigrationPhase, MigrationProgress};
use crate::types::{repo_name_from_url, MigrationResult, MigrationState};
use crate::workspace::Workspace;

use tracing::{debug, error, info};

/// Migrates one repository from the source platform to the target platform.
///
/// The order is fixed: validate, create workspace, mirror clone, create the
/// target repository, mirror push, remove workspace. The target repository
/// is only created once the clone succeeded.
pub struct Migrator<G = SystemGit> {
    config: MigrationConfig,
    client: PlatformClient,
    git: G,
    progress: MigrationProgress,
}

impl Migrator<SystemGit> {
    /// Create a migrator that runs the system `git`.
    pub fn new(config: MigrationConfig) -> Result<Self> {
        Self::with_git(config, SystemGit::new())
    }
}

impl<G: GitRunner> Migrator<G> {
    /// Create a migrator with a custom git runner.
    pub fn with_git(config: MigrationConfig, git: G) -> Result<Self> {
        let client = PlatformClient::new(config.http_timeout)?;
        Ok(Self {
            config,
            client,
            git,
            progress: MigrationProgress::new(),
        })
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, progress: MigrationProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Create `repo_name` on the target platform for the target token's user.
    pub async fn create_target_repository(
        &self,
        repo_name: &str,
        description: &str,
    ) -> Result<RepoDescriptor> {
        self.client
            .create_repository(
                &self.config.target,
                &self.config.credentials.target_token,
                repo_name,
                description,
            )
            .await
    }

    /// Run the migration.
    ///
    /// Never returns early with an error: the outcome, including the failing
    /// step's message, is in the returned [`MigrationResult`]. The workspace
    /// is removed on every path once it exists.
    pub async fn migrate(&self, source_url: &str, target_namespace: &str) -> MigrationResult {
        let mut result = MigrationResult::new();

        info!(
            source = %self.config.source.kind(),
            target = %self.config.target.kind(),
            url = %source_url,
            namespace = %target_namespace,
            "Starting migration"
        );

        self.progress.set_phase(MigrationPhase::Validating);
        let repo_name = match self
            .config
            .validate_platforms()
            .and_then(|()| repo_name_from_url(source_url))
        {
            Ok(name) => name,
            Err(e) => return self.finish(result, Err(e)),
        };
        result.repo_name = Some(repo_name.clone());
        result.target_url = Some(self.config.target.push_url(target_namespace, &repo_name));

        let workspace = match Workspace::create(&self.config.work_root) {
            Ok(workspace) => workspace,
            Err(e) => return self.finish(result, Err(e)),
        };
        result.advance(MigrationState::WorkspaceCreated);

        let outcome = self
            .transfer(&workspace, source_url, target_namespace, &repo_name, &mut result)
            .await;

        self.progress.set_phase(MigrationPhase::CleaningUp);
        if let Some(warning) = workspace.cleanup() {
            result.add_warning(warning);
        }

        self.finish(result, outcome)
    }

    async fn transfer(
        &self,
        workspace: &Workspace,
        source_url: &str,
        target_namespace: &str,
        repo_name: &str,
        result: &mut MigrationResult,
    ) -> Result<()> {
        self.progress.set_phase(MigrationPhase::Cloning);
        self.progress.message(source_url);
        let source_credential = self.config.source_credential();
        self.git
            .clone_mirror(source_url, workspace.path(), source_credential.as_ref())
            .await?;
        result.advance(MigrationState::Cloned);
        info!(url = %source_url, "Source repository cloned");

        self.progress.set_phase(MigrationPhase::CreatingRepository);
        let repo = self
            .create_target_repository(repo_name, &self.config.description)
            .await?;
        result.advance(MigrationState::TargetCreated);
        info!(
            platform = %self.config.target.kind(),
            repo = %repo_name,
            url = repo.web_url().unwrap_or_default(),
            clone_url = repo.clone_url().unwrap_or_default(),
            "Target repository created"
        );

        self.progress.set_phase(MigrationPhase::Pushing);
        let push_url = self.config.target.push_url(target_namespace, repo_name);
        self.progress.message(&push_url);
        debug!(url = %push_url, "Pushing mirror");
        self.git
            .push_mirror(
                workspace.path(),
                &push_url,
                Some(&self.config.target_credential()),
            )
            .await?;
        result.advance(MigrationState::Pushed);
        info!(url = %push_url, "Mirror pushed");

        Ok(())
    }

    fn finish(&self, mut result: MigrationResult, outcome: Result<()>) -> MigrationResult {
        if let Err(e) = outcome {
            error!(state = ?result.last_state, error = %e, "Migration failed");
            result.fail(&e);
        }
        result.complete();

        if result.success {
            info!(repo = ?result.repo_name, "Migration completed successfully");
            self.progress.set_phase(MigrationPhase::Complete);
        } else {
            self.progress
                .fail(result.error.as_deref().unwrap_or("unknown error"));
        }
        result
    }
}
