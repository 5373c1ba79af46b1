//! Mirror clone and push through the `git` executable.

use crate::error::{MigrationError, Result};
use crate::secret::SecretString;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

const USERNAME_VAR: &str = "GITFERRY_GIT_USERNAME";
const TOKEN_VAR: &str = "GITFERRY_GIT_TOKEN";

/// Inline credential helper answering git's `get` request from the
/// environment, so the token never shows up in argv or remote URLs.
const CREDENTIAL_HELPER: &str = "!f() { test \"$1\" = get || exit 0; \
     echo \"username=${GITFERRY_GIT_USERNAME}\"; \
     echo \"password=${GITFERRY_GIT_TOKEN}\"; }; f";

/// Username/token pair handed to git over its credential channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCredential {
    pub username: String,
    pub token: SecretString,
}

impl GitCredential {
    /// Token authentication with the `oauth2` username, accepted by
    /// GitHub, GitLab and Gitea alike.
    pub fn oauth2(token: SecretString) -> Self {
        Self {
            username: "oauth2".to_string(),
            token,
        }
    }
}

/// Runs the two git operations a migration needs.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// `git clone --mirror <source_url> .` inside `dir`.
    async fn clone_mirror(
        &self,
        source_url: &str,
        dir: &Path,
        credential: Option<&GitCredential>,
    ) -> Result<()>;

    /// `git push --mirror <remote_url>` inside `dir`.
    async fn push_mirror(
        &self,
        dir: &Path,
        remote_url: &str,
        credential: Option<&GitCredential>,
    ) -> Result<()>;
}

/// [`GitRunner`] backed by the system `git` binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemGit {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, dir: &Path, args: &[&str], credential: Option<&GitCredential>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(dir)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);

        if let Some(credential) = credential {
            // The empty helper resets any helpers inherited from user config.
            cmd.env("GIT_CONFIG_COUNT", "2")
                .env("GIT_CONFIG_KEY_0", "credential.helper")
                .env("GIT_CONFIG_VALUE_0", "")
                .env("GIT_CONFIG_KEY_1", "credential.helper")
                .env("GIT_CONFIG_VALUE_1", CREDENTIAL_HELPER)
                .env(USERNAME_VAR, &credential.username)
                .env(TOKEN_VAR, credential.token.expose());
        }

        cmd
    }

    async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        credential: Option<&GitCredential>,
    ) -> std::result::Result<Output, String> {
        debug!(dir = %dir.display(), ?args, authenticated = credential.is_some(), "Running git");

        let output = self
            .command(dir, args, credential)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {e}", self.program.display()))?;

        debug!(
            status = ?output.status.code(),
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "git finished"
        );

        if output.status.success() {
            Ok(output)
        } else {
            Err(failure_text(&output))
        }
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn clone_mirror(
        &self,
        source_url: &str,
        dir: &Path,
        credential: Option<&GitCredential>,
    ) -> Result<()> {
        self.run(dir, &["clone", "--mirror", source_url, "."], credential)
            .await
            .map(|_| ())
            .map_err(MigrationError::Clone)
    }

    async fn push_mirror(
        &self,
        dir: &Path,
        remote_url: &str,
        credential: Option<&GitCredential>,
    ) -> Result<()> {
        self.run(dir, &["push", "--mirror", remote_url], credential)
            .await
            .map(|_| ())
            .map_err(MigrationError::Push)
    }
}

/// Diagnostic text for a failed git invocation: stderr, or the exit status
/// when git printed nothing.
fn failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        stderr
    }
}
