//! Migration configuration.

use crate::error::Result;
use crate::git::GitCredential;
use crate::platform::PlatformConfig;
use crate::secret::SecretString;

use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Default timeout for platform API requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// API tokens for both sides of a migration.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Token for the source platform. May be empty for public sources.
    pub source_token: SecretString,
    /// Token for the target platform.
    pub target_token: SecretString,
}

impl Credentials {
    pub fn new(
        source_token: impl Into<SecretString>,
        target_token: impl Into<SecretString>,
    ) -> Self {
        Self {
            source_token: source_token.into(),
            target_token: target_token.into(),
        }
    }
}

/// Everything one migration needs, fixed before it starts.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Platform the repository is cloned from.
    pub source: PlatformConfig,

    /// Platform the repository is created on and pushed to.
    pub target: PlatformConfig,

    /// API tokens.
    pub credentials: Credentials,

    /// Directory the temporary workspace is created in.
    pub work_root: PathBuf,

    /// Description of the created repository.
    pub description: String,

    /// Timeout for platform API requests; `None` waits indefinitely.
    pub http_timeout: Option<Duration>,
}

impl MigrationConfig {
    /// Create a configuration from already resolved platforms.
    pub fn new(source: PlatformConfig, target: PlatformConfig, credentials: Credentials) -> Self {
        Self {
            source,
            target,
            credentials,
            work_root: PathBuf::from("."),
            description: String::new(),
            http_timeout: Some(DEFAULT_HTTP_TIMEOUT),
        }
    }

    /// Build a configuration from platform names.
    ///
    /// Names are case-insensitive. `gitea_url` supplies the base URL for
    /// whichever side is Gitea and is ignored otherwise.
    pub fn configure(
        source_token: impl Into<SecretString>,
        target_token: impl Into<SecretString>,
        source_platform: &str,
        target_platform: &str,
        gitea_url: Option<&str>,
    ) -> Result<Self> {
        let source = PlatformConfig::resolve(source_platform, gitea_url)?;
        let target = PlatformConfig::resolve(target_platform, gitea_url)?;
        debug!(source = %source.kind(), target = %target.kind(), "Platforms resolved");

        let config = Self::new(source, target, Credentials::new(source_token, target_token));
        config.validate_platforms()?;
        Ok(config)
    }

    /// Set the directory the workspace is created in.
    pub fn with_work_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.work_root = root.into();
        self
    }

    /// Set the description of the created repository.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the API request timeout.
    pub fn with_http_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Fail if either platform is unusable.
    pub fn validate_platforms(&self) -> Result<()> {
        self.source.validate()?;
        self.target.validate()
    }

    /// Credential offered to `git clone`, if a source token was given.
    pub fn source_credential(&self) -> Option<GitCredential> {
        let token = &self.credentials.source_token;
        (!token.is_empty()).then(|| GitCredential::oauth2(token.clone()))
    }

    /// Credential offered to `git push`.
    pub fn target_credential(&self) -> GitCredential {
        GitCredential::oauth2(self.credentials.target_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrationError;
    use crate::platform::{PlatformConfig, PlatformKind};

    const GITEA: &str = "https://git.example.com";

    #[test]
    fn test_validation_for_every_platform_pair() {
        for source in PlatformKind::ALL {
            for target in PlatformKind::ALL {
                let involves_gitea =
                    source == PlatformKind::Gitea || target == PlatformKind::Gitea;

                let with_url = MigrationConfig::configure(
                    "s",
                    "t",
                    source.as_str(),
                    target.as_str(),
                    Some(GITEA),
                );
                assert!(with_url.is_ok(), "{source} -> {target} with gitea url");

                let without_url =
                    MigrationConfig::configure("s", "t", source.as_str(), target.as_str(), None);
                assert_eq!(
                    without_url.is_ok(),
                    !involves_gitea,
                    "{source} -> {target} without gitea url"
                );
            }
        }
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let err = MigrationConfig::configure("s", "t", "github", "sourcehut", None).unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedPlatform { .. }));

        let err = MigrationConfig::configure("s", "t", "svn", "github", None).unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_configure_normalizes_names_and_applies_gitea_url() {
        let config = MigrationConfig::configure(
            "s",
            "t",
            "GitHub",
            "GITEA",
            Some("https://git.example.com/"),
        )
        .unwrap();
        assert_eq!(config.source, PlatformConfig::github());
        assert_eq!(config.target.kind(), PlatformKind::Gitea);
        assert_eq!(config.target.api_base(), "https://git.example.com/api/v1");
        assert_eq!(config.target.clone_base(), "https://git.example.com");
    }

    #[test]
    fn test_validate_rejects_gitea_without_urls() {
        let config = MigrationConfig::new(
            PlatformConfig::github(),
            PlatformConfig::new(PlatformKind::Gitea, "", ""),
            Credentials::new("s", "t"),
        );
        assert!(config.validate_platforms().is_err());
    }

    #[test]
    fn test_builder_defaults_and_overrides() {
        let config = MigrationConfig::new(
            PlatformConfig::github(),
            PlatformConfig::gitlab(),
            Credentials::new("", "t"),
        );
        assert_eq!(config.work_root, PathBuf::from("."));
        assert_eq!(config.http_timeout, Some(DEFAULT_HTTP_TIMEOUT));
        assert!(config.description.is_empty());
        assert!(config.source_credential().is_none());
        assert_eq!(config.target_credential().token.expose(), "t");

        let config = config
            .with_work_root("/tmp/migrations")
            .with_description("mirrored")
            .with_http_timeout(None);
        assert_eq!(config.work_root, PathBuf::from("/tmp/migrations"));
        assert_eq!(config.description, "mirrored");
        assert_eq!(config.http_timeout, None);
    }

    #[test]
    fn test_debug_output_hides_tokens() {
        let config =
            MigrationConfig::configure("src_secret", "dst_secret", "github", "gitlab", None)
                .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("src_secret"));
        assert!(!debug.contains("dst_secret"));
    }
}
