//! Error types for migration operations.

use thiserror::Error;

/// Migration-specific errors.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Platform name is unknown, or the platform is missing its base URL.
    #[error("Unsupported platform '{name}': {reason}")]
    UnsupportedPlatform { name: String, reason: String },

    /// An API token was empty.
    #[error("Missing token for {0}")]
    MissingToken(String),

    /// An API token cannot be carried in an HTTP header.
    #[error("Invalid token for {0}: contains characters not allowed in a header")]
    InvalidToken(String),

    /// The repository name could not be derived from the source URL.
    #[error("Invalid source URL: {0}")]
    InvalidSourceUrl(String),

    /// The target platform rejected repository creation.
    #[error("Failed to create repository ({status}): {body}")]
    RepoCreation { status: u16, body: String },

    /// `git clone --mirror` failed.
    #[error("Git clone failed: {0}")]
    Clone(String),

    /// `git push --mirror` failed.
    #[error("Git push failed: {0}")]
    Push(String),

    /// Workspace directory could not be created.
    #[error("Workspace error: {0}")]
    Workspace(String),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrationError {
    pub(crate) fn unsupported(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_creation_message_carries_body() {
        let err = MigrationError::RepoCreation {
            status: 422,
            body: r#"{"message":"name already exists"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("name already exists"));
    }

    #[test]
    fn test_unsupported_platform_message() {
        let err = MigrationError::unsupported("bitbucket", "expected github, gitlab or gitea");
        assert_eq!(
            err.to_string(),
            "Unsupported platform 'bitbucket': expected github, gitlab or gitea"
        );
    }
}
