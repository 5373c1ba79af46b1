//! Supported hosting platforms and their REST API shapes.
//!
//! Every platform-specific detail (API base, header shape, create-repo
//! request, push host) lives on [`PlatformKind`] / [`PlatformConfig`], so
//! adding a platform is a change to this file only.

use crate::error::{MigrationError, Result};
use crate::secret::SecretString;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const GITHUB_API: &str = "https://api.github.com";
const GITHUB_CLONE: &str = "https://github.com";
const GITLAB_API: &str = "https://gitlab.com/api/v4";
const GITLAB_CLONE: &str = "https://gitlab.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Supported platform types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// GitHub.
    GitHub,
    /// GitLab.
    GitLab,
    /// Self-hosted Gitea.
    Gitea,
}

impl PlatformKind {
    /// All supported platforms.
    pub const ALL: [PlatformKind; 3] = [Self::GitHub, Self::GitLab, Self::Gitea];

    /// Lowercase name as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Gitea => "gitea",
        }
    }

    /// Parse a platform name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                MigrationError::unsupported(normalized, "expected one of github, gitlab, gitea")
            })
    }

    /// Build the authentication headers for this platform.
    ///
    /// GitHub gets `Authorization: token <t>` plus the v3 `Accept` header,
    /// GitLab gets `PRIVATE-TOKEN: <t>`, Gitea gets `Authorization: token <t>`.
    pub fn auth_headers(&self, token: &SecretString) -> Result<HeaderMap> {
        if token.is_empty() {
            return Err(MigrationError::MissingToken(self.to_string()));
        }

        let mut headers = HeaderMap::new();
        match self {
            Self::GitHub => {
                headers.insert(
                    AUTHORIZATION,
                    self.sensitive(&format!("token {}", token.expose()))?,
                );
                headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
            }
            Self::GitLab => {
                headers.insert(
                    HeaderName::from_static("private-token"),
                    self.sensitive(token.expose())?,
                );
            }
            Self::Gitea => {
                headers.insert(
                    AUTHORIZATION,
                    self.sensitive(&format!("token {}", token.expose()))?,
                );
            }
        }
        Ok(headers)
    }

    fn sensitive(&self, value: &str) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(value)
            .map_err(|_| MigrationError::InvalidToken(self.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Build the "create repository for the authenticated user" request.
    pub fn create_repo_request(&self, name: &str, description: &str) -> CreateRepoRequest {
        let (path, private, visibility) = match self {
            Self::GitHub | Self::Gitea => ("/user/repos", Some(false), None),
            Self::GitLab => ("/projects", None, Some("public")),
        };

        CreateRepoRequest {
            path,
            body: CreateRepoBody {
                name: name.to_string(),
                description: description.to_string(),
                private,
                visibility,
            },
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
            Self::Gitea => write!(f, "Gitea"),
        }
    }
}

impl FromStr for PlatformKind {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Endpoint and body of a create-repository call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRepoRequest {
    /// Path appended to the platform's API base.
    pub path: &'static str,
    /// JSON body.
    pub body: CreateRepoBody,
}

/// JSON body of a create-repository call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepoBody {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<&'static str>,
}

/// A platform together with the URLs it is reached at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    kind: PlatformKind,
    api_base: String,
    clone_base: String,
}

impl PlatformConfig {
    /// Create a platform configuration from explicit URLs.
    pub fn new(
        kind: PlatformKind,
        api_base: impl Into<String>,
        clone_base: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            api_base: api_base.into(),
            clone_base: clone_base.into(),
        }
    }

    /// github.com.
    pub fn github() -> Self {
        Self::new(PlatformKind::GitHub, GITHUB_API, GITHUB_CLONE)
    }

    /// gitlab.com.
    pub fn gitlab() -> Self {
        Self::new(PlatformKind::GitLab, GITLAB_API, GITLAB_CLONE)
    }

    /// A Gitea instance at `base_url` (e.g. `https://gitea.example.com`).
    pub fn gitea(base_url: &str) -> Self {
        let base = base_url.trim().trim_end_matches('/');
        Self::new(PlatformKind::Gitea, format!("{base}/api/v1"), base)
    }

    /// Resolve a platform by name.
    ///
    /// `gitea_url` is only consulted for Gitea, which cannot be resolved
    /// without it. The URL must carry a scheme.
    pub fn resolve(name: &str, gitea_url: Option<&str>) -> Result<Self> {
        match PlatformKind::parse(name)? {
            PlatformKind::GitHub => Ok(Self::github()),
            PlatformKind::GitLab => Ok(Self::gitlab()),
            PlatformKind::Gitea => match gitea_url.map(str::trim).filter(|u| !u.is_empty()) {
                Some(url) if url.contains("://") => Ok(Self::gitea(url)),
                Some(url) => Err(MigrationError::unsupported(
                    "gitea",
                    format!("Gitea base URL '{url}' has no scheme (e.g. https://{url})"),
                )),
                None => Err(MigrationError::unsupported(
                    "gitea",
                    "a Gitea base URL is required (--gitea-url)",
                )),
            },
        }
    }

    /// Replace the API base, keeping everything else.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn clone_base(&self) -> &str {
        &self.clone_base
    }

    /// Fail unless both URLs are set.
    pub fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() || self.clone_base.trim().is_empty() {
            return Err(MigrationError::unsupported(
                self.kind.as_str(),
                "platform has no API or clone base URL configured",
            ));
        }
        Ok(())
    }

    /// Full URL of the create-repository endpoint.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base.trim_end_matches('/'))
    }

    fn split_clone_base(&self) -> (&str, &str) {
        let base = self.clone_base.trim_end_matches('/');
        match base.split_once("://") {
            Some((scheme, host)) => (scheme, host),
            None => ("https", base),
        }
    }

    /// Credential-free push URL `<scheme>://<host>/<namespace>/<repo>.git`.
    pub fn push_url(&self, namespace: &str, repo: &str) -> String {
        let (scheme, host) = self.split_clone_base();
        format!("{scheme}://{host}/{namespace}/{repo}.git")
    }

    /// Push URL with the token embedded as `oauth2:<token>@`.
    ///
    /// Only for callers that cannot use git's credential channel: the
    /// result contains the token in clear text.
    pub fn authenticated_push_url(
        &self,
        namespace: &str,
        repo: &str,
        token: &SecretString,
    ) -> String {
        let (scheme, host) = self.split_clone_base();
        format!(
            "{scheme}://oauth2:{}@{host}/{namespace}/{repo}.git",
            token.expose()
        )
    }
}
