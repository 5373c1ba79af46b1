//! REST client for the platforms' repository APIs.

use crate::error::{MigrationError, Result};
use crate::platform::PlatformConfig;
use crate::secret::SecretString;
use crate::VERSION;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Decoded JSON body of a successful create-repository call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoDescriptor(pub serde_json::Value);

impl RepoDescriptor {
    fn str_field(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.0.get(*k).and_then(|v| v.as_str()))
    }

    /// HTTPS clone URL (`clone_url` on GitHub/Gitea, `http_url_to_repo` on GitLab).
    pub fn clone_url(&self) -> Option<&str> {
        self.str_field(&["clone_url", "http_url_to_repo"])
    }

    /// Browser URL (`html_url` on GitHub/Gitea, `web_url` on GitLab).
    pub fn web_url(&self) -> Option<&str> {
        self.str_field(&["html_url", "web_url"])
    }
}

/// HTTP client for the hosting platforms.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: Client,
}

impl PlatformClient {
    /// Create a new client. `timeout` of `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(format!("gitferry/{VERSION}"));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Create a repository owned by the token's user.
    ///
    /// Only 200 and 201 count as success; anything else is returned as
    /// [`MigrationError::RepoCreation`] with the response body. No retry.
    pub async fn create_repository(
        &self,
        platform: &PlatformConfig,
        token: &SecretString,
        name: &str,
        description: &str,
    ) -> Result<RepoDescriptor> {
        let kind = platform.kind();
        let headers = kind.auth_headers(token)?;
        let request = kind.create_repo_request(name, description);
        let url = platform.endpoint(request.path);

        debug!(platform = %kind, url = %url, repo = %name, "Creating repository");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "Create repository response");

        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(MigrationError::RepoCreation {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(RepoDescriptor(serde_json::Value::Null));
        }
        Ok(RepoDescriptor(serde_json::from_str(&body)?))
    }
}
