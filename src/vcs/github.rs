//! GitHub REST client.
//!
//! Only the two calls the publish flow needs: create a repository for the
//! authenticated user, and look up that user's login.

use crate::error::{Result, SproutError};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Repository visibility on the remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_private(&self) -> bool {
        matches!(self, Visibility::Private)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// Access token read from the process environment.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone)]
pub struct GitHubToken(String);

impl GitHubToken {
    /// Wrap a token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from `env_var`.
    ///
    /// Fails with [`SproutError::MissingCredential`] when unset or blank.
    pub fn from_env(env_var: &str) -> Result<Self> {
        Self::from_value(env_var, std::env::var(env_var).ok())
    }

    /// Build from an already-read environment value.
    pub fn from_value(env_var: &str, value: Option<String>) -> Result<Self> {
        match value {
            Some(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            _ => Err(SproutError::MissingCredential {
                env_var: env_var.to_string(),
            }),
        }
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GitHubToken(***)")
    }
}

/// A repository the host reported as created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRepository {
    /// Repository name.
    pub name: String,

    /// Owner login, when the host returned one.
    pub owner: Option<String>,
}

/// Remote hosting operations used by the publish flow.
pub trait RemoteHost {
    /// Create a repository owned by the authenticated user.
    ///
    /// An existing repository yields [`SproutError::RemoteConflict`].
    fn create_repository(&self, name: &str, visibility: Visibility) -> Result<CreatedRepository>;

    /// Login of the authenticated user.
    fn current_user(&self) -> Result<String>;
}

#[derive(Serialize)]
struct CreateRepoRequest<'a> {
    name: &'a str,
    private: bool,
}

#[derive(Deserialize)]
struct RepoResponse {
    name: String,
    owner: Option<OwnerResponse>,
}

#[derive(Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// [`RemoteHost`] backed by the GitHub REST API.
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: GitHubToken,
}

impl GitHubClient {
    /// Create a client with the default 30-second timeout.
    pub fn new(api_url: &str, token: GitHubToken) -> Result<Self> {
        Self::with_timeout(api_url, token, Duration::from_secs(30))
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(api_url: &str, token: GitHubToken, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("sprout")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token.expose())
    }

    fn error_for(status: StatusCode, response: Response, name: &str) -> SproutError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SproutError::RemoteAuth {
                status: status.as_u16(),
            },
            StatusCode::UNPROCESSABLE_ENTITY => SproutError::RemoteConflict {
                name: name.to_string(),
            },
            _ => {
                let body = response.text().unwrap_or_default();
                let message = serde_json::from_str::<ErrorResponse>(&body)
                    .ok()
                    .and_then(|e| e.message)
                    .unwrap_or(body);
                SproutError::RemoteApi {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

impl RemoteHost for GitHubClient {
    fn create_repository(&self, name: &str, visibility: Visibility) -> Result<CreatedRepository> {
        tracing::info!("Creating {} repository '{}'", visibility, name);

        let response = self
            .client
            .post(self.url("/user/repos"))
            .header("Authorization", self.authorization())
            .header("Accept", "application/vnd.github+json")
            .json(&CreateRepoRequest {
                name,
                private: visibility.is_private(),
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_for(status, response, name));
        }

        let repo: RepoResponse = response.json()?;
        Ok(CreatedRepository {
            name: repo.name,
            owner: repo.owner.map(|o| o.login),
        })
    }

    fn current_user(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url("/user"))
            .header("Authorization", self.authorization())
            .header("Accept", "application/vnd.github+json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_for(status, response, ""));
        }

        let owner: OwnerResponse = response.json()?;
        Ok(owner.login)
    }
}
