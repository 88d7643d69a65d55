//! GitHub API client for repository discovery

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Method;
use serde::Deserialize;

use super::http::{ApiClient, SessionConfig};
use super::models::RemoteRepo;
use super::RepoSearch;
use crate::error::{ApiError, ConfigError, Result};

/// Default GitHub API host; overridable for tests via `GITHUB_API_URL`
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// GitHub API client authenticated with a personal access token
pub struct GithubClient {
    api: ApiClient,
}

impl GithubClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        // GitHub rejects requests without a User-Agent
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("iqsync/", env!("CARGO_PKG_VERSION"))),
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ConfigError::Invalid(format!("GitHub token is not header-safe: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let session = SessionConfig {
            auth: None,
            headers,
            verify_tls: true,
        };
        Ok(Self {
            api: ApiClient::new(base_url, session)?,
        })
    }
}

#[async_trait]
impl RepoSearch for GithubClient {
    async fn current_login(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct User {
            login: String,
        }

        let response = self.api.request(Method::GET, "/user", None).await?;
        let user: User = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse user: {e}")))?;
        Ok(user.login)
    }

    async fn search_repositories(&self, term: &str, login: &str) -> Result<Vec<RemoteRepo>> {
        #[derive(Deserialize)]
        struct SearchResponse {
            #[serde(default)]
            items: Vec<RemoteRepo>,
        }

        let endpoint = format!("/search/repositories?q={term}+in:name+user:{login}");
        let response = self.api.request(Method::GET, &endpoint, None).await?;
        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse search results: {e}")))?;
        Ok(parsed.items)
    }
}
