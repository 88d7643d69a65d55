//! Azure DevOps API client

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::Method;
use serde::Deserialize;

use super::http::{ApiClient, Credentials, SessionConfig};
use super::models::RemoteProject;
use super::ProjectHost;
use crate::error::{ApiError, Result};

/// Default Azure DevOps host; overridable for tests via
/// `AZURE_DEVOPS_BASE_URL`
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// Azure DevOps REST API version used for all calls
const API_VERSION: &str = "7.1";

/// Azure DevOps API client, scoped to one DevOps organization.
///
/// Authenticates with a personal access token sent as Basic auth with an
/// empty username. TLS verification is disabled to match the IQ side of
/// the deployment.
pub struct AzureDevOpsClient {
    api: ApiClient,
}

impl AzureDevOpsClient {
    pub fn new(base_url: &str, organization: &str, token: &str) -> Result<Self> {
        let mut session = SessionConfig {
            auth: Some(Credentials::new("", token)),
            verify_tls: false,
            ..SessionConfig::default()
        };
        session
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let url = format!("{}/{organization}", base_url.trim_end_matches('/'));
        Ok(Self {
            api: ApiClient::new(&url, session)?,
        })
    }
}

#[async_trait]
impl ProjectHost for AzureDevOpsClient {
    async fn get_projects(&self) -> Result<Vec<RemoteProject>> {
        #[derive(Deserialize)]
        struct ProjectsResponse {
            #[serde(default)]
            value: Vec<RemoteProject>,
        }

        let endpoint = format!("/_apis/projects?api-version={API_VERSION}");
        let response = self.api.request(Method::GET, &endpoint, None).await?;
        let parsed: ProjectsResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse projects: {e}")))?;
        Ok(parsed.value)
    }

    async fn get_repo_url(&self, project_id: &str) -> Result<Option<String>> {
        #[derive(Deserialize)]
        struct Repository {
            #[serde(rename = "remoteUrl")]
            remote_url: Option<String>,
        }

        #[derive(Deserialize)]
        struct ReposResponse {
            #[serde(default)]
            value: Vec<Repository>,
        }

        let endpoint = format!("/{project_id}/_apis/git/repositories?api-version={API_VERSION}");
        let response = self.api.request(Method::GET, &endpoint, None).await?;
        let parsed: ReposResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse repositories: {e}")))?;

        // First repository wins; projects created through the portal have
        // exactly one.
        Ok(parsed.value.into_iter().next().and_then(|r| r.remote_url))
    }
}
