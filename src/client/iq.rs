//! Sonatype IQ Server API client

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use super::http::{ApiClient, Credentials, SessionConfig};
use super::models::RegistryApplication;
use super::ScanRegistry;
use crate::error::{ApiError, Result};

/// IQ Server API client.
///
/// TLS verification is disabled: the deployments this tool targets sit on
/// internal networks behind self-signed certificates.
pub struct IqClient {
    api: ApiClient,
}

impl IqClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let session = SessionConfig {
            auth: Some(Credentials::new(username, password)),
            verify_tls: false,
            ..SessionConfig::default()
        };
        Ok(Self {
            api: ApiClient::new(base_url, session)?,
        })
    }
}

/// Derive the publicId the IQ Server expects from an application name
fn public_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

#[async_trait]
impl ScanRegistry for IqClient {
    async fn get_applications(&self, org_id: &str) -> Result<Vec<RegistryApplication>> {
        #[derive(Deserialize)]
        struct AppsResponse {
            #[serde(default)]
            applications: Vec<RegistryApplication>,
        }

        let endpoint = format!("/api/v2/applications/organization/{org_id}");
        let response = self.api.request(Method::GET, &endpoint, None).await?;
        let parsed: AppsResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse applications: {e}")))?;
        Ok(parsed.applications)
    }

    async fn create_application(
        &self,
        name: &str,
        repo_url: &str,
        branch: &str,
        org_id: &str,
    ) -> Result<String> {
        #[derive(Deserialize)]
        struct CreateResponse {
            id: String,
        }

        let app_data = serde_json::json!({
            "publicId": public_id(name),
            "name": name,
            "organizationId": org_id,
        });
        let response = self
            .api
            .request(Method::POST, "/api/v2/applications", Some(&app_data))
            .await?;
        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse created application: {e}")))?;

        let scm_data = serde_json::json!({
            "repositoryUrl": repo_url,
            "baseBranch": branch,
            "remediationPullRequestsEnabled": true,
            "pullRequestCommentingEnabled": true,
            "sourceControlEvaluationsEnabled": true,
        });
        let endpoint = format!("/api/v2/sourceControl/application/{}", created.id);
        if let Err(err) = self.api.request(Method::POST, &endpoint, Some(&scm_data)).await {
            // The application now exists without source control attached.
            // Nothing here removes it; surface the orphan instead.
            log::warn!(
                "Source control configuration failed for {name}; application {} left without source control",
                created.id
            );
            return Err(err.into());
        }

        Ok(created.id)
    }

    async fn trigger_scan(&self, app_id: &str, branch: &str, stage_id: &str) -> Result<()> {
        let scan_data = serde_json::json!({
            "stageId": stage_id,
            "branchName": branch,
        });
        let endpoint = format!("/api/v2/evaluation/applications/{app_id}/sourceControlEvaluation");
        let response = self.api.request(Method::POST, &endpoint, Some(&scan_data)).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                method: "POST".to_string(),
                endpoint,
                status,
                expected: StatusCode::OK,
            }
            .into());
        }
        Ok(())
    }

    async fn delete_application(&self, app_id: &str) -> Result<()> {
        let endpoint = format!("/api/v2/applications/{app_id}");
        let response = self.api.request(Method::DELETE, &endpoint, None).await?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(ApiError::UnexpectedStatus {
                method: "DELETE".to_string(),
                endpoint,
                status,
                expected: StatusCode::NO_CONTENT,
            }
            .into());
        }
        Ok(())
    }
}
