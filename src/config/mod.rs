//! Configuration loading for iqsync
//!
//! Credentials and endpoints come from environment variables; the
//! organization list comes from a JSON file. Both are validated up front so
//! a bad environment fails before any API call is made.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Default organization file for normal runs
pub const ORG_FILE: &str = "config/org-azure.json";

/// Organization file used when `--debug` is set (a small test subset)
pub const DEBUG_ORG_FILE: &str = "config/debug-org.json";

/// An organization entry from the JSON configuration file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Organization {
    /// IQ Server organization ID
    #[serde(default)]
    pub id: String,

    /// Display name used to match Azure DevOps project descriptions
    #[serde(rename = "chineseName", default)]
    pub chinese_name: String,
}

/// Settings for `iqsync sync` (Azure DevOps to IQ Server)
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub iq_url: String,
    pub iq_username: String,
    pub iq_password: String,
    pub azure_organization: String,
    pub azure_token: String,
    /// Azure DevOps host; `AZURE_DEVOPS_BASE_URL` overrides it in tests
    pub azure_base_url: String,
    pub default_branch: String,
    pub stage_id: String,
}

/// Settings for `iqsync github` (GitHub search to IQ Server)
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub iq_url: String,
    pub iq_username: String,
    pub iq_password: String,
    pub github_token: String,
    /// GitHub API host; `GITHUB_API_URL` overrides it in tests
    pub github_api_url: String,
    pub organization_id: String,
    pub search_term: String,
    pub default_branch: String,
    pub stage_id: String,
}

/// Settings for `iqsync cleanup` (IQ Server only)
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    pub iq_url: String,
    pub iq_username: String,
    pub iq_password: String,
}

/// Look up environment values by key. Empty values count as unset,
/// matching how operators typically blank out variables in CI.
trait EnvLookup {
    fn get(&self, key: &str) -> Option<String>;
}

struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl EnvLookup for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    }
}

/// Fetch every key in `required`, failing with one error that enumerates
/// all missing keys rather than stopping at the first.
fn require_all(env: &impl EnvLookup, required: &[&str]) -> Result<Vec<String>> {
    let mut values = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for key in required {
        match env.get(key) {
            Some(v) => values.push(v),
            None => missing.push(key.to_string()),
        }
    }
    if missing.is_empty() {
        Ok(values)
    } else {
        Err(ConfigError::MissingEnv(missing).into())
    }
}

impl SyncConfig {
    /// Load sync settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&ProcessEnv)
    }

    fn from_lookup(env: &impl EnvLookup) -> Result<Self> {
        let mut values = require_all(
            env,
            &[
                "IQ_SERVER_URL",
                "IQ_USERNAME",
                "IQ_PASSWORD",
                "AZURE_DEVOPS_ORGANIZATION",
                "AZURE_DEVOPS_TOKEN",
            ],
        )?;
        let azure_token = values.pop().unwrap_or_default();
        let azure_organization = values.pop().unwrap_or_default();
        let iq_password = values.pop().unwrap_or_default();
        let iq_username = values.pop().unwrap_or_default();
        let iq_url = values.pop().unwrap_or_default();

        Ok(Self {
            iq_url,
            iq_username,
            iq_password,
            azure_organization,
            azure_token,
            azure_base_url: env
                .get("AZURE_DEVOPS_BASE_URL")
                .unwrap_or_else(|| crate::client::azure::DEFAULT_BASE_URL.to_string()),
            default_branch: env.get("DEFAULT_BRANCH").unwrap_or_else(|| "main".to_string()),
            stage_id: env.get("STAGE_ID").unwrap_or_else(|| "source".to_string()),
        })
    }
}

impl GithubConfig {
    /// Load GitHub sync settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&ProcessEnv)
    }

    fn from_lookup(env: &impl EnvLookup) -> Result<Self> {
        let mut values = require_all(
            env,
            &[
                "IQ_SERVER_URL",
                "IQ_USERNAME",
                "IQ_PASSWORD",
                "GITHUB_TOKEN",
                "ORGANIZATION_ID",
            ],
        )?;
        let organization_id = values.pop().unwrap_or_default();
        let github_token = values.pop().unwrap_or_default();
        let iq_password = values.pop().unwrap_or_default();
        let iq_username = values.pop().unwrap_or_default();
        let iq_url = values.pop().unwrap_or_default();

        Ok(Self {
            iq_url,
            iq_username,
            iq_password,
            github_token,
            github_api_url: env
                .get("GITHUB_API_URL")
                .unwrap_or_else(|| crate::client::github::DEFAULT_BASE_URL.to_string()),
            organization_id,
            search_term: env
                .get("REPOSITORY_SEARCH_TERM")
                .unwrap_or_else(|| "vintage".to_string()),
            default_branch: env.get("DEFAULT_BRANCH").unwrap_or_else(|| "main".to_string()),
            stage_id: env.get("STAGE_ID").unwrap_or_else(|| "source".to_string()),
        })
    }
}

impl CleanupConfig {
    /// Load cleanup settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&ProcessEnv)
    }

    fn from_lookup(env: &impl EnvLookup) -> Result<Self> {
        let mut values = require_all(env, &["IQ_SERVER_URL", "IQ_USERNAME", "IQ_PASSWORD"])?;
        let iq_password = values.pop().unwrap_or_default();
        let iq_username = values.pop().unwrap_or_default();
        let iq_url = values.pop().unwrap_or_default();

        Ok(Self {
            iq_url,
            iq_username,
            iq_password,
        })
    }
}

/// Load the organization list from a JSON file.
///
/// Entries with a blank `id` or `chineseName` are dropped; a file that
/// yields no usable entries is a fatal initialization error.
pub fn load_organizations(path: &Path) -> Result<Vec<Organization>> {
    if !path.exists() {
        return Err(ConfigError::OrgFileNotFound(path.display().to_string()).into());
    }

    let contents = std::fs::read_to_string(path)?;
    let orgs: Vec<Organization> = serde_json::from_str(&contents)
        .map_err(|e| ConfigError::OrgFileInvalid(e.to_string()))?;

    let valid: Vec<Organization> = orgs
        .into_iter()
        .filter(|o| !o.id.is_empty() && !o.chinese_name.is_empty())
        .collect();

    if valid.is_empty() {
        return Err(ConfigError::NoOrganizations.into());
    }

    Ok(valid)
}
