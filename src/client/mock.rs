//! Mock service clients for testing
//!
//! Configurable implementations of the API traits so orchestration logic
//! can be exercised without real HTTP calls. State lives behind std
//! mutexes; locks are never held across an await point.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::models::{RegistryApplication, RemoteProject, RemoteRepo};
use super::{ProjectHost, RepoSearch, ScanRegistry};
use crate::error::{ApiError, Result};

fn status_err(method: &str, endpoint: &str, status: StatusCode) -> crate::error::Error {
    ApiError::Status {
        method: method.to_string(),
        endpoint: endpoint.to_string(),
        status,
    }
    .into()
}

/// Call counts recorded by [`MockRegistry`]
#[derive(Debug, Default, Clone)]
pub struct RegistryCallCounts {
    pub get_applications: usize,
    pub create_application: usize,
    pub trigger_scan: usize,
    pub delete_application: usize,
}

/// Mock IQ Server registry.
///
/// Created applications are added to the in-memory registry, so a second
/// reconciliation pass against the same mock sees them as existing.
#[derive(Default)]
pub struct MockRegistry {
    apps: Mutex<Vec<RegistryApplication>>,
    fail_list: bool,
    fail_creates: HashSet<String>,
    fail_scans: HashSet<String>,
    fail_deletes: HashSet<String>,
    next_id: Mutex<usize>,
    counts: Mutex<RegistryCallCounts>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed existing applications
    pub fn with_apps(self, apps: Vec<RegistryApplication>) -> Self {
        *self.apps.lock().unwrap() = apps;
        self
    }

    /// Make `get_applications` fail
    pub fn with_list_failure(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Make `create_application` fail for one name
    pub fn with_create_failure(mut self, name: &str) -> Self {
        self.fail_creates.insert(name.to_string());
        self
    }

    /// Make `trigger_scan` fail for one application ID
    pub fn with_scan_failure(mut self, app_id: &str) -> Self {
        self.fail_scans.insert(app_id.to_string());
        self
    }

    /// Make `delete_application` fail for one application ID (HTTP 404)
    pub fn with_delete_failure(mut self, app_id: &str) -> Self {
        self.fail_deletes.insert(app_id.to_string());
        self
    }

    pub fn counts(&self) -> RegistryCallCounts {
        self.counts.lock().unwrap().clone()
    }

    /// Current registry contents (seeded plus created)
    pub fn applications(&self) -> Vec<RegistryApplication> {
        self.apps.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanRegistry for MockRegistry {
    async fn get_applications(&self, _org_id: &str) -> Result<Vec<RegistryApplication>> {
        self.counts.lock().unwrap().get_applications += 1;
        if self.fail_list {
            return Err(status_err(
                "GET",
                "/api/v2/applications/organization",
                StatusCode::BAD_GATEWAY,
            ));
        }
        Ok(self.apps.lock().unwrap().clone())
    }

    async fn create_application(
        &self,
        name: &str,
        _repo_url: &str,
        _branch: &str,
        _org_id: &str,
    ) -> Result<String> {
        self.counts.lock().unwrap().create_application += 1;
        if self.fail_creates.contains(name) {
            return Err(status_err(
                "POST",
                "/api/v2/applications",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("app-{next}")
        };
        self.apps.lock().unwrap().push(RegistryApplication {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn trigger_scan(&self, app_id: &str, _branch: &str, _stage_id: &str) -> Result<()> {
        self.counts.lock().unwrap().trigger_scan += 1;
        if self.fail_scans.contains(app_id) {
            return Err(status_err(
                "POST",
                "/api/v2/evaluation",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        Ok(())
    }

    async fn delete_application(&self, app_id: &str) -> Result<()> {
        self.counts.lock().unwrap().delete_application += 1;
        if self.fail_deletes.contains(app_id) {
            return Err(status_err(
                "DELETE",
                "/api/v2/applications",
                StatusCode::NOT_FOUND,
            ));
        }
        self.apps.lock().unwrap().retain(|a| a.id != app_id);
        Ok(())
    }
}

/// Mock Azure DevOps project host
#[derive(Default)]
pub struct MockProjectHost {
    projects: Vec<RemoteProject>,
    repo_urls: HashMap<String, String>,
    fail_projects: bool,
    fail_repo_urls: HashSet<String>,
    project_calls: Mutex<usize>,
}

impl MockProjectHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(mut self, projects: Vec<RemoteProject>) -> Self {
        self.projects = projects;
        self
    }

    /// Register the repository URL returned for a project
    pub fn with_repo_url(mut self, project_id: &str, url: &str) -> Self {
        self.repo_urls.insert(project_id.to_string(), url.to_string());
        self
    }

    pub fn with_projects_failure(mut self) -> Self {
        self.fail_projects = true;
        self
    }

    pub fn with_repo_url_failure(mut self, project_id: &str) -> Self {
        self.fail_repo_urls.insert(project_id.to_string());
        self
    }

    pub fn project_calls(&self) -> usize {
        *self.project_calls.lock().unwrap()
    }
}

#[async_trait]
impl ProjectHost for MockProjectHost {
    async fn get_projects(&self) -> Result<Vec<RemoteProject>> {
        *self.project_calls.lock().unwrap() += 1;
        if self.fail_projects {
            return Err(status_err("GET", "/_apis/projects", StatusCode::UNAUTHORIZED));
        }
        Ok(self.projects.clone())
    }

    async fn get_repo_url(&self, project_id: &str) -> Result<Option<String>> {
        if self.fail_repo_urls.contains(project_id) {
            return Err(status_err(
                "GET",
                "/_apis/git/repositories",
                StatusCode::UNAUTHORIZED,
            ));
        }
        Ok(self.repo_urls.get(project_id).cloned())
    }
}

/// Mock GitHub search client
#[derive(Default)]
pub struct MockRepoSearch {
    login: String,
    repos: Vec<RemoteRepo>,
    fail_search: bool,
    fail_login: bool,
}

impl MockRepoSearch {
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            ..Self::default()
        }
    }

    pub fn with_repos(mut self, repos: Vec<RemoteRepo>) -> Self {
        self.repos = repos;
        self
    }

    pub fn with_search_failure(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn with_login_failure(mut self) -> Self {
        self.fail_login = true;
        self
    }
}

#[async_trait]
impl RepoSearch for MockRepoSearch {
    async fn current_login(&self) -> Result<String> {
        if self.fail_login {
            return Err(status_err("GET", "/user", StatusCode::UNAUTHORIZED));
        }
        Ok(self.login.clone())
    }

    async fn search_repositories(&self, _term: &str, _login: &str) -> Result<Vec<RemoteRepo>> {
        if self.fail_search {
            return Err(status_err("GET", "/search/repositories", StatusCode::FORBIDDEN));
        }
        Ok(self.repos.clone())
    }
}
