//! Domain models shared across the service clients

use serde::Deserialize;

/// An application record in the IQ Server registry
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegistryApplication {
    /// Internal application ID
    pub id: String,

    /// Application name; reconciliation keys on this
    pub name: String,
}

/// A project on the Azure DevOps host
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoteProject {
    /// Project ID
    pub id: String,

    /// Project name, used as the application name on create
    pub name: String,

    /// Free-form description; organization matching runs against this
    #[serde(default)]
    pub description: String,
}

/// A repository returned by a GitHub name search
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoteRepo {
    /// Repository name
    pub name: String,

    /// HTTPS clone URL
    #[serde(rename = "clone_url")]
    pub clone_url: String,

    /// Default branch, when the API reports one
    #[serde(rename = "default_branch")]
    pub default_branch: Option<String>,
}
