use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Repository entry as returned by the org listing and single-repo endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_and_analysis: Option<SecurityAndAnalysis>,
}

impl Repository {
    pub fn is_public_active(&self) -> bool {
        !self.private && !self.archived
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomProperty {
    pub property_name: String,
    #[serde(default)]
    pub value: Value,
}

/// One row of the org-wide custom property values listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPropertyValues {
    pub repository_name: String,
    #[serde(default)]
    pub properties: Vec<CustomProperty>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityAndAnalysis {
    pub advanced_security: Option<FeatureStatus>,
    pub secret_scanning: Option<FeatureStatus>,
    pub secret_scanning_push_protection: Option<FeatureStatus>,
    pub dependabot_security_updates: Option<FeatureStatus>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureStatus {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub login: String,
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Organization {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Membership {
    pub role: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct AttachRequest<'a> {
    pub scope: &'a str,
    pub selected_repository_ids: &'a [u64],
}

#[derive(Debug, Serialize)]
pub struct DefaultsRequest<'a> {
    pub default_for_new_repos: &'a str,
}
