use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A code security configuration as GitHub stores it.
///
/// Every feature toggle is optional: a field left out of a YAML file is
/// neither compared nor sent. `id` and `target_type` are assigned by
/// GitHub, so they are read from responses but never serialized.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SecurityConfiguration {
    #[serde(default, skip_serializing)]
    pub id: Option<u64>,
    #[serde(default, skip_serializing)]
    pub target_type: Option<String>,

    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_security: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_graph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_graph_autosubmit_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_graph_autosubmit_action_options: Option<AutosubmitActionOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependabot_alerts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependabot_security_updates: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_scanning_default_setup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_scanning_default_setup_options: Option<CodeScanningDefaultSetupOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning_push_protection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning_validity_checks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning_non_provider_patterns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning_generic_secrets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning_delegated_bypass: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning_delegated_bypass_options: Option<DelegatedBypassOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning_delegated_alert_dismissal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_vulnerability_reporting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AutosubmitActionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labeled_runners: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CodeScanningDefaultSetupOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DelegatedBypassOptions {
    #[serde(default)]
    pub reviewers: Vec<Reviewer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Reviewer {
    pub reviewer_id: u64,
    pub reviewer_type: String,
}

/// The YAML file describing a desired configuration.
///
/// `default_for_new_repos` lives beside the configuration fields but is
/// applied through the separate defaults endpoint. Keys we do not know
/// are kept in `unknown` so they can be reported, then ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationFile {
    #[serde(default)]
    pub default_for_new_repos: Option<String>,
    #[serde(flatten)]
    pub configuration: SecurityConfiguration,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

impl ConfigurationFile {
    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigurationFile =
            serde_yaml::from_str(content).context("Failed to parse configuration YAML")?;

        if file.configuration.name.trim().is_empty() {
            anyhow::bail!("Configuration file must define a non-empty `name`");
        }

        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let file = Self::parse(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;

        for key in file.unknown.keys() {
            warn!(field = %key, "Ignoring unknown configuration field");
        }

        Ok(file)
    }
}

/// Find a configuration by exact name.
pub fn find_by_name<'a>(
    configurations: &'a [SecurityConfiguration],
    name: &str,
) -> Option<&'a SecurityConfiguration> {
    configurations.iter().find(|c| c.name == name)
}
