use anyhow::{Result, bail};

use crate::api::GitHubClient;

/// Everything a command needs, resolved once at startup.
pub struct AppContext {
    pub client: GitHubClient,
    pub org: Option<String>,
    pub json: bool,
}

impl AppContext {
    pub fn require_org(&self) -> Result<&str> {
        match self.org.as_deref() {
            Some(org) if !org.trim().is_empty() => Ok(org),
            _ => bail!(
                "No organization configured. Provide --org, set GITHUB_ORG, or set `org` in the active profile"
            ),
        }
    }
}
