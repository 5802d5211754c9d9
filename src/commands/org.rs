use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::GitHubClient;
use crate::api::models::{FeatureStatus, Membership, Organization, User};
use crate::context::AppContext;
use crate::display::ui;

#[derive(Args)]
pub struct OrgArgs {
    #[command(subcommand)]
    pub command: OrgCommands,
}

#[derive(Subcommand)]
pub enum OrgCommands {
    /// Report the token's user, organization memberships and repository security settings
    Check {
        /// Only report memberships and repository counts
        #[arg(long)]
        skip_repos: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Configured,
    NotConfigured,
    Unavailable,
}

impl ProbeStatus {
    fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            ProbeStatus::Configured
        } else if status == StatusCode::NOT_FOUND {
            ProbeStatus::NotConfigured
        } else {
            ProbeStatus::Unavailable
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessReport {
    pub user: User,
    pub organizations: Vec<OrgReport>,
}

#[derive(Debug, Serialize)]
pub struct OrgReport {
    pub login: String,
    pub membership: Option<Membership>,
    pub repository_count: Option<usize>,
    pub repositories: Vec<RepoSecurity>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RepoSecurity {
    pub name: String,
    pub advanced_security: Option<String>,
    pub secret_scanning: Option<String>,
    pub secret_scanning_push_protection: Option<String>,
    pub dependabot_security_updates: Option<String>,
    pub code_scanning: ProbeStatus,
    pub dependabot_alerts: ProbeStatus,
    pub error: Option<String>,
}

pub async fn handle(ctx: &AppContext, args: OrgArgs) -> Result<()> {
    match args.command {
        OrgCommands::Check { skip_repos } => {
            let report = build_report(&ctx.client, ctx.org.as_deref(), !skip_repos).await?;
            if ctx.json {
                ui::print_json(&report)?;
            } else {
                crate::display::org::print_access_report(&report);
            }
        }
    }
    Ok(())
}

/// Gather the access report. Only the user lookup is fatal; every
/// other failure is recorded in the report and the walk continues.
pub async fn build_report(
    client: &GitHubClient,
    only_org: Option<&str>,
    include_repos: bool,
) -> Result<AccessReport> {
    let user = client
        .get_current_user()
        .await
        .context("Failed to fetch the authenticated user")?;
    info!(login = %user.login, "Authenticated");

    let organizations = match only_org {
        Some(org) => vec![Organization {
            login: org.to_string(),
        }],
        None => client.list_user_organizations().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to list organizations");
            Vec::new()
        }),
    };

    let mut reports = Vec::with_capacity(organizations.len());
    for org in organizations {
        reports.push(check_organization(client, &org.login, include_repos).await);
    }

    Ok(AccessReport {
        user,
        organizations: reports,
    })
}

async fn check_organization(client: &GitHubClient, org: &str, include_repos: bool) -> OrgReport {
    let membership = match client.get_org_membership(org).await {
        Ok(m) => Some(m),
        Err(e) => {
            warn!(org, error = %e, "Failed to read membership");
            None
        }
    };

    let mut report = OrgReport {
        login: org.to_string(),
        membership,
        repository_count: None,
        repositories: Vec::new(),
        error: None,
    };

    let repos = match client.list_org_repositories(org).await {
        Ok(repos) => repos,
        Err(e) => {
            warn!(org, error = %e, "Failed to list repositories");
            report.error = Some(e.to_string());
            return report;
        }
    };
    report.repository_count = Some(repos.len());

    if include_repos {
        for repo in &repos {
            report
                .repositories
                .push(check_repository(client, org, &repo.name).await);
        }
    }

    report
}

async fn check_repository(client: &GitHubClient, org: &str, name: &str) -> RepoSecurity {
    let mut entry = RepoSecurity {
        name: name.to_string(),
        advanced_security: None,
        secret_scanning: None,
        secret_scanning_push_protection: None,
        dependabot_security_updates: None,
        code_scanning: ProbeStatus::Unavailable,
        dependabot_alerts: ProbeStatus::Unavailable,
        error: None,
    };

    match client.get_repository(org, name).await {
        Ok(details) => {
            if let Some(security) = details.security_and_analysis {
                let status = |f: Option<FeatureStatus>| f.map(|s| s.status);
                entry.advanced_security = status(security.advanced_security);
                entry.secret_scanning = status(security.secret_scanning);
                entry.secret_scanning_push_protection =
                    status(security.secret_scanning_push_protection);
                entry.dependabot_security_updates = status(security.dependabot_security_updates);
            }
        }
        Err(e) => {
            warn!(repo = %name, error = %e, "Failed to get repository details");
            entry.error = Some(e.to_string());
            return entry;
        }
    }

    entry.code_scanning = probe(
        client,
        &format!("/repos/{}/{}/code-scanning/alerts?per_page=1", org, name),
    )
    .await;
    entry.dependabot_alerts = probe(
        client,
        &format!("/repos/{}/{}/dependabot/alerts?per_page=1", org, name),
    )
    .await;

    entry
}

async fn probe(client: &GitHubClient, path: &str) -> ProbeStatus {
    match client.probe(path).await {
        Ok(status) => ProbeStatus::from_status(status),
        Err(e) => {
            warn!(path, error = %e, "Probe failed");
            ProbeStatus::Unavailable
        }
    }
}
