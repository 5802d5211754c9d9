use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::GitHubClient;
use crate::api::models::Repository;
use crate::commands::Aborted;
use crate::context::AppContext;
use crate::display::ui;
use crate::security::configuration::{ConfigurationFile, find_by_name};
use crate::security::diff::diff_configurations;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// List the organization's code security configurations
    List,
    /// Create a configuration from a YAML file
    Create {
        /// Path to the configuration YAML
        #[arg(long)]
        yaml: PathBuf,
    },
    /// Show what would change, confirm, then update (or create) a configuration
    Update {
        /// Path to the configuration YAML
        #[arg(long)]
        yaml: PathBuf,
    },
    /// Attach repositories to a configuration
    Attach {
        /// Repository name, comma-separated list, "all", or path to a list file
        #[arg(long)]
        repo: Option<String>,

        /// File listing repositories (newline, comma or semicolon separated, or repos YAML)
        #[arg(long)]
        repo_file: Option<PathBuf>,

        /// Name of the code security configuration
        #[arg(long = "config", default_value = "sample")]
        config_name: String,
    },
}

pub async fn handle(ctx: &AppContext, args: ConfigArgs) -> Result<()> {
    let org = ctx.require_org()?;

    match args.command {
        ConfigCommands::List => {
            let configurations = ctx
                .client
                .list_security_configurations(org)
                .await
                .context("Failed to list code security configurations")?;
            if ctx.json {
                ui::print_json(&configurations)?;
            } else {
                crate::display::configuration::print_configuration_list(&configurations);
            }
        }
        ConfigCommands::Create { yaml } => {
            let file = ConfigurationFile::load(&yaml)?;
            let response = create_configuration(&ctx.client, org, &file).await?;
            ui::success("Configuration created successfully:");
            ui::print_json(&response)?;
        }
        ConfigCommands::Update { yaml } => {
            let file = ConfigurationFile::load(&yaml)?;
            let stdin = io::stdin();
            let mut input = stdin.lock();
            match update_configuration(&ctx.client, org, &file, &mut input).await? {
                UpdateOutcome::UpToDate => ui::info("No changes detected."),
                UpdateOutcome::Applied(response) => {
                    ui::success("Configuration updated successfully:");
                    ui::print_json(&response)?;
                }
            }
        }
        ConfigCommands::Attach {
            repo,
            repo_file,
            config_name,
        } => {
            let selection = RepoSelection::parse(repo.as_deref(), repo_file.as_deref())?;
            let attached = attach_repositories(&ctx.client, org, &config_name, &selection).await?;
            print_attach_summary(org, &config_name, &selection, &attached);
        }
    }

    Ok(())
}

#[derive(Debug)]
pub enum UpdateOutcome {
    /// Remote already matches the file; nothing was sent.
    UpToDate,
    /// The remote response of the PATCH or POST.
    Applied(Value),
}

/// POST a new configuration, then apply `default_for_new_repos` if the file sets it.
pub async fn create_configuration(
    client: &GitHubClient,
    org: &str,
    file: &ConfigurationFile,
) -> Result<Value> {
    info!(org, name = %file.configuration.name, "Creating configuration");
    let response = client
        .create_security_configuration(org, &file.configuration)
        .await
        .context("Failed to create configuration")?;

    apply_default_for_new_repos(client, org, file, None, &response).await?;
    Ok(response)
}

/// Fetch, diff, confirm, apply.
///
/// Only the exact answers `y` or `Y` on their own line proceed; anything
/// else returns [`Aborted`]. When the remote record already matches,
/// nothing is sent.
pub async fn update_configuration<R: BufRead>(
    client: &GitHubClient,
    org: &str,
    file: &ConfigurationFile,
    input: &mut R,
) -> Result<UpdateOutcome> {
    let desired = &file.configuration;
    let configurations = client
        .list_security_configurations(org)
        .await
        .context("Failed to fetch current configurations")?;
    if configurations.is_empty() {
        ui::info("No current configuration found in GitHub API response.");
    }

    let current = find_by_name(&configurations, &desired.name);
    let changes = diff_configurations(current, desired);
    if changes.is_empty() {
        return Ok(UpdateOutcome::UpToDate);
    }

    crate::display::diff::print_changes(&changes);
    print!("Apply these changes? (y/N): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    if !is_confirmation(&answer) {
        return Err(Aborted.into());
    }

    let existing_id = current.and_then(|c| c.id);
    let response = match existing_id {
        Some(id) => {
            info!(org, id, name = %desired.name, "Updating configuration");
            client
                .update_security_configuration(org, id, desired)
                .await
                .context("Failed to update configuration")?
        }
        None => {
            info!(org, name = %desired.name, "Configuration not found remotely, creating it");
            client
                .create_security_configuration(org, desired)
                .await
                .context("Failed to create configuration")?
        }
    };

    apply_default_for_new_repos(client, org, file, existing_id, &response).await?;
    Ok(UpdateOutcome::Applied(response))
}

/// `y` or `Y` followed by a line terminator.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer, "y\n" | "Y\n" | "y\r\n" | "Y\r\n")
}

async fn apply_default_for_new_repos(
    client: &GitHubClient,
    org: &str,
    file: &ConfigurationFile,
    known_id: Option<u64>,
    response: &Value,
) -> Result<()> {
    let Some(default_for) = file.default_for_new_repos.as_deref() else {
        return Ok(());
    };

    let id = known_id
        .or_else(|| configuration_id(response))
        .context("Could not determine configuration ID to set as default")?;

    client
        .set_default_for_new_repos(org, id, default_for)
        .await
        .with_context(|| format!("Failed to set configuration {} as default for new repos", id))?;
    ui::success(&format!(
        "Default for new repos set to '{}' for configuration {}",
        default_for, id
    ));
    Ok(())
}

/// Configuration id from a create/update response (`id`, or `value.id`).
pub fn configuration_id(response: &Value) -> Option<u64> {
    response
        .get("id")
        .and_then(Value::as_u64)
        .or_else(|| response.get("value")?.get("id")?.as_u64())
}

/// Which repositories an attach targets.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoSelection {
    All,
    /// Lenient list: unknown names are skipped.
    Names(Vec<String>),
    /// Strict single lookup.
    Single(String),
}

impl RepoSelection {
    pub fn parse(repo: Option<&str>, repo_file: Option<&Path>) -> Result<Self> {
        let repo = repo.map(str::trim).filter(|r| !r.is_empty());

        match (repo, repo_file) {
            (Some("all"), _) => Ok(RepoSelection::All),
            (Some(arg), _) if Path::new(arg).is_file() => Self::from_file(Path::new(arg)),
            (Some(arg), _) if arg.contains(',') => Ok(RepoSelection::Names(
                crate::utils::repo_list::parse_repo_list(arg),
            )),
            (Some(arg), _) => Ok(RepoSelection::Single(arg.to_string())),
            (None, Some(path)) => Self::from_file(path),
            (None, None) => bail!("Provide --repo <name|list|all|file> or --repo-file <path>"),
        }
    }

    /// A file holding exactly one name is a strict single lookup.
    fn from_file(path: &Path) -> Result<Self> {
        let mut names = crate::utils::repo_list::load_repo_list(path)?;
        if names.len() == 1 {
            return Ok(RepoSelection::Single(names.remove(0)));
        }
        Ok(RepoSelection::Names(names))
    }
}

pub async fn resolve_repositories(
    client: &GitHubClient,
    org: &str,
    selection: &RepoSelection,
) -> Result<Vec<Repository>> {
    match selection {
        RepoSelection::All => {
            let repos = client
                .list_org_repositories(org)
                .await
                .context("Failed to list organization repositories")?;
            if repos.is_empty() {
                bail!("No repositories found in organization '{}'", org);
            }
            Ok(repos)
        }
        RepoSelection::Names(names) => {
            let mut repos = Vec::with_capacity(names.len());
            for name in names {
                match client.get_repository(org, name).await {
                    Ok(repo) => repos.push(repo),
                    Err(e) => warn!(repo = %name, error = %e, "Could not find repository, skipping"),
                }
            }
            if repos.is_empty() {
                bail!("No valid repositories found from the provided list");
            }
            Ok(repos)
        }
        RepoSelection::Single(name) => {
            let repo = client
                .get_repository(org, name)
                .await
                .with_context(|| format!("Failed to get repository '{}'", name))?;
            Ok(vec![repo])
        }
    }
}

/// Attach the selected repositories to the named configuration.
pub async fn attach_repositories(
    client: &GitHubClient,
    org: &str,
    config_name: &str,
    selection: &RepoSelection,
) -> Result<Vec<Repository>> {
    let configurations = client
        .list_security_configurations(org)
        .await
        .context("Failed to list code security configurations")?;
    let config_id = find_by_name(&configurations, config_name)
        .and_then(|c| c.id)
        .with_context(|| format!("Could not find configuration with name '{}'", config_name))?;

    let repos = resolve_repositories(client, org, selection).await?;
    let ids: Vec<u64> = repos.iter().map(|r| r.id).collect();

    info!(org, config_id, count = ids.len(), "Attaching repositories");
    client
        .attach_configuration(org, config_id, &ids)
        .await
        .context("Failed to attach repositories")?;

    Ok(repos)
}

fn print_attach_summary(
    org: &str,
    config_name: &str,
    selection: &RepoSelection,
    attached: &[Repository],
) {
    match selection {
        RepoSelection::All => ui::success(&format!(
            "All repositories in organization '{}' have been attached to configuration '{}'.",
            org, config_name
        )),
        _ => ui::success(&format!(
            "Repositories attached to configuration '{}':",
            config_name
        )),
    }

    let rows = attached
        .iter()
        .map(|r| vec![Cell::new(&r.name), Cell::new(r.id)])
        .collect();
    crate::utils::formatting::print_table(vec!["Repository", "ID"], rows);
    ui::info(&format!("Total repositories attached: {}", attached.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use serde_json::json;
    use std::io::Cursor;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CONFIGS: &str = "/orgs/acme/code-security/configurations";

    fn desired(yaml: &str) -> ConfigurationFile {
        ConfigurationFile::parse(yaml).unwrap()
    }

    async fn server_with_configs(configs: Value) -> (MockServer, GitHubClient) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CONFIGS))
            .respond_with(ResponseTemplate::new(200).set_body_json(configs))
            .mount(&server)
            .await;
        let client =
            GitHubClient::new(Endpoint::Server(server.uri()), "token".to_string()).unwrap();
        (server, client)
    }

    fn remote_baseline() -> Value {
        json!([{
            "id": 12,
            "target_type": "organization",
            "name": "baseline",
            "secret_scanning": "disabled",
            "enforcement": "enforced"
        }])
    }

    #[test]
    fn test_confirmation_is_strict() {
        assert!(is_confirmation("y\n"));
        assert!(is_confirmation("Y\n"));
        assert!(is_confirmation("y\r\n"));
        assert!(!is_confirmation("yes\n"));
        assert!(!is_confirmation(" y\n"));
        assert!(!is_confirmation("y"));
        assert!(!is_confirmation("\n"));
        assert!(!is_confirmation("n\n"));
    }

    #[test]
    fn test_configuration_id_extraction() {
        assert_eq!(configuration_id(&json!({"id": 5})), Some(5));
        assert_eq!(configuration_id(&json!({"value": {"id": 6}})), Some(6));
        assert_eq!(configuration_id(&json!({})), None);
        assert_eq!(configuration_id(&Value::Null), None);
    }

    #[tokio::test]
    async fn test_update_without_changes_sends_nothing() {
        let (server, client) = server_with_configs(remote_baseline()).await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let file = desired("name: baseline\nsecret_scanning: disabled\n");
        let mut input = Cursor::new(Vec::new());
        let outcome = update_configuration(&client, "acme", &file, &mut input)
            .await
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::UpToDate));
    }

    #[tokio::test]
    async fn test_update_declined_is_aborted() {
        let (server, client) = server_with_configs(remote_baseline()).await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let file = desired("name: baseline\nsecret_scanning: enabled\n");
        let mut input = Cursor::new(b"yes\n".to_vec());
        let err = update_configuration(&client, "acme", &file, &mut input)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<Aborted>().is_some());
    }

    #[tokio::test]
    async fn test_update_confirmed_patches_existing() {
        let (server, client) = server_with_configs(remote_baseline()).await;
        Mock::given(method("PATCH"))
            .and(path(format!("{}/12", CONFIGS)))
            .and(body_json(json!({"name": "baseline", "secret_scanning": "enabled"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 12})))
            .expect(1)
            .mount(&server)
            .await;

        let file = desired("name: baseline\nsecret_scanning: enabled\n");
        let mut input = Cursor::new(b"Y\n".to_vec());
        let outcome = update_configuration(&client, "acme", &file, &mut input)
            .await
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::Applied(ref v) if v["id"] == 12));
    }

    #[tokio::test]
    async fn test_update_creates_when_missing_and_sets_default() {
        let (server, client) = server_with_configs(json!([])).await;
        Mock::given(method("POST"))
            .and(path(CONFIGS))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 33})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/33/defaults", CONFIGS)))
            .and(body_json(json!({"default_for_new_repos": "all"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let file = desired("name: fresh\ndefault_for_new_repos: all\nsecret_scanning: enabled\n");
        let mut input = Cursor::new(b"y\n".to_vec());
        let outcome = update_configuration(&client, "acme", &file, &mut input)
            .await
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::Applied(_)));
    }

    #[tokio::test]
    async fn test_create_posts_payload_without_defaults_field() {
        let (server, client) = server_with_configs(json!([])).await;
        Mock::given(method("POST"))
            .and(path(CONFIGS))
            .and(body_json(json!({"name": "fresh", "dependabot_alerts": "enabled"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 40})))
            .expect(1)
            .mount(&server)
            .await;

        let file = desired("name: fresh\ndependabot_alerts: enabled\n");
        let response = create_configuration(&client, "acme", &file).await.unwrap();
        assert_eq!(configuration_id(&response), Some(40));
    }

    #[test]
    fn test_repo_selection_parsing() {
        assert_eq!(
            RepoSelection::parse(Some("all"), None).unwrap(),
            RepoSelection::All
        );
        assert_eq!(
            RepoSelection::parse(Some("web, api,,web"), None).unwrap(),
            RepoSelection::Names(vec!["web".to_string(), "api".to_string()])
        );
        assert_eq!(
            RepoSelection::parse(Some("web"), None).unwrap(),
            RepoSelection::Single("web".to_string())
        );
        assert!(RepoSelection::parse(None, None).is_err());
    }

    #[test]
    fn test_repo_selection_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("repos.txt");
        std::fs::write(&list, "web\napi;docs\n").unwrap();

        let expected = RepoSelection::Names(vec![
            "web".to_string(),
            "api".to_string(),
            "docs".to_string(),
        ]);
        assert_eq!(
            RepoSelection::parse(list.to_str(), None).unwrap(),
            expected
        );
        assert_eq!(RepoSelection::parse(None, Some(&list)).unwrap(), expected);
    }

    #[test]
    fn test_single_entry_file_is_strict_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("one.txt");
        std::fs::write(&list, "web\n").unwrap();

        let expected = RepoSelection::Single("web".to_string());
        assert_eq!(
            RepoSelection::parse(list.to_str(), None).unwrap(),
            expected
        );
        assert_eq!(RepoSelection::parse(None, Some(&list)).unwrap(), expected);
    }

    #[test]
    fn test_all_keyword_wins_over_repo_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("repos.txt");
        std::fs::write(&list, "web\napi\n").unwrap();

        assert_eq!(
            RepoSelection::parse(Some("all"), Some(&list)).unwrap(),
            RepoSelection::All
        );
    }

    #[tokio::test]
    async fn test_attach_skips_unknown_names() {
        let (server, client) = server_with_configs(json!([{"id": 7, "name": "sample"}])).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/web"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 101, "name": "web"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/7/repositories", CONFIGS)))
            .and(body_json(json!({"scope": "selected", "selected_repository_ids": [101]})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let selection = RepoSelection::Names(vec!["web".to_string(), "ghost".to_string()]);
        let attached = attach_repositories(&client, "acme", "sample", &selection)
            .await
            .unwrap();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].name, "web");
    }

    #[tokio::test]
    async fn test_attach_single_missing_repo_is_fatal() {
        let (server, client) = server_with_configs(json!([{"id": 7, "name": "sample"}])).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let selection = RepoSelection::Single("ghost".to_string());
        let err = attach_repositories(&client, "acme", "sample", &selection)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("ghost"));
    }

    #[tokio::test]
    async fn test_attach_unknown_configuration_is_fatal() {
        let (_server, client) = server_with_configs(json!([{"id": 7, "name": "sample"}])).await;
        let err = attach_repositories(&client, "acme", "missing", &RepoSelection::All)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }
}
