use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info, warn};

use crate::api::GitHubClient;
use crate::context::AppContext;
use crate::display::ui;
use crate::filter::classifier::Classification;
use crate::filter::matcher::{MatchCriterion, PropertyMatch, match_property};
use crate::utils::repo_list::write_name_line;

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Custom property name to filter by (case-sensitive)
    #[arg(long, default_value = "isProduction")]
    pub property: String,

    /// Property value to match (case-insensitive)
    #[arg(long, default_value = "yes")]
    pub value: String,

    /// Comma-separated accepted values; overrides --value when set
    #[arg(long)]
    pub values: Option<String>,

    /// Print every repository's property value to stderr
    #[arg(long)]
    pub show_all: bool,

    /// Try the org-wide property values listing before per-repository lookups
    #[arg(long)]
    pub org_properties: bool,

    /// Only report public, non-archived repositories; skips property lookups
    #[arg(long)]
    pub public_only: bool,

    /// Matched repositories file (default workspace/<org>-prod.txt)
    #[arg(long)]
    pub out_file: Option<String>,

    /// Matched public repositories file (default workspace/<org>-public-prod.txt)
    #[arg(long)]
    pub public_prod_out_file: Option<String>,
}

/// Inputs of a property scan, independent of the command line.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub property: String,
    pub criterion: MatchCriterion,
    pub show_all: bool,
    pub org_properties: bool,
    pub public_only: bool,
}

impl From<&FilterArgs> for ScanOptions {
    fn from(args: &FilterArgs) -> Self {
        Self {
            property: args.property.clone(),
            criterion: MatchCriterion::new(&args.value, args.values.as_deref()),
            show_all: args.show_all,
            org_properties: args.org_properties,
            public_only: args.public_only,
        }
    }
}

pub async fn handle(ctx: &AppContext, args: FilterArgs) -> Result<()> {
    let org = ctx.require_org()?;
    let options = ScanOptions::from(&args);
    let out_file = resolve_output_path(args.out_file.as_deref(), &format!("{}-prod.txt", org));
    let public_prod_file = resolve_output_path(
        args.public_prod_out_file.as_deref(),
        &format!("{}-public-prod.txt", org),
    );

    let classification = scan(&ctx.client, org, &options).await?;

    if ctx.json {
        ui::print_json(&classification)?;
    } else {
        let names = if options.public_only {
            &classification.public
        } else {
            &classification.matched
        };
        for name in names {
            println!("{}", name);
        }
    }

    write_outputs(&classification, &options, &out_file, &public_prod_file)?;

    if options.public_only {
        debug!("Public-only mode completed");
        return Ok(());
    }

    if classification.matched.is_empty() {
        ui::warning(&format!(
            "No repositories matched. Checked: {} property: {} value(s): {}. Use --show-all --verbose for diagnostics",
            classification.checked, options.property, options.criterion
        ));
    }

    Ok(())
}

/// Run the property scan for one organization.
///
/// Listing failures are fatal. A failed property lookup for a single
/// repository is logged, recorded as skipped, and the scan moves on.
pub async fn scan(client: &GitHubClient, org: &str, options: &ScanOptions) -> Result<Classification> {
    let mut classification = Classification::default();

    if !options.public_only && options.org_properties {
        if scan_org_property_values(client, org, options, &mut classification).await? {
            return Ok(classification);
        }
        info!(org, "Org property values endpoint not found, switching to per-repository lookups");
    }

    let repos = client
        .list_org_repositories(org)
        .await
        .with_context(|| format!("Failed to list repositories for '{}'", org))?;
    info!(org, count = repos.len(), "Listed repositories");

    for repo in &repos {
        if options.public_only {
            classification.record_public_only(repo);
            continue;
        }

        let properties = match client.list_repository_properties(org, &repo.name).await {
            Ok(properties) => properties,
            Err(e) => {
                warn!(repo = %repo.name, error = %e, "Skipping repository");
                classification.record_skipped(&repo.name);
                continue;
            }
        };

        let outcome = match_property(&properties, &options.property, &options.criterion);
        report(options, &repo.name, &outcome);
        classification.record(repo, &outcome);
    }

    Ok(classification)
}

/// Fast path over the org-wide listing. Returns `false` when the
/// endpoint does not exist on this server.
async fn scan_org_property_values(
    client: &GitHubClient,
    org: &str,
    options: &ScanOptions,
    classification: &mut Classification,
) -> Result<bool> {
    let rows = match client.list_org_property_values(org).await {
        Ok(rows) => rows,
        Err(e) if e.is_not_found() => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to list property values for '{}'", org));
        }
    };

    for row in &rows {
        let outcome = match_property(&row.properties, &options.property, &options.criterion);
        report(options, &row.repository_name, &outcome);
        classification.record_named(&row.repository_name, None, &outcome);
    }

    Ok(true)
}

fn report(options: &ScanOptions, repo: &str, outcome: &PropertyMatch) {
    if !options.show_all {
        return;
    }
    match outcome {
        PropertyMatch::Found { value, matched } => ui::diagnostic(&format!(
            "repo: {} value: {} match: {}",
            repo, value, matched
        )),
        PropertyMatch::NotFound => ui::diagnostic(&format!(
            "repo: {} property {} not set",
            repo, options.property
        )),
    }
}

/// A bare file name lands under the workspace directory.
pub fn resolve_output_path(requested: Option<&str>, default_name: &str) -> PathBuf {
    let workspace = Path::new(crate::constants::OUTPUT_WORKSPACE_DIR);
    match requested.filter(|r| !r.is_empty()) {
        None => workspace.join(default_name),
        Some(name) if !name.contains('/') => workspace.join(name),
        Some(path) => PathBuf::from(path),
    }
}

fn write_outputs(
    classification: &Classification,
    options: &ScanOptions,
    out_file: &Path,
    public_prod_file: &Path,
) -> Result<()> {
    if !options.public_only {
        write_name_line(out_file, &classification.matched)?;
        debug!(
            count = classification.matched.len(),
            path = %out_file.display(),
            "Wrote matched repositories"
        );
    }

    if !classification.public_matched.is_empty() {
        write_name_line(public_prod_file, &classification.public_matched)?;
        debug!(
            count = classification.public_matched.len(),
            path = %public_prod_file.display(),
            "Wrote public matched repositories"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn options(public_only: bool, org_properties: bool) -> ScanOptions {
        ScanOptions {
            property: "isProduction".to_string(),
            criterion: MatchCriterion::new("yes", None),
            show_all: false,
            org_properties,
            public_only,
        }
    }

    fn repo_json(i: usize) -> Value {
        json!({
            "id": i,
            "name": format!("repo-{}", i),
            "private": i % 2 == 0,
            "archived": false
        })
    }

    async fn mount_repo_listing(server: &MockServer, total: usize) {
        let repos: Vec<Value> = (1..=total).map(repo_json).collect();
        for (index, chunk) in repos.chunks(100).enumerate() {
            Mock::given(method("GET"))
                .and(path("/orgs/acme/repos"))
                .and(wiremock::matchers::query_param(
                    "page",
                    (index + 1).to_string().as_str(),
                ))
                .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(chunk.to_vec())))
                .mount(server)
                .await;
        }
    }

    fn properties_for(request: &Request) -> ResponseTemplate {
        let name = request
            .url
            .path()
            .trim_start_matches("/repos/acme/")
            .trim_end_matches("/properties/values")
            .to_string();
        let index: usize = name.trim_start_matches("repo-").parse().unwrap_or(0);

        match index {
            10 | 55 | 140 => ResponseTemplate::new(200)
                .set_body_json(json!([{"property_name": "isProduction", "value": "Yes"}])),
            77 => ResponseTemplate::new(500).set_body_string("boom"),
            i if i % 3 == 0 => ResponseTemplate::new(200)
                .set_body_json(json!([{"property_name": "isProduction", "value": "no"}])),
            _ => ResponseTemplate::new(200).set_body_json(json!([])),
        }
    }

    async fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::new(Endpoint::Server(server.uri()), "token".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_scan_of_150_repositories() {
        let server = MockServer::start().await;
        mount_repo_listing(&server, 150).await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/acme/[^/]+/properties/values$"))
            .respond_with(properties_for)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = scan(&client, "acme", &options(false, false)).await.unwrap();

        assert_eq!(result.matched, vec!["repo-10", "repo-55", "repo-140"]);
        // Odd ids are public in the fixture.
        assert_eq!(result.public_matched, vec!["repo-55"]);
        assert_eq!(result.skipped, vec!["repo-77"]);
        assert_eq!(result.checked, 149);
        assert_eq!(result.unmatched.len(), 50);
        assert_eq!(
            result.matched.len() + result.unmatched.len() + result.missing_property.len(),
            149
        );
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/repos"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = scan(&client, "acme", &options(false, false))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Bad credentials"));
    }

    #[tokio::test]
    async fn test_public_only_skips_property_lookups() {
        let server = MockServer::start().await;
        mount_repo_listing(&server, 5).await;
        Mock::given(method("GET"))
            .and(path_regex(r"/properties/values$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = scan(&client, "acme", &options(true, true)).await.unwrap();

        assert_eq!(result.public, vec!["repo-1", "repo-3", "repo-5"]);
        assert_eq!(result.checked, 0);
    }

    #[tokio::test]
    async fn test_org_properties_fast_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/properties/values"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"repository_id": 1, "repository_name": "web", "repository_full_name": "acme/web",
                 "properties": [{"property_name": "isProduction", "value": "YES"}]},
                {"repository_id": 2, "repository_name": "docs", "repository_full_name": "acme/docs",
                 "properties": []}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = scan(&client, "acme", &options(false, true)).await.unwrap();

        assert_eq!(result.matched, vec!["web"]);
        assert_eq!(result.missing_property, vec!["docs"]);
        assert!(result.public_matched.is_empty());
    }

    #[tokio::test]
    async fn test_org_properties_not_found_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/properties/values"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_repo_listing(&server, 3).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/repo-3/properties/values"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!([{"property_name": "isProduction", "value": "yes"}]),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/acme/repo-[12]/properties/values$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = scan(&client, "acme", &options(false, true)).await.unwrap();

        assert_eq!(result.matched, vec!["repo-3"]);
        assert_eq!(result.public_matched, vec!["repo-3"]);
        assert_eq!(result.missing_property, vec!["repo-1", "repo-2"]);
    }

    #[test]
    fn test_resolve_output_path() {
        assert_eq!(
            resolve_output_path(None, "acme-prod.txt"),
            PathBuf::from("workspace/acme-prod.txt")
        );
        assert_eq!(
            resolve_output_path(Some("mine.txt"), "acme-prod.txt"),
            PathBuf::from("workspace/mine.txt")
        );
        assert_eq!(
            resolve_output_path(Some("out/mine.txt"), "acme-prod.txt"),
            PathBuf::from("out/mine.txt")
        );
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let prod = dir.path().join("prod.txt");
        let public = dir.path().join("public.txt");
        let classification = Classification {
            matched: vec!["a".to_string(), "b".to_string()],
            public_matched: vec!["b".to_string()],
            ..Default::default()
        };

        write_outputs(&classification, &options(false, false), &prod, &public).unwrap();
        assert_eq!(std::fs::read_to_string(&prod).unwrap(), "a,b\n");
        assert_eq!(std::fs::read_to_string(&public).unwrap(), "b\n");
    }

    #[test]
    fn test_empty_public_matches_write_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let prod = dir.path().join("prod.txt");
        let public = dir.path().join("public.txt");

        write_outputs(&Classification::default(), &options(false, false), &prod, &public).unwrap();
        assert_eq!(std::fs::read_to_string(&prod).unwrap(), "\n");
        assert!(!public.exists());
    }
}
