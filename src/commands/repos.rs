use std::path::PathBuf;

use crate::context::AppContext;
use crate::display::ui;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

#[derive(Args)]
pub struct ReposArgs {
    #[command(subcommand)]
    pub command: ReposCommands,
}

#[derive(Subcommand)]
pub enum ReposCommands {
    /// List every repository in the organization and save the names as YAML
    List {
        /// Output YAML file
        #[arg(long, default_value = crate::constants::DEFAULT_REPOS_OUTPUT)]
        output: PathBuf,

        /// Also print a table of the repositories
        #[arg(long)]
        table: bool,
    },
}

pub async fn handle(ctx: &AppContext, args: ReposArgs) -> Result<()> {
    match args.command {
        ReposCommands::List { output, table } => {
            let org = ctx.require_org()?;

            info!(org, "Listing organization repositories");
            let repos = ctx
                .client
                .list_org_repositories(org)
                .await
                .with_context(|| format!("Failed to list repositories for '{}'", org))?;

            if ctx.json {
                ui::print_json(&repos)?;
            } else if table {
                crate::display::repo::print_repo_list(&repos);
            }

            let names: Vec<String> = repos.into_iter().map(|r| r.name).collect();
            let count = names.len();
            crate::utils::repo_list::write_repo_yaml(&output, names)?;

            ui::success(&format!(
                "Wrote {} repositories to {}",
                count,
                output.display()
            ));
        }
    }
    Ok(())
}
