use crate::commands;
use crate::config::manager::EndpointKind;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ghcs",
    about = "GitHub organization code security configuration tools",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose mode
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Organization to operate on
    #[arg(short, long, global = true, env = "GITHUB_ORG")]
    pub org: Option<String>,

    /// API endpoint kind
    #[arg(long, global = true, env = "GITHUB_ENDPOINT", value_enum, ignore_case = true)]
    pub endpoint: Option<EndpointKind>,

    /// GitHub Enterprise Server API base URL (e.g. https://ghes.example.com/api/v3)
    #[arg(long, global = true, env = "GHES_URL")]
    pub ghes_url: Option<String>,

    /// Access token (defaults to GITHUB_TOKEN_ORG, then GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Organization repository listing
    Repos(commands::repos::ReposArgs),
    /// Code security configurations
    Config(commands::config::ConfigArgs),
    /// Filter repositories by custom property
    Filter(commands::filter::FilterArgs),
    /// Token access diagnostics
    Org(commands::org::OrgArgs),
}
