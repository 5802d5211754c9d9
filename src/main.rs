use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod commands;
mod config;
mod constants;
mod context;
mod display;
mod filter;
mod security;
mod utils;

use cli::{Cli, Commands};
use config::manager::{AppConfig, resolve_endpoint, resolve_token};
use context::AppContext;
use display::ui;

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn build_context(cli: &Cli) -> Result<AppContext> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        if !cli.quiet {
            ui::warning(&format!("Failed to load config: {:#}", e));
        }
        AppConfig::default()
    });
    let profile = config.profile(cli.profile.as_deref()).cloned().unwrap_or_default();

    let token = resolve_token(cli.token.as_deref(), |var| std::env::var(var).ok())?;
    let endpoint = resolve_endpoint(
        cli.endpoint.or(profile.endpoint),
        cli.ghes_url.as_deref().or(profile.ghes_url.as_deref()),
    )?;
    let org = cli.org.clone().or(profile.org);

    let client = api::GitHubClient::new(endpoint, token)?;
    Ok(AppContext {
        client,
        org,
        json: cli.json,
    })
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = build_context(&cli)?;
    match cli.command {
        Commands::Repos(args) => commands::repos::handle(&ctx, args).await,
        Commands::Config(args) => commands::config::handle(&ctx, args).await,
        Commands::Filter(args) => commands::filter::handle(&ctx, args).await,
        Commands::Org(args) => commands::org::handle(&ctx, args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<commands::Aborted>() => {
            ui::warning("Aborted.");
            ExitCode::from(2)
        }
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
