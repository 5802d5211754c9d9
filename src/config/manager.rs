use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use config::{Config, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::api::Endpoint;

/// Settings merged from the global and the nearest local settings file.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    pub default_profile: Option<String>,
    pub profiles: Option<HashMap<String, ProfileConfig>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ProfileConfig {
    pub org: Option<String>,
    pub endpoint: Option<EndpointKind>,
    pub ghes_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPERCASE")]
pub enum EndpointKind {
    /// github.com / GitHub Enterprise Cloud
    Ghec,
    /// GitHub Enterprise Server
    Ghes,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut sources = Vec::new();

        // 1. Global config: ~/.config/ghcs/config.toml
        if let Some(config_dir) = get_config_dir() {
            let global_config_path = config_dir
                .join(crate::constants::CONFIG_DIR_NAME)
                .join(crate::constants::CONFIG_FILE_NAME);
            if global_config_path.exists() {
                sources.push(global_config_path);
            }
        }

        // 2. Local config: nearest .ghcs.toml walking up from the working directory
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        if let Some(local_config_path) = find_local_config(&current_dir) {
            sources.push(local_config_path);
        }

        Self::from_files(&sources)
    }

    /// Later files override earlier ones.
    pub fn from_files(paths: &[PathBuf]) -> Result<Self> {
        let mut builder = Config::builder();
        for path in paths {
            debug!(path = %path.display(), "Loading settings file");
            builder = builder.add_source(config::File::from(path.as_path()).format(FileFormat::Toml));
        }

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Profile selected by `--profile`, then `default_profile`, then "default".
    pub fn profile(&self, name: Option<&str>) -> Option<&ProfileConfig> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles.as_ref().and_then(|p| p.get(name))
    }
}

fn find_local_config(start: &Path) -> Option<PathBuf> {
    let mut current_dir = start.to_path_buf();
    loop {
        let candidate = current_dir.join(crate::constants::LOCAL_CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current_dir.pop() {
            return None;
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir().map(|h| h.join(".config"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
    }
}

/// Pick the token from the flag, then `GITHUB_TOKEN_ORG`, then `GITHUB_TOKEN`.
pub fn resolve_token(
    flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    let from_flag = flag.map(str::trim).filter(|t| !t.is_empty());
    if let Some(token) = from_flag {
        return Ok(token.to_string());
    }

    crate::constants::TOKEN_ENV_VARS
        .iter()
        .filter_map(|var| env(var))
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .context(
            "GitHub token must be provided via --token or the GITHUB_TOKEN_ORG / GITHUB_TOKEN environment variable",
        )
}

/// Turn the requested endpoint kind and GHES URL into a concrete endpoint.
///
/// Without an explicit kind a configured GHES URL selects GHES.
pub fn resolve_endpoint(kind: Option<EndpointKind>, ghes_url: Option<&str>) -> Result<Endpoint> {
    let ghes_url = ghes_url
        .map(|u| u.trim().trim_end_matches('/'))
        .filter(|u| !u.is_empty());

    match (kind, ghes_url) {
        (Some(EndpointKind::Ghec), _) => Ok(Endpoint::Cloud),
        (Some(EndpointKind::Ghes), Some(url)) | (None, Some(url)) => {
            Ok(Endpoint::Server(url.to_string()))
        }
        (Some(EndpointKind::Ghes), None) => {
            bail!("Set --ghes-url or GHES_URL when the endpoint is GHES")
        }
        (None, None) => Ok(Endpoint::Cloud),
    }
}
