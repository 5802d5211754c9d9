pub const GHCS_IDENTIFIER: &str = "ghcs";
pub const CONFIG_DIR_NAME: &str = GHCS_IDENTIFIER;
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_FILE_NAME: &str = ".ghcs.toml";

pub const CLOUD_API_URL: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";
pub const ACCEPT_HEADER: &str = "application/vnd.github+json";
pub const USER_AGENT: &str = "ghcs-cli";

/// Page size for every numbered-page listing.
pub const PER_PAGE: usize = 100;

pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN_ORG", "GITHUB_TOKEN"];

// Output defaults
pub const DEFAULT_REPOS_OUTPUT: &str = "repos.yaml";
pub const OUTPUT_WORKSPACE_DIR: &str = "workspace";
