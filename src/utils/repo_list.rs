use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// The YAML document written by `repos list`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RepoList {
    #[serde(default)]
    pub repositories: Vec<String>,
}

/// Split a blob on newlines, commas and semicolons.
///
/// Entries are trimmed; blanks and repeats are dropped, first occurrence
/// keeps its position.
pub fn parse_repo_list(content: &str) -> Vec<String> {
    dedupe(content.split(['\n', '\r', ',', ';']))
}

fn dedupe<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| seen.insert(entry.to_string()))
        .map(str::to_string)
        .collect()
}

/// Read repository names from a text list or a `repositories:` YAML file.
pub fn load_repo_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read repo file '{}'", path.display()))?;

    if content.trim().is_empty() {
        bail!("Repo file '{}' is empty", path.display());
    }

    let names = if is_yaml(path) {
        let list: RepoList = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse repo YAML '{}'", path.display()))?;
        dedupe(list.repositories.iter().map(String::as_str))
    } else {
        parse_repo_list(&content)
    };

    if names.is_empty() {
        bail!("Repo file '{}' contains no valid repositories", path.display());
    }

    Ok(names)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Write names as one comma-joined line, creating parent directories.
pub fn write_name_line(path: &Path, names: &[String]) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, format!("{}\n", names.join(",")))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write names as a `repositories:` YAML document.
pub fn write_repo_yaml(path: &Path, names: Vec<String>) -> Result<()> {
    let yaml = serde_yaml::to_string(&RepoList {
        repositories: names,
    })
    .context("Failed to serialize repository list")?;
    ensure_parent(path)?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
