use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const REPO_URL_ENV: &str = "SKILLS_REPO_URL";
pub const BRANCH_ENV: &str = "SKILLS_REPO_BRANCH";

const CLAUDE_DIR: &str = ".claude";
const CONFIG_FILE: &str = "skills.config.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub repo_url: String,
    pub branch: String,
    pub skills_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repo_url: String::new(),
            branch: "main".to_string(),
            skills_dir: PathBuf::from(CLAUDE_DIR).join("skills"),
            manifest_path: PathBuf::from(CLAUDE_DIR).join("skills.manifest"),
            config_path: PathBuf::from(CLAUDE_DIR).join(CONFIG_FILE),
        }
    }
}

/// On-disk shape of `.claude/skills.config.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skills_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manifest_path: Option<PathBuf>,
}

pub fn get_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CLAUDE_DIR).join(CONFIG_FILE)
}

impl Config {
    /// Loads configuration using the process environment.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        Self::load_with(project_root, |key| std::env::var(key).ok())
    }

    /// Environment values take precedence over the project file, which takes
    /// precedence over defaults. Empty environment values count as unset.
    pub fn load_with<F>(project_root: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = get_config_path(project_root);
        let file = match read_config_file(&config_path) {
            Ok(file) => file.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Ignoring config {}: {:#}", config_path.display(), e);
                ConfigFile::default()
            }
        };
        let env = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mut config = Config::default();

        if let Some(skills_dir) = file.skills_dir {
            config.skills_dir = skills_dir;
        }
        if let Some(manifest_path) = file.manifest_path {
            config.manifest_path = manifest_path;
        }
        if let Some(branch) = env(BRANCH_ENV).or(file.branch) {
            config.branch = branch;
        }

        config.repo_url = env(REPO_URL_ENV)
            .or(file.repo_url)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingRepoUrl)?;

        Ok(config)
    }

    pub fn save(&self, project_root: &Path) -> Result<()> {
        let config_path = get_config_path(project_root);
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let file = ConfigFile {
            repo_url: Some(self.repo_url.clone()),
            branch: Some(self.branch.clone()),
            ..Default::default()
        };
        let mut content = serde_json::to_string_pretty(&file)
            .with_context(|| "Failed to serialize config to JSON")?;
        content.push('\n');

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file = serde_json::from_str(&content).with_context(|| "Invalid JSON in config file")?;

    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(root: &Path, content: &str) {
        let dir = root.join(".claude");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("skills.config.json"), content).unwrap();
    }

    #[test]
    fn load_from_env() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_with(
            tmp.path(),
            env_of(&[
                (REPO_URL_ENV, "https://github.com/test/skills.git"),
                (BRANCH_ENV, "develop"),
            ]),
        )
        .unwrap();

        assert_eq!(config.repo_url, "https://github.com/test/skills.git");
        assert_eq!(config.branch, "develop");
        assert_eq!(config.skills_dir, PathBuf::from(".claude/skills"));
    }

    #[test]
    fn load_from_file() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"{"repo_url": "https://github.com/project/skills.git", "branch": "stable"}"#,
        );

        let config = Config::load_with(tmp.path(), env_of(&[])).unwrap();
        assert_eq!(config.repo_url, "https://github.com/project/skills.git");
        assert_eq!(config.branch, "stable");
    }

    #[test]
    fn env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"{"repo_url": "https://github.com/file/skills.git", "branch": "file-branch"}"#,
        );

        let config = Config::load_with(
            tmp.path(),
            env_of(&[
                (REPO_URL_ENV, "https://github.com/env/skills.git"),
                (BRANCH_ENV, "env-branch"),
            ]),
        )
        .unwrap();
        assert_eq!(config.repo_url, "https://github.com/env/skills.git");
        assert_eq!(config.branch, "env-branch");
    }

    #[test]
    fn file_can_relocate_skills_dir() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"{"repo_url": "u", "skills_dir": "vendor/skills", "manifest_path": "skills.txt"}"#,
        );

        let config = Config::load_with(tmp.path(), env_of(&[])).unwrap();
        assert_eq!(config.skills_dir, PathBuf::from("vendor/skills"));
        assert_eq!(config.manifest_path, PathBuf::from("skills.txt"));
    }

    #[test]
    fn missing_repo_url_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load_with(tmp.path(), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRepoUrl));
        assert!(err.to_string().contains("No skills repository URL"));
    }

    #[test]
    fn invalid_file_is_ignored() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "{not json");

        let config =
            Config::load_with(tmp.path(), env_of(&[(REPO_URL_ENV, "https://x/skills.git")]))
                .unwrap();
        assert_eq!(config.branch, "main");
    }

    #[test]
    fn save_writes_repo_and_branch() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            repo_url: "https://github.com/test/skills.git".to_string(),
            branch: "feature".to_string(),
            ..Default::default()
        };
        config.save(tmp.path()).unwrap();

        let content = std::fs::read_to_string(get_config_path(tmp.path())).unwrap();
        assert!(content.ends_with('\n'));
        let data: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(data["repo_url"], "https://github.com/test/skills.git");
        assert_eq!(data["branch"], "feature");

        let reloaded = Config::load_with(tmp.path(), env_of(&[])).unwrap();
        assert_eq!(reloaded, config);
    }
}
