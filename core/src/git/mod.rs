use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::traits::{GitStatus, Vcs};

/// [`Vcs`] backed by the `git` executable.
pub struct GitOps {
    project_root: PathBuf,
}

impl GitOps {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    async fn output(&self, args: &[&str], cwd: &Path) -> std::io::Result<Output> {
        tracing::debug!(args = ?args, cwd = %cwd.display(), "git");
        Command::new("git")
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .await
    }

    /// Runs git and fails on a non-zero exit status.
    async fn run(&self, args: &[&str], cwd: &Path) -> Result<String> {
        let output = self
            .output(args, cwd)
            .await
            .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;
        check_output(args, &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Runs git and reports whether it succeeded with non-empty stdout.
    async fn has_output(&self, args: &[&str], cwd: &Path) -> bool {
        match self.output(args, cwd).await {
            Ok(output) => {
                output.status.success() && !String::from_utf8_lossy(&output.stdout).trim().is_empty()
            }
            Err(_) => false,
        }
    }

    async fn succeeds(&self, args: &[&str], cwd: &Path) -> bool {
        matches!(self.output(args, cwd).await, Ok(output) if output.status.success())
    }
}

fn check_output(args: &[&str], output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        anyhow::bail!("git {} failed with status: {}", args.join(" "), output.status);
    }
    anyhow::bail!("git {} failed: {}", args.join(" "), stderr)
}

/// Extracts `X.Y.Z` from `git version X.Y.Z ...`.
pub fn parse_version(stdout: &str) -> Option<&str> {
    stdout.split_whitespace().nth(2)
}

/// Whether `.gitmodules` content declares a submodule at `path`.
pub fn gitmodules_declares(content: &str, path: &Path) -> bool {
    let wanted = path.to_string_lossy();
    content.lines().any(|line| {
        line.trim()
            .strip_prefix("path")
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('='))
            .is_some_and(|value| value.trim() == wanted)
    })
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[async_trait]
impl Vcs for GitOps {
    async fn version(&self) -> String {
        match self.output(&["--version"], &self.project_root).await {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                parse_version(&stdout).unwrap_or("unknown").to_string()
            }
            Ok(_) => "unknown".to_string(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => "not installed".to_string(),
            Err(_) => "unknown".to_string(),
        }
    }

    async fn is_repo(&self) -> bool {
        self.succeeds(&["rev-parse", "--git-dir"], &self.project_root)
            .await
    }

    async fn status(&self) -> GitStatus {
        let is_repo = self.is_repo().await;
        let git_version = self.version().await;

        let (is_dirty, has_sparse_checkout) = if is_repo {
            (
                self.has_output(&["status", "--porcelain"], &self.project_root)
                    .await,
                self.succeeds(&["sparse-checkout", "list"], &self.project_root)
                    .await,
            )
        } else {
            (false, false)
        };

        GitStatus {
            is_repo,
            is_dirty,
            git_version,
            has_sparse_checkout,
        }
    }

    async fn submodule_add(&self, url: &str, path: &Path, branch: &str) -> Result<()> {
        let path = path_arg(path);
        self.run(
            &["submodule", "add", "-b", branch, url, path.as_str()],
            &self.project_root,
        )
        .await?;
        tracing::info!(url, path = %path, branch, "Submodule added");
        Ok(())
    }

    async fn submodule_init(&self, path: &Path, depth: u32) -> Result<()> {
        let depth = format!("--depth={depth}");
        let path = path_arg(path);
        self.run(
            &["submodule", "update", "--init", depth.as_str(), "--", path.as_str()],
            &self.project_root,
        )
        .await?;
        Ok(())
    }

    async fn submodule_exists(&self, path: &Path) -> bool {
        let gitmodules = self.project_root.join(".gitmodules");
        match tokio::fs::read_to_string(&gitmodules).await {
            Ok(content) => gitmodules_declares(&content, path),
            Err(_) => false,
        }
    }

    async fn submodule_is_dirty(&self, path: &Path) -> bool {
        let submodule = self.project_root.join(path);
        if !submodule.exists() {
            return false;
        }
        self.has_output(&["status", "--porcelain"], &submodule)
            .await
    }

    async fn sparse_checkout_init(&self, path: &Path) -> Result<()> {
        let submodule = self.project_root.join(path);
        self.run(&["sparse-checkout", "init", "--cone"], &submodule)
            .await?;
        Ok(())
    }

    async fn has_sparse_checkout(&self, path: &Path) -> bool {
        let submodule = self.project_root.join(path);
        if !submodule.exists() {
            return false;
        }
        self.succeeds(&["sparse-checkout", "list"], &submodule)
            .await
    }

    async fn sparse_checkout_set(&self, path: &Path, dirs: &[String]) -> Result<()> {
        let submodule = self.project_root.join(path);
        let args = ["sparse-checkout", "set", "--stdin"];
        tracing::debug!(dirs = ?dirs, cwd = %submodule.display(), "git sparse-checkout set");

        let mut child = Command::new("git")
            .args(args)
            .current_dir(&submodule)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to execute git sparse-checkout set")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(dirs.join("\n").as_bytes())
                .await
                .context("Failed to write sparse-checkout paths")?;
        }

        let output = child
            .wait_with_output()
            .await
            .context("Failed to wait for git sparse-checkout set")?;
        check_output(&args, &output)
    }

    async fn stage_files(&self, files: &[PathBuf]) -> Result<()> {
        let files: Vec<String> = files.iter().map(|f| path_arg(f)).collect();
        let mut args = vec!["add"];
        args.extend(files.iter().map(String::as_str));
        self.run(&args, &self.project_root).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_git_version() {
        assert_eq!(parse_version("git version 2.43.0\n"), Some("2.43.0"));
        assert_eq!(
            parse_version("git version 2.39.3 (Apple Git-146)"),
            Some("2.39.3")
        );
        assert_eq!(parse_version("garbage"), None);
    }

    #[test]
    fn gitmodules_lookup_matches_exact_path() {
        let content = "[submodule \".claude/skills\"]\n\tpath = .claude/skills\n\turl = https://x/skills.git\n";
        assert!(gitmodules_declares(content, Path::new(".claude/skills")));
        assert!(!gitmodules_declares(content, Path::new(".claude")));
        assert!(!gitmodules_declares(content, Path::new("vendor/skills")));
    }

    #[tokio::test]
    async fn submodule_missing_without_gitmodules() {
        let tmp = TempDir::new().unwrap();
        let git = GitOps::new(tmp.path());
        assert!(!git.submodule_exists(Path::new(".claude/skills")).await);
    }

    #[tokio::test]
    async fn missing_submodule_dir_is_clean() {
        let tmp = TempDir::new().unwrap();
        let git = GitOps::new(tmp.path());
        assert!(!git.submodule_is_dirty(Path::new(".claude/skills")).await);
        assert!(!git.has_sparse_checkout(Path::new(".claude/skills")).await);
    }
}
