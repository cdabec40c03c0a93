use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitStatus {
    pub is_repo: bool,
    pub is_dirty: bool,
    pub git_version: String,
    pub has_sparse_checkout: bool,
}

/// Version-control operations needed to vendor a skills repository.
///
/// Paths are relative to the project root unless stated otherwise.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Installed version, `"unknown"` if unparseable, `"not installed"` if missing.
    async fn version(&self) -> String;

    async fn is_repo(&self) -> bool;

    async fn status(&self) -> GitStatus;

    async fn submodule_add(&self, url: &str, path: &Path, branch: &str) -> anyhow::Result<()>;

    /// Initializes and updates a submodule with a shallow clone.
    async fn submodule_init(&self, path: &Path, depth: u32) -> anyhow::Result<()>;

    async fn submodule_exists(&self, path: &Path) -> bool;

    async fn submodule_is_dirty(&self, path: &Path) -> bool;

    /// Enables cone-mode sparse-checkout inside the submodule.
    async fn sparse_checkout_init(&self, path: &Path) -> anyhow::Result<()>;

    async fn has_sparse_checkout(&self, path: &Path) -> bool;

    async fn sparse_checkout_set(&self, path: &Path, dirs: &[String]) -> anyhow::Result<()>;

    async fn stage_files(&self, files: &[PathBuf]) -> anyhow::Result<()>;
}
