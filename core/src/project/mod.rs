pub mod plan;

pub use plan::SelectionPlan;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::{self, Catalog};
use crate::config::Config;
use crate::manifest::Manifest;
use crate::traits::Vcs;

/// Sparse-checkout always keeps the catalog itself.
pub const CATALOG_DIR: &str = "catalog";

const SHALLOW_DEPTH: u32 = 1;

/// Which command's changes to stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Install,
    Remove,
    Set,
    Sync,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NoSubmodule,
    Synced { skills: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub selected_ids: Vec<String>,
    pub manifest_path: String,
    pub submodule_present: bool,
    pub submodule_dirty: bool,
    pub git_version: String,
    pub is_repo: bool,
}

/// A host project with its configuration, selected skills and vendored catalog.
pub struct Project {
    root: PathBuf,
    config: Config,
    vcs: Arc<dyn Vcs>,
    manifest: Manifest,
    catalog: Option<Catalog>,
}

impl Project {
    /// Loads the manifest and, if one is present and valid, the catalog.
    pub fn open(root: impl AsRef<Path>, config: Config, vcs: Arc<dyn Vcs>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest = Manifest::load(&root.join(&config.manifest_path))?;

        let mut project = Self {
            root,
            config,
            vcs,
            manifest,
            catalog: None,
        };
        project.catalog = project.load_catalog_lenient();

        Ok(project)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn skills_dir(&self) -> &Path {
        &self.config.skills_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.manifest_path)
    }

    pub fn catalog_path(&self) -> PathBuf {
        catalog::catalog_path(&self.root.join(&self.config.skills_dir))
    }

    /// The catalog, for commands that only read it.
    pub fn require_catalog(&self) -> Result<&Catalog> {
        self.catalog
            .as_ref()
            .context("Catalog not found. Run 'skillsctl sync' first.")
    }

    fn load_catalog_lenient(&self) -> Option<Catalog> {
        let path = self.catalog_path();
        if !path.exists() {
            return None;
        }
        match Catalog::load(&path) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                tracing::warn!("Ignoring catalog: {}", e);
                None
            }
        }
    }

    /// Re-reads the catalog from the submodule; a present but broken catalog is an error.
    pub fn reload_catalog(&mut self) -> Result<&Catalog> {
        let path = self.catalog_path();
        if path.exists() {
            self.catalog = Some(Catalog::load(&path)?);
        }
        self.catalog
            .as_ref()
            .context("Catalog not found in skills repository")
    }

    /// Adds and shallow-clones the skills submodule if missing. Returns whether it was created.
    pub async fn ensure_submodule(&self) -> Result<bool> {
        let path = self.skills_dir();
        if self.vcs.submodule_exists(path).await {
            return Ok(false);
        }

        tracing::info!(path = %path.display(), url = %self.config.repo_url, "Setting up skills submodule");
        self.vcs
            .submodule_add(&self.config.repo_url, path, &self.config.branch)
            .await
            .context("Error setting up submodule")?;
        self.vcs
            .submodule_init(path, SHALLOW_DEPTH)
            .await
            .context("Error setting up submodule")?;
        self.vcs
            .sparse_checkout_init(path)
            .await
            .context("Error setting up submodule")?;

        Ok(true)
    }

    pub async fn ensure_clean(&self) -> Result<()> {
        if self.vcs.submodule_is_dirty(self.skills_dir()).await {
            anyhow::bail!("Submodule has uncommitted changes. Commit or discard them first.");
        }
        Ok(())
    }

    fn validate_ids<'a>(&self, ids: &'a [String]) -> Result<Vec<&'a str>> {
        let catalog = self
            .catalog
            .as_ref()
            .context("Catalog not found in skills repository")?;

        let unknown: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !catalog.contains(id))
            .collect();
        if !unknown.is_empty() {
            anyhow::bail!("Unknown skill IDs: {}", unknown.join(", "));
        }

        Ok(ids.iter().map(String::as_str).collect())
    }

    pub fn plan_install(&self, ids: &[String]) -> Result<SelectionPlan> {
        let ids = self.validate_ids(ids)?;
        Ok(SelectionPlan::install(&self.manifest, ids))
    }

    pub fn plan_remove(&self, ids: &[String]) -> SelectionPlan {
        SelectionPlan::remove(&self.manifest, ids.iter().map(String::as_str))
    }

    pub fn plan_set(&self, ids: &[String]) -> Result<SelectionPlan> {
        let ids = self.validate_ids(ids)?;
        Ok(SelectionPlan::replace(&self.manifest, ids))
    }

    /// Sparse-checkout directories for the current selection.
    ///
    /// Ids missing from the catalog contribute nothing.
    pub fn sparse_paths(&self) -> Vec<String> {
        let mut paths = vec![CATALOG_DIR.to_string()];
        let Some(catalog) = &self.catalog else {
            return paths;
        };

        for id in self.manifest.ids() {
            if let Some(skill) = catalog.get(id) {
                for path in &skill.paths {
                    if !paths.contains(path) {
                        paths.push(path.clone());
                    }
                }
            }
        }
        paths
    }

    async fn apply_sparse_checkout(&self) -> Result<()> {
        let paths = self.sparse_paths();
        tracing::debug!(paths = ?paths, "Updating sparse-checkout");
        self.vcs
            .sparse_checkout_set(self.skills_dir(), &paths)
            .await
            .context("Error updating sparse-checkout")
    }

    /// Applies a plan: manifest in memory, then sparse-checkout, then the manifest file.
    pub async fn apply(&mut self, plan: &SelectionPlan) -> Result<()> {
        plan.apply_to(&mut self.manifest);
        self.apply_sparse_checkout().await?;
        self.manifest.save(&self.manifest_path())?;

        tracing::info!(
            added = plan.to_add.len(),
            removed = plan.to_remove.len(),
            selected = self.manifest.len(),
            "Skill selection updated"
        );
        Ok(())
    }

    /// Re-applies the manifest to an existing submodule.
    pub async fn sync(&mut self) -> Result<SyncOutcome> {
        let path = self.skills_dir().to_path_buf();
        if !self.vcs.submodule_exists(&path).await {
            return Ok(SyncOutcome::NoSubmodule);
        }

        self.vcs
            .submodule_init(&path, SHALLOW_DEPTH)
            .await
            .context("Error updating submodule")?;

        if !self.vcs.has_sparse_checkout(&path).await {
            self.vcs.sparse_checkout_init(&path).await?;
        }

        if self.catalog_path().exists() {
            self.reload_catalog()?;
        }

        self.apply_sparse_checkout().await?;

        Ok(SyncOutcome::Synced {
            skills: self.manifest.ids().map(str::to_string).collect(),
        })
    }

    pub fn stage_paths(&self, kind: StageKind) -> Vec<PathBuf> {
        let gitmodules = PathBuf::from(".gitmodules");
        let skills_dir = self.config.skills_dir.clone();
        let manifest = self.config.manifest_path.clone();

        match kind {
            StageKind::Install | StageKind::Set => vec![gitmodules, skills_dir, manifest],
            StageKind::Remove => vec![skills_dir, manifest],
            StageKind::Sync => vec![skills_dir],
        }
    }

    pub async fn stage(&self, kind: StageKind) -> Result<()> {
        self.vcs
            .stage_files(&self.stage_paths(kind))
            .await
            .context("Error staging changes")
    }

    pub async fn status(&self) -> StatusReport {
        let git = self.vcs.status().await;
        let path = self.skills_dir();

        let submodule_present = self.vcs.submodule_exists(path).await;
        let submodule_dirty = submodule_present && self.vcs.submodule_is_dirty(path).await;

        StatusReport {
            selected_ids: self.manifest.ids().map(str::to_string).collect(),
            manifest_path: self.manifest_path().display().to_string(),
            submodule_present,
            submodule_dirty,
            git_version: git.git_version,
            is_repo: git.is_repo,
        }
    }
}
