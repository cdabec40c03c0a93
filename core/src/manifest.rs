use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const HEADER: &str = "# Skills manifest - managed by skillsctl\n# Do not edit manually\n";

/// The set of skill ids selected for a project.
///
/// Stored one id per line; blank lines and `#` comments are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    skill_ids: BTreeSet<String>,
}

impl Manifest {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skill_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads a manifest; a missing file yields an empty one.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Manifest does not exist: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;

        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        for id in &self.skill_ids {
            out.push_str(id);
            out.push('\n');
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        fs::write(path, self.render())
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;

        tracing::debug!(skills = self.len(), path = %path.display(), "Manifest saved");
        Ok(())
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.skill_ids.iter().map(String::as_str)
    }

    pub fn add(&mut self, id: impl Into<String>) -> bool {
        self.skill_ids.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.skill_ids.remove(id)
    }

    pub fn set<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skill_ids = ids.into_iter().map(Into::into).collect();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.skill_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.skill_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skill_ids.is_empty()
    }
}
