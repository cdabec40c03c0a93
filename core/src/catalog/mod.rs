pub mod record;
pub mod scoring;

pub use record::{ScoredResult, SkillRecord};
pub use scoring::Query;

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CatalogError;

/// Location of the catalog document inside the skills repository.
pub fn catalog_path(skills_dir: &Path) -> PathBuf {
    skills_dir.join("catalog").join("skills.json")
}

/// Read-only collection of skill records, in load order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    skills: Vec<SkillRecord>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from typed records. Later duplicates of an id are dropped.
    pub fn new(records: impl IntoIterator<Item = SkillRecord>) -> Self {
        let mut skills = Vec::new();
        let mut by_id = HashMap::new();

        for record in records {
            if by_id.contains_key(&record.id) {
                tracing::warn!(id = %record.id, "Skipping duplicate catalog entry");
                continue;
            }
            by_id.insert(record.id.clone(), skills.len());
            skills.push(record);
        }

        Self { skills, by_id }
    }

    /// Builds a catalog from a decoded catalog document.
    ///
    /// The document must be an array; entries that do not parse as a
    /// [`SkillRecord`] are skipped rather than failing the whole load.
    pub fn from_value(document: &Value) -> Result<Self, CatalogError> {
        let entries = document.as_array().ok_or(CatalogError::Format)?;

        let records: Vec<SkillRecord> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let record = SkillRecord::from_entry(entry);
                if record.is_none() {
                    tracing::debug!(index, "Skipping malformed catalog entry");
                }
                record
            })
            .collect();

        let skipped = entries.len() - records.len();
        let catalog = Self::new(records);
        tracing::debug!(loaded = catalog.len(), skipped, "Catalog built");

        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_str(content)?;
        Self::from_value(&document)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json_str(&content)?;
        tracing::info!(
            skills = catalog.len(),
            path = %path.display(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Exact, case-sensitive lookup by primary id.
    pub fn get(&self, id: &str) -> Option<&SkillRecord> {
        self.by_id.get(id).map(|&idx| &self.skills[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn list_all(&self) -> &[SkillRecord] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Returns at most `limit` records matching `query`, best first.
    ///
    /// Ties are broken by ascending id, so the ordering does not depend on
    /// the order records were loaded in.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<ScoredResult> {
        if limit == 0 {
            return vec![];
        }

        let query = Query::parse(query);

        let mut scored: Vec<ScoredResult> = self
            .skills
            .iter()
            .filter_map(|skill| {
                let score = query.score(skill);
                (score > 0).then(|| ScoredResult {
                    skill: skill.clone(),
                    score,
                })
            })
            .collect();

        scored.sort_by(scoring::rank);
        scored.truncate(limit);
        scored
    }
}
