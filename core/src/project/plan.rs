use serde::Serialize;
use std::collections::BTreeSet;

use crate::manifest::Manifest;

/// Pending change to the selected skill set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionPlan {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
    /// Requested ids that need no change: already selected on install,
    /// not selected on remove.
    pub unchanged: Vec<String>,
}

impl SelectionPlan {
    pub fn install<'a>(manifest: &Manifest, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut plan = Self::default();
        for id in dedup(ids) {
            if manifest.contains(id) {
                plan.unchanged.push(id.to_string());
            } else {
                plan.to_add.push(id.to_string());
            }
        }
        plan
    }

    pub fn remove<'a>(manifest: &Manifest, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut plan = Self::default();
        for id in dedup(ids) {
            if manifest.contains(id) {
                plan.to_remove.push(id.to_string());
            } else {
                plan.unchanged.push(id.to_string());
            }
        }
        plan
    }

    pub fn replace<'a>(manifest: &Manifest, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let wanted: BTreeSet<&str> = ids.into_iter().collect();
        let current: BTreeSet<&str> = manifest.ids().collect();

        Self {
            to_add: wanted.difference(&current).map(|s| s.to_string()).collect(),
            to_remove: current.difference(&wanted).map(|s| s.to_string()).collect(),
            unchanged: wanted.intersection(&current).map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    pub fn apply_to(&self, manifest: &mut Manifest) {
        for id in &self.to_remove {
            manifest.remove(id);
        }
        for id in &self.to_add {
            manifest.add(id.clone());
        }
    }
}

fn dedup<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_skips_selected_and_duplicates() {
        let manifest = Manifest::new(["pdf"]);
        let plan = SelectionPlan::install(&manifest, ["xlsx", "pdf", "xlsx", "docx"]);
        assert_eq!(plan.to_add, vec!["xlsx", "docx"]);
        assert_eq!(plan.unchanged, vec!["pdf"]);
        assert!(plan.to_remove.is_empty());
    }

    #[test]
    fn remove_reports_unselected() {
        let manifest = Manifest::new(["pdf", "xlsx"]);
        let plan = SelectionPlan::remove(&manifest, ["pdf", "ghost"]);
        assert_eq!(plan.to_remove, vec!["pdf"]);
        assert_eq!(plan.unchanged, vec!["ghost"]);
    }

    #[test]
    fn replace_diffs_against_current() {
        let mut manifest = Manifest::new(["pdf", "xlsx"]);
        let plan = SelectionPlan::replace(&manifest, ["xlsx", "docx"]);
        assert_eq!(plan.to_add, vec!["docx"]);
        assert_eq!(plan.to_remove, vec!["pdf"]);

        plan.apply_to(&mut manifest);
        assert_eq!(manifest.ids().collect::<Vec<_>>(), vec!["docx", "xlsx"]);
    }

    #[test]
    fn identical_selection_is_empty() {
        let manifest = Manifest::new(["pdf"]);
        assert!(SelectionPlan::replace(&manifest, ["pdf"]).is_empty());
        assert!(SelectionPlan::install(&manifest, ["pdf"]).is_empty());
    }
}
