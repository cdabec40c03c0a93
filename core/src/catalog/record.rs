use serde::{Deserialize, Serialize};
use serde_json::Value;

const SUMMARY_MAX_CHARS: usize = 80;

/// One entry of the skills catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub paths: Vec<String>,
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    paths: Vec<String>,
    #[serde(default)]
    aliases: Vec<String>,
}

impl SkillRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            tags: vec![],
            paths: vec![],
            aliases: vec![],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Parses one loosely-typed catalog entry.
    ///
    /// Returns `None` for anything that is not an object with non-empty string
    /// `id` and `title`, or whose optional fields have the wrong shape.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        if !entry.is_object() {
            return None;
        }

        let raw: RawEntry = serde_json::from_value(entry.clone()).ok()?;
        if raw.id.is_empty() || raw.title.is_empty() {
            return None;
        }

        Some(Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            tags: raw.tags,
            paths: raw.paths,
            aliases: raw.aliases,
        })
    }

    /// First line of the description, cut to 80 characters.
    pub fn summary_line(&self) -> &str {
        let first = self.description.lines().next().unwrap_or("");
        match first.char_indices().nth(SUMMARY_MAX_CHARS) {
            Some((idx, _)) => &first[..idx],
            None => first,
        }
    }

    pub fn tags_display(&self) -> String {
        if self.tags.is_empty() {
            "(no tags)".to_string()
        } else {
            self.tags.join(", ")
        }
    }
}

/// A record paired with its relevance score for one query. Score is always >= 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub skill: SkillRecord,
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_entry() {
        let entry = json!({
            "id": "pdf",
            "title": "PDF Tools",
            "description": "Read and write PDFs",
            "tags": ["document"],
            "paths": ["skills/pdf"],
            "aliases": ["acrobat"],
            "homepage": "ignored"
        });

        let record = SkillRecord::from_entry(&entry).unwrap();
        assert_eq!(record.id, "pdf");
        assert_eq!(record.tags, vec!["document"]);
        assert_eq!(record.paths, vec!["skills/pdf"]);
        assert_eq!(record.aliases, vec!["acrobat"]);
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let record = SkillRecord::from_entry(&json!({"id": "a", "title": "A"})).unwrap();
        assert_eq!(record.description, "");
        assert!(record.tags.is_empty());
        assert!(record.paths.is_empty());
        assert!(record.aliases.is_empty());
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(SkillRecord::from_entry(&json!("pdf")).is_none());
        assert!(SkillRecord::from_entry(&json!(["pdf"])).is_none());
        assert!(SkillRecord::from_entry(&json!({"id": "pdf"})).is_none());
        assert!(SkillRecord::from_entry(&json!({"title": "PDF"})).is_none());
        assert!(SkillRecord::from_entry(&json!({"id": "", "title": "PDF"})).is_none());
        assert!(SkillRecord::from_entry(&json!({"id": 7, "title": "PDF"})).is_none());
        assert!(
            SkillRecord::from_entry(&json!({"id": "pdf", "title": "PDF", "tags": "document"}))
                .is_none()
        );
    }

    #[test]
    fn summary_line_takes_first_line_and_truncates() {
        let record = SkillRecord::new("a", "A").with_description("short line\nsecond line");
        assert_eq!(record.summary_line(), "short line");

        let long = "x".repeat(120);
        let record = SkillRecord::new("a", "A").with_description(long);
        assert_eq!(record.summary_line().chars().count(), 80);
    }

    #[test]
    fn scored_result_serializes_flat() {
        let scored = ScoredResult {
            skill: SkillRecord::new("test", "Test"),
            score: 50,
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["id"], "test");
        assert_eq!(value["score"], 50);
        assert_eq!(value["tags"], json!([]));
    }
}
