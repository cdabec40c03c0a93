//! Deterministic relevance scoring of catalog records against a free-text query.
//!
//! Weights:
//! - id or alias equal to the query (case-insensitive): +100 each
//! - id or alias starting with the query: +40 each
//! - per query token: +20 if any tag contains it, +10 for the title, +5 for the description

use std::cmp::Ordering;

use super::record::{ScoredResult, SkillRecord};

pub const EXACT_MATCH: u32 = 100;
pub const PREFIX_MATCH: u32 = 40;
pub const TAG_MATCH: u32 = 20;
pub const TITLE_MATCH: u32 = 10;
pub const DESCRIPTION_MATCH: u32 = 5;

/// A lower-cased query and its alphanumeric tokens.
#[derive(Debug, Clone)]
pub struct Query {
    lower: String,
    tokens: Vec<String>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let tokens = tokenize(&lower);
        Self { lower, tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Scores one record. Zero means no rule matched.
    pub fn score(&self, skill: &SkillRecord) -> u32 {
        let mut score = self.identifier_score(&skill.id);

        for alias in &skill.aliases {
            score += self.identifier_score(alias);
        }

        let title = skill.title.to_lowercase();
        let description = skill.description.to_lowercase();
        let tags: Vec<String> = skill.tags.iter().map(|t| t.to_lowercase()).collect();

        for token in &self.tokens {
            if tags.iter().any(|tag| tag.contains(token.as_str())) {
                score += TAG_MATCH;
            }
            if title.contains(token.as_str()) {
                score += TITLE_MATCH;
            }
            if description.contains(token.as_str()) {
                score += DESCRIPTION_MATCH;
            }
        }

        score
    }

    // An empty query is a prefix of every identifier.
    fn identifier_score(&self, identifier: &str) -> u32 {
        let identifier = identifier.to_lowercase();
        if identifier == self.lower {
            EXACT_MATCH
        } else if identifier.starts_with(&self.lower) {
            PREFIX_MATCH
        } else {
            0
        }
    }
}

/// Splits on every run of characters that are not ASCII letters or digits.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Score descending, then id ascending.
pub fn rank(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.skill.id.cmp(&b.skill.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_punctuation_runs() {
        assert_eq!(tokenize("pdf-tools!!"), vec!["pdf", "tools"]);
        assert_eq!(tokenize("  a  b--c "), vec!["a", "b", "c"]);
        assert!(tokenize("!!!").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn non_ascii_letters_are_delimiters() {
        assert_eq!(tokenize("café au lait"), vec!["caf", "au", "lait"]);
    }

    #[test]
    fn exact_id_beats_prefix() {
        let query = Query::parse("pdf");
        assert_eq!(query.score(&SkillRecord::new("pdf", "Other")), 100);
        assert_eq!(query.score(&SkillRecord::new("pdf-advanced", "Other")), 40);
    }

    #[test]
    fn aliases_stack_independently() {
        let skill = SkillRecord::new("docs", "Other").with_aliases(["pdf", "PDF-x", "pdfs"]);
        assert_eq!(Query::parse("pdf").score(&skill), 100 + 40 + 40);
    }

    #[test]
    fn tag_match_counts_once_per_token() {
        let skill = SkillRecord::new("z", "Z").with_tags(["report", "reporting"]);
        assert_eq!(Query::parse("report").score(&skill), 20);
    }

    #[test]
    fn token_signals_accumulate() {
        let skill = SkillRecord::new("z", "Chart maker")
            .with_description("Builds a chart")
            .with_tags(["charts"]);
        assert_eq!(Query::parse("chart").score(&skill), 20 + 10 + 5);
    }

    #[test]
    fn each_token_contributes() {
        let skill = SkillRecord::new("z", "Image resize tool");
        assert_eq!(Query::parse("image resize").score(&skill), 20);
    }

    #[test]
    fn empty_query_prefixes_every_identifier() {
        let skill = SkillRecord::new("anything", "Title").with_aliases(["alt"]);
        assert_eq!(Query::parse("").score(&skill), 40 + 40);
    }

    #[test]
    fn rank_orders_by_score_then_id() {
        let a = ScoredResult {
            skill: SkillRecord::new("b", "B"),
            score: 10,
        };
        let b = ScoredResult {
            skill: SkillRecord::new("a", "A"),
            score: 10,
        };
        let c = ScoredResult {
            skill: SkillRecord::new("c", "C"),
            score: 30,
        };
        let mut results = vec![a, b, c];
        results.sort_by(rank);
        let ids: Vec<_> = results.iter().map(|r| r.skill.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
