use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in catalog: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Catalog must be a JSON array")]
    Format,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No skills repository URL configured.\n\
         Set SKILLS_REPO_URL environment variable or create \
         .claude/skills.config.json with 'repo_url' field."
    )]
    MissingRepoUrl,
}
