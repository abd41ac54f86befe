//! Types for the game catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    /// Surrogate id assigned on insert.
    pub id: i64,
    /// Game title (archive name without the `.zip` suffix).
    pub title: String,
    /// Platform key (e.g., "gba", "snes").
    pub system: String,
    /// Where to download the archive from.
    pub download_url: String,
}

/// An entry waiting to be inserted (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameEntry {
    pub title: String,
    pub system: String,
    pub download_url: String,
}

impl NewGameEntry {
    pub fn new(
        title: impl Into<String>,
        system: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            system: system.into(),
            download_url: download_url.into(),
        }
    }
}

/// Query for reading the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameQuery {
    /// Only return entries for this system.
    #[serde(default)]
    pub system: Option<String>,
    /// Maximum rows; `None` or 0 returns everything.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl GameQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The system filter, treating an empty string as "all systems".
    pub fn system_filter(&self) -> Option<&str> {
        self.system.as_deref().filter(|s| !s.is_empty())
    }

    /// The row cap, treating 0 as "no limit".
    pub fn effective_limit(&self) -> Option<u32> {
        self.limit.filter(|&l| l > 0)
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The games table does not exist; no sync has run yet.
    #[error("Database is not populated")]
    NotPopulated,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_query_default_is_unfiltered() {
        let query = GameQuery::new();
        assert!(query.system_filter().is_none());
        assert!(query.effective_limit().is_none());
    }

    #[test]
    fn test_game_query_empty_system_means_all() {
        let query = GameQuery::new().with_system("");
        assert!(query.system_filter().is_none());
    }

    #[test]
    fn test_game_query_zero_limit_means_all() {
        assert!(GameQuery::new().with_limit(0).effective_limit().is_none());
        assert_eq!(GameQuery::new().with_limit(5).effective_limit(), Some(5));
    }

    #[test]
    fn test_game_entry_serialization() {
        let entry = GameEntry {
            id: 7,
            title: "Metroid Fusion (USA)".to_string(),
            system: "gba".to_string(),
            download_url: "https://example.com/Metroid%20Fusion%20(USA).zip".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Metroid Fusion (USA)");
        assert_eq!(json["system"], "gba");
        assert!(json["download_url"].as_str().unwrap().ends_with(".zip"));
    }

    #[test]
    fn test_not_populated_message() {
        assert_eq!(
            CatalogError::NotPopulated.to_string(),
            "Database is not populated"
        );
    }
}
