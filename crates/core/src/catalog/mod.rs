//! Game catalog - the synchronized list of downloadable archives.
//!
//! The catalog is a single `games` table that is dropped and rebuilt on
//! every sync. Reads before the first sync report [`CatalogError::NotPopulated`].

mod sqlite;
mod types;

pub use sqlite::SqliteGameCatalog;
pub use types::*;

/// Trait for game catalog storage.
pub trait GameCatalog: Send + Sync {
    /// Drop the games table if it exists and create it empty.
    fn reset_schema(&self) -> Result<(), CatalogError>;

    /// Insert entries in order.
    ///
    /// Stops at the first failing row and returns its error; rows inserted
    /// before it are kept. Returns the number of rows inserted.
    fn insert_all(&self, entries: &[NewGameEntry]) -> Result<usize, CatalogError>;

    /// Read entries, optionally filtered by system and capped by limit.
    fn query(&self, query: &GameQuery) -> Result<Vec<GameEntry>, CatalogError>;

    /// Count entries, optionally for a single system.
    fn count(&self, system: Option<&str>) -> Result<u64, CatalogError>;
}
