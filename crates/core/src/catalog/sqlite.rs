//! SQLite-backed game catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use tracing::debug;

use super::{CatalogError, GameCatalog, GameEntry, GameQuery, NewGameEntry};

/// SQLite-backed game catalog.
pub struct SqliteGameCatalog {
    conn: Mutex<Connection>,
}

impl SqliteGameCatalog {
    /// Open (or create) the database file.
    ///
    /// The games table is not created here; it only exists once a sync has
    /// reset the schema.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection lock poisoned".to_string()))
    }

    fn table_exists(conn: &Connection) -> Result<bool, CatalogError> {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'games'",
                [],
                |row| row.get(0),
            )
            .map_err(map_db_error)?;
        Ok(count > 0)
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<GameEntry> {
        Ok(GameEntry {
            id: row.get(0)?,
            title: row.get(1)?,
            system: row.get(2)?,
            download_url: row.get(3)?,
        })
    }
}

/// Map a rusqlite error, recognising a missing games table.
fn map_db_error(e: rusqlite::Error) -> CatalogError {
    match &e {
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("no such table") => {
            CatalogError::NotPopulated
        }
        _ => CatalogError::Database(e.to_string()),
    }
}

impl GameCatalog for SqliteGameCatalog {
    fn reset_schema(&self) -> Result<(), CatalogError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tx.execute_batch(
            r#"
            DROP TABLE IF EXISTS games;

            CREATE TABLE games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                system TEXT NOT NULL,
                download_url TEXT NOT NULL
            );

            CREATE INDEX idx_games_system ON games(system);
            "#,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        tx.commit()
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        debug!("Catalog schema reset");
        Ok(())
    }

    fn insert_all(&self, entries: &[NewGameEntry]) -> Result<usize, CatalogError> {
        let mut conn = self.lock()?;
        // Committed even on failure: rows before the failing one are kept.
        let tx = conn.transaction().map_err(map_db_error)?;

        let mut inserted = 0;
        let mut failure = None;
        {
            let mut stmt = tx
                .prepare("INSERT INTO games (title, system, download_url) VALUES (?, ?, ?)")
                .map_err(map_db_error)?;

            for entry in entries {
                if let Err(e) = stmt.execute(params![&entry.title, &entry.system, &entry.download_url])
                {
                    failure = Some(map_db_error(e));
                    break;
                }
                inserted += 1;
            }
        }

        tx.commit().map_err(map_db_error)?;

        match failure {
            Some(e) => Err(e),
            None => Ok(inserted),
        }
    }

    fn query(&self, query: &GameQuery) -> Result<Vec<GameEntry>, CatalogError> {
        let conn = self.lock()?;
        if !Self::table_exists(&conn)? {
            return Err(CatalogError::NotPopulated);
        }

        let mut sql = "SELECT id, title, system, download_url FROM games".to_string();
        let mut args: Vec<Value> = Vec::new();

        if let Some(system) = query.system_filter() {
            sql.push_str(" WHERE system = ?");
            args.push(Value::Text(system.to_string()));
        }
        sql.push_str(" ORDER BY id");
        if let Some(limit) = query.effective_limit() {
            sql.push_str(" LIMIT ?");
            args.push(Value::Integer(limit as i64));
        }

        let mut stmt = conn.prepare(&sql).map_err(map_db_error)?;
        let rows = stmt
            .query_map(params_from_iter(args), Self::row_to_entry)
            .map_err(map_db_error)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(map_db_error)?);
        }
        Ok(entries)
    }

    fn count(&self, system: Option<&str>) -> Result<u64, CatalogError> {
        let conn = self.lock()?;
        if !Self::table_exists(&conn)? {
            return Err(CatalogError::NotPopulated);
        }

        let count: i64 = match system.filter(|s| !s.is_empty()) {
            Some(system) => conn.query_row(
                "SELECT COUNT(*) FROM games WHERE system = ?",
                params![system],
                |row| row.get(0),
            ),
            None => conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0)),
        }
        .map_err(map_db_error)?;

        Ok(count as u64)
    }
}
