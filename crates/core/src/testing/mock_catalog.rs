//! Mock game catalog for testing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::catalog::{
    CatalogError, GameCatalog, GameEntry, GameQuery, NewGameEntry, SqliteGameCatalog,
};

/// Mock implementation of the GameCatalog trait.
///
/// Backed by an in-memory SQLite catalog, with controllable failures:
/// - Fail schema resets
/// - Fail inserts for specific systems
/// - Fail reads (`query` and `count`)
/// - Count schema resets for assertions
///
/// Injected failures surface as [`CatalogError::Database`].
///
/// # Example
///
/// ```rust,ignore
/// use retrodrop_core::testing::MockGameCatalog;
///
/// let catalog = MockGameCatalog::new();
/// catalog.fail_insert_for("snes", "disk full");
///
/// assert!(catalog.insert_all(&[fixtures::game_entry("Chrono Trigger", "snes")]).is_err());
/// ```
pub struct MockGameCatalog {
    inner: SqliteGameCatalog,
    reset_error: Arc<Mutex<Option<String>>>,
    insert_errors: Arc<Mutex<HashSet<String>>>,
    insert_error_message: Arc<Mutex<String>>,
    read_error: Arc<Mutex<Option<String>>>,
    resets: AtomicUsize,
}

impl MockGameCatalog {
    /// Create a new, unpopulated mock catalog.
    pub fn new() -> Self {
        Self {
            inner: SqliteGameCatalog::in_memory().expect("in-memory catalog"),
            reset_error: Arc::new(Mutex::new(None)),
            insert_errors: Arc::new(Mutex::new(HashSet::new())),
            insert_error_message: Arc::new(Mutex::new(String::new())),
            read_error: Arc::new(Mutex::new(None)),
            resets: AtomicUsize::new(0),
        }
    }

    /// Fail every `reset_schema` call with `message`.
    pub fn fail_reset(&self, message: &str) {
        *self.reset_error.lock().unwrap() = Some(message.to_string());
    }

    /// Fail `insert_all` for batches containing `system` entries.
    ///
    /// Entries before the first `system` entry in the batch are kept.
    pub fn fail_insert_for(&self, system: &str, message: &str) {
        self.insert_errors.lock().unwrap().insert(system.to_string());
        *self.insert_error_message.lock().unwrap() = message.to_string();
    }

    /// Fail every `query` and `count` call with `message`.
    pub fn fail_reads(&self, message: &str) {
        *self.read_error.lock().unwrap() = Some(message.to_string());
    }

    /// Number of `reset_schema` calls, including failed ones.
    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    fn read_error(&self) -> Option<CatalogError> {
        self.read_error
            .lock()
            .unwrap()
            .clone()
            .map(CatalogError::Database)
    }
}

impl Default for MockGameCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GameCatalog for MockGameCatalog {
    fn reset_schema(&self) -> Result<(), CatalogError> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.reset_error.lock().unwrap().clone() {
            return Err(CatalogError::Database(message));
        }
        self.inner.reset_schema()
    }

    fn insert_all(&self, entries: &[NewGameEntry]) -> Result<usize, CatalogError> {
        let failing = {
            let systems = self.insert_errors.lock().unwrap();
            entries.iter().position(|e| systems.contains(&e.system))
        };

        match failing {
            Some(index) => {
                self.inner.insert_all(&entries[..index])?;
                Err(CatalogError::Database(
                    self.insert_error_message.lock().unwrap().clone(),
                ))
            }
            None => self.inner.insert_all(entries),
        }
    }

    fn query(&self, query: &GameQuery) -> Result<Vec<GameEntry>, CatalogError> {
        match self.read_error() {
            Some(e) => Err(e),
            None => self.inner.query(query),
        }
    }

    fn count(&self, system: Option<&str>) -> Result<u64, CatalogError> {
        match self.read_error() {
            Some(e) => Err(e),
            None => self.inner.count(system),
        }
    }
}
