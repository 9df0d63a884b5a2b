//! SQLite key-value store for the builder working copy

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};

use super::KeyValueStore;

/// Busy timeout applied to every connection
const BUSY_TIMEOUT_MS: u32 = 5000;

/// SQLite-backed key-value store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at the default location (~/.local/share/homelinks/store.db)
    pub fn open_default() -> anyhow::Result<Self> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Self::open(dir.join("store.db"))
    }

    /// Open or create the store at `path`
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(&format!(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout={BUSY_TIMEOUT_MS};
             PRAGMA synchronous=NORMAL;"
        ))?;
        let store = Self::from_connection(conn)?;
        tracing::debug!(path = %path.display(), "SQLite store opened");
        Ok(store)
    }

    /// Create an in-memory store
    pub fn in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn data_dir() -> anyhow::Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(data_dir.join("homelinks"))
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("SQLite store lock poisoned"))
    }

    /// Timestamp of the last write to `key`
    pub fn updated_at(&self, key: &str) -> anyhow::Result<Option<i64>> {
        let conn = self.lock()?;
        let updated = conn
            .query_row("SELECT updated_at FROM kv WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(updated)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?, ?, ?)",
            params![key, value, current_timestamp()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}

/// Get current Unix timestamp
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
