use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::db::migrations::run_migrations;
use crate::error::Result;

/// Opaque key/value blob storage. Each key holds one whole serialized
/// collection; writes replace the previous value with no transaction or
/// version check, so concurrent read-modify-write cycles lose updates.
pub trait Store {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

// ─── SQLite ──────────────────────────────────────────────────────────────────

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        debug!("sqlite read {}", key);
        let value = self
            .conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        debug!("sqlite write {} ({} bytes)", key, value.len());
        self.conn.execute(
            "INSERT INTO blobs (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

// ─── JSON files ──────────────────────────────────────────────────────────────

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        debug!("file read {:?}", path);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    /// Writes a sibling temp file and renames it over the target, so a
    /// crash mid-write leaves the previous contents intact.
    fn write(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        debug!("file write {:?} ({} bytes)", path, value.len());
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// ─── In memory ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn Store) {
        assert_eq!(store.read("habits").unwrap(), None);
        store.write("habits", "[]").unwrap();
        assert_eq!(store.read("habits").unwrap().as_deref(), Some("[]"));
        store.write("habits", r#"[{"id":"a"}]"#).unwrap();
        assert_eq!(store.read("habits").unwrap().as_deref(), Some(r#"[{"id":"a"}]"#));
        assert_eq!(store.read("challenges").unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_sqlite_store_in_memory() {
        exercise(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_sqlite_store_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habitual.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            exercise(&store);
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.read("habits").unwrap().as_deref(), Some(r#"[{"id":"a"}]"#));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        exercise(&store);
        assert!(dir.path().join("nested").join("habits.json").exists());
    }

    #[test]
    fn test_file_store_overwrite_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.write("habits", "[1]").unwrap();
        store.write("habits", "[2]").unwrap();
        assert_eq!(store.read("habits").unwrap().as_deref(), Some("[2]"));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["habits.json".to_string()]);
    }
}
