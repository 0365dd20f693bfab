use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

use super::schema;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Handle to the LexiGrow database file.
///
/// Cheap to clone; holds only the path and connection settings.
#[derive(Debug, Clone)]
pub struct Database {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    /// Open (and if needed create) the database at the given path.
    pub fn open(db_path: PathBuf, busy_timeout: Duration) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let db = Self {
            db_path,
            busy_timeout,
        };

        let conn = db.connect()?;
        schema::create_tables(&conn)?;
        log::info!("Opened LexiGrow database at {:?}", db.db_path);

        Ok(db)
    }

    /// Open a fresh connection configured for concurrent use.
    ///
    /// WAL lets readers run alongside a writer; the busy timeout makes
    /// contending writers wait for the lock instead of failing outright.
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    /// Get the database path.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
pub(crate) fn open_temp() -> (Database, tempfile::TempDir) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let db = Database::open(
        temp_dir.path().join("lexigrow.db"),
        Duration::from_secs(5),
    )
    .unwrap();
    (db, temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_dirs_and_tables() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data").join("lexigrow.db");

        let db = Database::open(path.clone(), Duration::from_secs(1)).unwrap();
        assert!(path.exists());
        assert_eq!(db.db_path(), path.as_path());

        let conn = db.connect().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('users', 'words', 'student_word_progress', 'student_profiles', 'xp_events', 'study_logs')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let (db, _temp) = open_temp();
        let reopened = Database::open(db.db_path().to_path_buf(), Duration::from_secs(1));
        assert!(reopened.is_ok());
    }

    #[test]
    fn test_connection_uses_wal_and_foreign_keys() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");

        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_history_tables_reject_updates_and_deletes() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();

        let student = uuid::Uuid::new_v4();
        conn.execute(
            "INSERT INTO users (id, name, role, created_at) VALUES (?1, 'S', 'STUDENT', '2026-01-01 00:00:00+00:00')",
            [student],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO xp_events (student_id, points, reason, created_at) VALUES (?1, 5, 'test', '2026-01-01 00:00:00+00:00')",
            [student],
        )
        .unwrap();

        assert!(conn.execute("UPDATE xp_events SET points = 50", []).is_err());
        assert!(conn.execute("DELETE FROM xp_events", []).is_err());
    }
}
