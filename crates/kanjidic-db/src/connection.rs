//! Database connection management

use kanjidic_core::KANJIDIC2DB_REVISION;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database not found at {0}")]
    NotFound(PathBuf),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database not initialized (run: kanjidic build)")]
    NotInitialized,

    #[error("Database revision mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Read-only database connection
pub struct KanjiDb {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl KanjiDb {
    /// Open the database at a specific path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(DbError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let db = Self { conn, path };
        db.check_version()?;

        Ok(db)
    }

    fn check_version(&self) -> Result<(), DbError> {
        let version = self.revision();

        match version {
            None => Err(DbError::NotInitialized),
            Some(v) if v != KANJIDIC2DB_REVISION => Err(DbError::VersionMismatch {
                expected: KANJIDIC2DB_REVISION,
                found: v,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Revision stored in `info`, `None` if the table is missing or empty
    fn revision(&self) -> Option<i32> {
        self.conn
            .query_row("SELECT version FROM info LIMIT 1", [], |row| row.get(0))
            .ok()
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the underlying connection (for custom queries)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats, DbError> {
        let count = |table: &str| -> Result<i64, DbError> {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
        };

        let jlpt_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE jlpt IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        // Synthetic per-kanji roots are not counted as groups
        let stroke_group_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM strokeGroups WHERE parentGroup IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        let db_size = std::fs::metadata(&self.path)
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(DbStats {
            version: self.revision().unwrap_or(0),
            entry_count: count("entries")?,
            reading_count: count("reading")?,
            meaning_count: count("meaning")?,
            nanori_count: count("nanori")?,
            jlpt_count,
            stroke_group_count,
            stroke_count: count("strokes")?,
            db_path: self.path.clone(),
            db_size_bytes: db_size,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub version: i32,
    pub entry_count: i64,
    pub reading_count: i64,
    pub meaning_count: i64,
    pub nanori_count: i64,
    /// Entries carrying a JLPT level
    pub jlpt_count: i64,
    pub stroke_group_count: i64,
    pub stroke_count: i64,
    pub db_path: PathBuf,
    pub db_size_bytes: u64,
}

impl DbStats {
    /// Format database size as human-readable string
    pub fn format_size(&self) -> String {
        let bytes = self.db_size_bytes as f64;
        if bytes < 1024.0 {
            format!("{} B", bytes)
        } else if bytes < 1024.0 * 1024.0 {
            format!("{:.1} KB", bytes / 1024.0)
        } else {
            format!("{:.1} MB", bytes / (1024.0 * 1024.0))
        }
    }
}
