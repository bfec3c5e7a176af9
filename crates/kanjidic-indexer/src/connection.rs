//! Read-write database connection for the import

use kanjidic_core::{CodepointError, ParseError};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Indexer errors
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Cannot open input {path}: {source}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open level file {path}: {source}")]
    LevelFileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {source}")]
    LevelLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: CodepointError,
    },

    #[error("Database {0} is not empty (pass --overwrite to replace it)")]
    TargetNotEmpty(PathBuf),
}

/// Default database path, relative to the working directory
pub fn default_db_path() -> PathBuf {
    PathBuf::from("kanjidic2.db")
}

/// Read-write database connection for building
pub struct IndexerDb {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl IndexerDb {
    /// Open (or create) the build target.
    ///
    /// With `overwrite` an existing file is deleted first. Otherwise the target
    /// must be empty: the import has no merge semantics.
    pub fn open_for_build(path: &Path, overwrite: bool) -> Result<Self, IndexerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if overwrite && path.exists() {
            std::fs::remove_file(path)?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let db = Self::from_connection(conn, path.to_path_buf())?;
        if !db.is_empty()? {
            return Err(IndexerError::TargetNotEmpty(db.path));
        }
        Ok(db)
    }

    /// In-memory target with the same pragmas as a file build
    pub fn open_in_memory() -> Result<Self, IndexerError> {
        Self::from_connection(Connection::open_in_memory()?, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, path: PathBuf) -> Result<Self, IndexerError> {
        // Referential columns are documented, not enforced
        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = OFF;",
        )?;
        Ok(Self { conn, path })
    }

    /// True when the database holds no schema objects at all
    pub fn is_empty(&self) -> Result<bool, IndexerError> {
        let objects: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get(0))?;
        Ok(objects == 0)
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get a mutable reference to the underlying connection
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_empty_database() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("kanji.db");

        let db = IndexerDb::open_for_build(&path, false).unwrap();
        assert!(db.is_empty().unwrap());
        assert_eq!(db.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_populated_target_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("kanji.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE leftover(x)").unwrap();
        }

        let err = IndexerDb::open_for_build(&path, false).err().unwrap();
        assert!(matches!(err, IndexerError::TargetNotEmpty(_)));

        let db = IndexerDb::open_for_build(&path, true).unwrap();
        assert!(db.is_empty().unwrap());
    }
}
