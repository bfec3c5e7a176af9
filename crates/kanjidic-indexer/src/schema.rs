//! Database schema creation and post-load indexing
//!
//! Tables are created without `IF NOT EXISTS`: the import is one-shot and
//! running it against a populated database must fail rather than append.

use kanjidic_core::KANJIDIC2DB_REVISION;
use rusqlite::Connection;

use crate::connection::IndexerError;

/// Create every table and record the schema revision
pub fn create_tables(conn: &Connection) -> Result<(), IndexerError> {
    conn.execute_batch("CREATE TABLE info(version INT)")?;
    conn.execute("INSERT INTO info VALUES (?1)", [KANJIDIC2DB_REVISION])?;

    conn.execute_batch(
        "CREATE TABLE entries(
            id INTEGER PRIMARY KEY,
            grade TINYINT,
            strokeCount TINYINT,
            frequency SMALLINT,
            jlpt TINYINT
        )",
    )?;

    // Readings, meanings and nanori: a junction row per occurrence whose docid
    // is the rowid of its text in the matching full-text table
    conn.execute_batch(
        "CREATE TABLE reading(
            docid INTEGER PRIMARY KEY,
            entry INTEGER REFERENCES entries,
            type TEXT
        );
        CREATE VIRTUAL TABLE readingText USING fts5(reading, tokenize = 'trigram');

        CREATE TABLE meaning(
            docid INTEGER PRIMARY KEY,
            entry INTEGER REFERENCES entries,
            lang TEXT
        );
        CREATE VIRTUAL TABLE meaningText USING fts5(meaning);

        CREATE TABLE nanori(
            docid INTEGER PRIMARY KEY,
            entry INTEGER REFERENCES entries
        );
        CREATE VIRTUAL TABLE nanoriText USING fts5(nanori, tokenize = 'trigram');",
    )?;

    // Stroke geometry; a group's id is its rowid
    conn.execute_batch(
        "CREATE TABLE strokeGroups(
            id INTEGER PRIMARY KEY,
            kanji INTEGER,
            parentGroup INTEGER REFERENCES strokeGroups(id),
            number TINYINT,
            element INTEGER,
            original INTEGER
        );
        CREATE TABLE strokes(
            parentGroup INTEGER REFERENCES strokeGroups(id),
            strokeType INTEGER,
            path TEXT
        );",
    )?;

    // Declared for forward compatibility, never populated
    conn.execute_batch("CREATE TABLE skip(entry INTEGER, type TINYINT, c1 TINYINT, c2 TINYINT)")?;

    Ok(())
}

/// Create secondary indexes. Must run after every bulk insert.
pub fn create_indexes(conn: &Connection) -> Result<(), IndexerError> {
    conn.execute_batch(
        "CREATE INDEX idx_entries_frequency ON entries(frequency);
         CREATE INDEX idx_jlpt ON entries(jlpt);
         CREATE INDEX idx_reading_entry ON reading(entry);
         CREATE INDEX idx_meaning_entry ON meaning(entry);
         CREATE INDEX idx_nanori_entry ON nanori(entry);
         CREATE INDEX idx_strokeGroups_kanji ON strokeGroups(kanji);
         CREATE INDEX idx_strokeGroups_parentGroup ON strokeGroups(parentGroup);
         CREATE INDEX idx_strokeGroups_element ON strokeGroups(element);
         CREATE INDEX idx_strokeGroups_original ON strokeGroups(original);
         CREATE INDEX idx_strokes_parentGroup ON strokes(parentGroup);
         CREATE INDEX idx_strokes_strokeType ON strokes(strokeType);
         CREATE INDEX idx_skip ON skip(entry);
         CREATE INDEX idx_skip_type ON skip(type, c1, c2);",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn names(conn: &Connection, kind: &str) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name")
            .unwrap()
            .query_map([kind], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_fresh_schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let tables = names(&conn, "table");
        for expected in [
            "info",
            "entries",
            "reading",
            "readingText",
            "meaning",
            "meaningText",
            "nanori",
            "nanoriText",
            "strokeGroups",
            "strokes",
            "skip",
        ] {
            assert!(
                tables.contains(&expected.to_string()),
                "Missing table: {}",
                expected
            );
        }

        let version: i32 = conn
            .query_row("SELECT version FROM info", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, KANJIDIC2DB_REVISION);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM info", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_schema_is_not_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        assert!(create_tables(&conn).is_err());
    }

    #[test]
    fn test_entries_columns() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(entries)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(
            columns,
            vec!["id", "grade", "strokeCount", "frequency", "jlpt"]
        );
    }

    #[test]
    fn test_stroke_columns() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(strokeGroups)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(
            columns,
            vec!["id", "kanji", "parentGroup", "number", "element", "original"]
        );
    }

    #[test]
    fn test_group_references_hold_with_foreign_keys_on() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        create_tables(&conn).unwrap();

        conn.execute(
            "INSERT INTO strokeGroups(kanji, parentGroup, number) VALUES (19968, NULL, 0)",
            [],
        )
        .unwrap();
        let root = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO strokeGroups(kanji, parentGroup, number) VALUES (19968, ?1, 1)",
            [root],
        )
        .unwrap();
        let child = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO strokes(parentGroup, strokeType, path) VALUES (?1, 12736, 'M1,1')",
            [child],
        )
        .unwrap();

        // a dangling parent is rejected
        assert!(conn
            .execute(
                "INSERT INTO strokes(parentGroup, strokeType, path) VALUES (9999, 12736, 'M2,2')",
                [],
            )
            .is_err());
    }

    #[test]
    fn test_reading_text_matches_kana() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute("INSERT INTO readingText(reading) VALUES ('ひと.つ')", [])
            .unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM readingText WHERE reading LIKE '%ひと%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_indexes_created() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_indexes(&conn).unwrap();

        let indexes = names(&conn, "index");
        assert!(indexes.contains(&"idx_jlpt".to_string()));
        assert!(indexes.contains(&"idx_reading_entry".to_string()));
        assert!(indexes.contains(&"idx_strokeGroups_parentGroup".to_string()));
        assert!(indexes.contains(&"idx_skip_type".to_string()));
    }
}
