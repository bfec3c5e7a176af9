//! Prepared statements shared by every import pass
//!
//! [`Statements`] is built once per run and passed by `&mut` into each pass.
//! Every statement is prepared up front and only re-bound per row. Failures are
//! returned as-is: nothing is retried and nothing already written is undone,
//! unless the caller asked for per-entry savepoints.

use kanjidic_core::{GroupChild, KanjiRecord, StrokeGroup};
use rusqlite::{params, Connection, Statement};

use crate::connection::IndexerError;

const ENTRY_SAVEPOINT: &str = "kanji_entry";

/// One prepared statement per statement kind
pub struct Statements<'conn> {
    conn: &'conn Connection,
    insert_entry: Statement<'conn>,
    insert_reading: Statement<'conn>,
    insert_reading_text: Statement<'conn>,
    insert_meaning: Statement<'conn>,
    insert_meaning_text: Statement<'conn>,
    insert_nanori: Statement<'conn>,
    insert_nanori_text: Statement<'conn>,
    insert_stroke_group: Statement<'conn>,
    insert_stroke: Statement<'conn>,
    entry_exists: Statement<'conn>,
    update_jlpt: Statement<'conn>,
}

impl<'conn> Statements<'conn> {
    /// Prepare every statement against a connection whose schema already exists
    pub fn prepare(conn: &'conn Connection) -> Result<Self, IndexerError> {
        Ok(Self {
            conn,
            insert_entry: conn.prepare("INSERT INTO entries VALUES (?1, ?2, ?3, ?4, ?5)")?,
            insert_reading: conn.prepare("INSERT INTO reading VALUES (?1, ?2, ?3)")?,
            insert_reading_text: conn.prepare("INSERT INTO readingText(reading) VALUES (?1)")?,
            insert_meaning: conn.prepare("INSERT INTO meaning VALUES (?1, ?2, ?3)")?,
            insert_meaning_text: conn.prepare("INSERT INTO meaningText(meaning) VALUES (?1)")?,
            insert_nanori: conn.prepare("INSERT INTO nanori VALUES (?1, ?2)")?,
            insert_nanori_text: conn.prepare("INSERT INTO nanoriText(nanori) VALUES (?1)")?,
            insert_stroke_group: conn.prepare(
                "INSERT INTO strokeGroups(kanji, parentGroup, number, element, original)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?,
            insert_stroke: conn.prepare(
                "INSERT INTO strokes(parentGroup, strokeType, path) VALUES (?1, ?2, ?3)",
            )?,
            entry_exists: conn.prepare("SELECT 1 FROM entries WHERE id = ?1")?,
            update_jlpt: conn.prepare("UPDATE entries SET jlpt = ?1 WHERE id = ?2")?,
        })
    }

    /// Write one entry with its readings, meanings and nanori.
    ///
    /// Without a savepoint a failure part-way leaves the rows written so far
    /// in the enclosing transaction.
    pub fn insert_kanji(&mut self, record: &KanjiRecord) -> Result<(), IndexerError> {
        let id = record.codepoint;

        self.insert_entry.execute(params![
            id,
            record.grade,
            record.stroke_count,
            record.frequency,
            record.jlpt,
        ])?;

        for reading in &record.readings {
            // Every occurrence gets its own text row, identical text included
            let docid =
                insert_returning_id(&mut self.insert_reading_text, self.conn, &reading.text)?;
            self.insert_reading
                .execute(params![docid, id, reading.reading_type.as_str()])?;
        }

        for meaning in &record.meanings {
            let docid =
                insert_returning_id(&mut self.insert_meaning_text, self.conn, &meaning.text)?;
            self.insert_meaning.execute(params![docid, id, meaning.lang])?;
        }

        for nanori in &record.nanori {
            let docid =
                insert_returning_id(&mut self.insert_nanori_text, self.conn, nanori)?;
            self.insert_nanori.execute(params![docid, id])?;
        }

        Ok(())
    }

    /// [`Self::insert_kanji`] wrapped in a savepoint, so a failing entry leaves
    /// no rows behind. The error is still returned.
    pub fn insert_kanji_atomic(&mut self, record: &KanjiRecord) -> Result<(), IndexerError> {
        self.conn
            .execute_batch(&format!("SAVEPOINT {}", ENTRY_SAVEPOINT))?;

        match self.insert_kanji(record) {
            Ok(()) => {
                self.conn
                    .execute_batch(&format!("RELEASE {}", ENTRY_SAVEPOINT))?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch(&format!(
                    "ROLLBACK TO {0}; RELEASE {0}",
                    ENTRY_SAVEPOINT
                )) {
                    tracing::warn!("failed to roll back entry savepoint: {}", rollback);
                }
                Err(e)
            }
        }
    }

    /// Whether an entry row exists for `codepoint`
    pub fn entry_exists(&mut self, codepoint: u32) -> Result<bool, IndexerError> {
        Ok(self.entry_exists.exists([codepoint])?)
    }

    /// Write a stroke tree depth-first in document order. Returns the id of
    /// `group`.
    pub fn insert_stroke_group(
        &mut self,
        kanji: u32,
        parent: Option<i64>,
        group: &StrokeGroup,
    ) -> Result<i64, IndexerError> {
        self.insert_stroke_group.execute(params![
            kanji,
            parent,
            group.number,
            group.element,
            group.original,
        ])?;
        let id = self.conn.last_insert_rowid();

        for child in &group.children {
            match child {
                GroupChild::Group(subgroup) => {
                    self.insert_stroke_group(kanji, Some(id), subgroup)?;
                }
                GroupChild::Stroke(stroke) => {
                    self.insert_stroke
                        .execute(params![id, stroke.stroke_type, stroke.path])?;
                }
            }
        }

        Ok(id)
    }

    /// Set the JLPT level of one entry. Returns the number of rows changed,
    /// 0 when no entry has that codepoint.
    pub fn update_jlpt(&mut self, codepoint: u32, level: u8) -> Result<usize, IndexerError> {
        Ok(self.update_jlpt.execute(params![level, codepoint])?)
    }
}

/// Insert a single text value and return the rowid it was given
fn insert_returning_id(
    statement: &mut Statement<'_>,
    conn: &Connection,
    text: &str,
) -> Result<i64, IndexerError> {
    statement.execute([text])?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::IndexerDb;
    use crate::schema;
    use kanjidic_core::{Meaning, Reading, ReadingType, Stroke};

    fn setup_db() -> IndexerDb {
        let db = IndexerDb::open_in_memory().unwrap();
        schema::create_tables(db.connection()).unwrap();
        db
    }

    fn count(conn: &Connection, sql: &str) -> i64 {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    fn sample_record() -> KanjiRecord {
        KanjiRecord {
            codepoint: 0x65E5,
            grade: Some(1),
            stroke_count: Some(4),
            frequency: Some(1),
            jlpt: None,
            readings: vec![
                Reading {
                    text: "ニチ".to_string(),
                    reading_type: ReadingType::On,
                },
                Reading {
                    text: "ニチ".to_string(),
                    reading_type: ReadingType::On,
                },
                Reading {
                    text: "ひ".to_string(),
                    reading_type: ReadingType::Kun,
                },
            ],
            meanings: vec![Meaning {
                text: "day".to_string(),
                lang: "en".to_string(),
            }],
            nanori: vec!["あき".to_string()],
        }
    }

    #[test]
    fn test_insert_kanji_links_text_rows() {
        let db = setup_db();
        let conn = db.connection();
        let mut statements = Statements::prepare(conn).unwrap();
        statements.insert_kanji(&sample_record()).unwrap();
        drop(statements);

        assert_eq!(count(conn, "SELECT COUNT(*) FROM entries"), 1);
        assert_eq!(count(conn, "SELECT COUNT(*) FROM reading WHERE entry = 26085"), 3);
        // identical readings are not merged
        assert_eq!(count(conn, "SELECT COUNT(DISTINCT docid) FROM reading"), 3);
        assert_eq!(count(conn, "SELECT COUNT(*) FROM readingText"), 3);
        assert_eq!(
            count(
                conn,
                "SELECT COUNT(*) FROM reading r JOIN readingText t ON t.rowid = r.docid"
            ),
            3
        );
        assert_eq!(count(conn, "SELECT COUNT(*) FROM meaning WHERE lang = 'en'"), 1);
        assert_eq!(count(conn, "SELECT COUNT(*) FROM nanori"), 1);

        let kun: String = conn
            .query_row(
                "SELECT t.reading FROM reading r JOIN readingText t ON t.rowid = r.docid
                 WHERE r.type = 'ja_kun'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(kun, "ひ");
    }

    #[test]
    fn test_absent_fields_are_null() {
        let db = setup_db();
        let conn = db.connection();
        let mut statements = Statements::prepare(conn).unwrap();
        statements
            .insert_kanji(&KanjiRecord {
                codepoint: 0x4E02,
                stroke_count: Some(2),
                ..Default::default()
            })
            .unwrap();
        drop(statements);

        assert_eq!(
            count(
                conn,
                "SELECT COUNT(*) FROM entries WHERE grade IS NULL AND frequency IS NULL AND jlpt IS NULL"
            ),
            1
        );
    }

    #[test]
    fn test_duplicate_entry_fails() {
        let db = setup_db();
        let conn = db.connection();
        let mut statements = Statements::prepare(conn).unwrap();
        statements.insert_kanji(&sample_record()).unwrap();
        assert!(statements.insert_kanji(&sample_record()).is_err());
    }

    #[test]
    fn test_atomic_insert_rolls_back_partial_entry() {
        let db = setup_db();
        let conn = db.connection();
        conn.execute_batch(
            "CREATE TRIGGER fail_meaning BEFORE INSERT ON meaning
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        )
        .unwrap();

        let mut statements = Statements::prepare(conn).unwrap();
        assert!(statements.insert_kanji_atomic(&sample_record()).is_err());
        drop(statements);

        assert_eq!(count(conn, "SELECT COUNT(*) FROM entries"), 0);
        assert_eq!(count(conn, "SELECT COUNT(*) FROM reading"), 0);
    }

    #[test]
    fn test_plain_insert_keeps_partial_entry() {
        let db = setup_db();
        let conn = db.connection();
        conn.execute_batch(
            "CREATE TRIGGER fail_meaning BEFORE INSERT ON meaning
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        )
        .unwrap();

        let mut statements = Statements::prepare(conn).unwrap();
        assert!(statements.insert_kanji(&sample_record()).is_err());
        drop(statements);

        assert_eq!(count(conn, "SELECT COUNT(*) FROM entries"), 1);
        assert_eq!(count(conn, "SELECT COUNT(*) FROM reading"), 3);
    }

    #[test]
    fn test_stroke_tree_rows() {
        let db = setup_db();
        let conn = db.connection();
        let mut statements = Statements::prepare(conn).unwrap();
        let root = StrokeGroup {
            number: 0,
            element: Some(0x4E8C),
            original: None,
            children: vec![GroupChild::Group(StrokeGroup {
                number: 1,
                element: Some(0x4E8C),
                original: None,
                children: vec![
                    GroupChild::Stroke(Stroke {
                        stroke_type: Some('㇐' as u32),
                        path: Some("M1,1".to_string()),
                    }),
                    GroupChild::Stroke(Stroke {
                        stroke_type: Some('㇐' as u32),
                        path: Some("M2,2".to_string()),
                    }),
                ],
            })],
        };

        let root_id = statements.insert_stroke_group(0x4E8C, None, &root).unwrap();
        drop(statements);

        assert_eq!(count(conn, "SELECT COUNT(*) FROM strokeGroups"), 2);
        assert_eq!(
            count(conn, "SELECT COUNT(*) FROM strokeGroups WHERE parentGroup IS NULL"),
            1
        );
        let child_parent: i64 = conn
            .query_row(
                "SELECT parentGroup FROM strokeGroups WHERE number = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(child_parent, root_id);

        let paths: Vec<String> = conn
            .prepare("SELECT path FROM strokes ORDER BY rowid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(paths, vec!["M1,1", "M2,2"]);
    }

    #[test]
    fn test_statements_prepare_with_foreign_keys_on() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        schema::create_tables(&conn).unwrap();

        let mut statements = Statements::prepare(&conn).unwrap();
        let root = StrokeGroup {
            number: 0,
            element: Some(0x4E00),
            original: None,
            children: vec![GroupChild::Group(StrokeGroup {
                number: 1,
                element: Some(0x4E00),
                original: None,
                children: vec![GroupChild::Stroke(Stroke {
                    stroke_type: Some('㇐' as u32),
                    path: Some("M1,1".to_string()),
                })],
            })],
        };
        statements.insert_stroke_group(0x4E00, None, &root).unwrap();
        drop(statements);

        assert_eq!(count(&conn, "SELECT COUNT(*) FROM strokeGroups"), 2);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM strokes"), 1);
    }

    #[test]
    fn test_update_jlpt_reports_matches() {
        let db = setup_db();
        let conn = db.connection();
        let mut statements = Statements::prepare(conn).unwrap();
        statements.insert_kanji(&sample_record()).unwrap();

        assert_eq!(statements.update_jlpt(0x65E5, 4).unwrap(), 1);
        assert_eq!(statements.update_jlpt(0x4E00, 4).unwrap(), 0);
        assert!(statements.entry_exists(0x65E5).unwrap());
        assert!(!statements.entry_exists(0x4E00).unwrap());
    }
}
