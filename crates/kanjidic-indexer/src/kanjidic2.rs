//! KANJIDIC2 pass: parse entries and flush each one through the gateway

use kanjidic_core::{parse_kanjidic2, Kanjidic2Options, Kanjidic2Summary};
use std::io::BufRead;

use crate::connection::IndexerError;
use crate::gateway::Statements;

/// Stream a KANJIDIC2 document into the database.
///
/// The first failing entry aborts the whole pass with its error.
pub fn import_kanjidic2<R: BufRead>(
    statements: &mut Statements<'_>,
    input: R,
    options: &Kanjidic2Options,
    entry_savepoints: bool,
) -> Result<Kanjidic2Summary, IndexerError> {
    let summary = parse_kanjidic2(input, options, |record| {
        if entry_savepoints {
            statements.insert_kanji_atomic(&record)
        } else {
            statements.insert_kanji(&record)
        }
    })?;

    tracing::info!(
        entries = summary.entries,
        readings = summary.readings,
        meanings = summary.meanings,
        nanori = summary.nanori,
        "KANJIDIC2 imported"
    );
    tracing::debug!(
        readings = summary.readings_discarded,
        meanings = summary.meanings_discarded,
        "KANJIDIC2 items outside the reading/language filters"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::IndexerDb;
    use crate::schema;
    use rusqlite::Connection;

    fn setup_db() -> IndexerDb {
        let db = IndexerDb::open_in_memory().unwrap();
        schema::create_tables(db.connection()).unwrap();
        db
    }

    fn count(conn: &Connection, sql: &str) -> i64 {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_import_two_entries() {
        let db = setup_db();
        let conn = db.connection();
        let xml = r#"<kanjidic2>
<character><literal>一</literal><misc><stroke_count>1</stroke_count></misc>
<reading_meaning><rmgroup><reading r_type="ja_on">イチ</reading><meaning>one</meaning></rmgroup></reading_meaning>
</character>
<character><literal>二</literal><misc><stroke_count>2</stroke_count></misc>
<reading_meaning><rmgroup><reading r_type="ja_on">ニ</reading><meaning>two</meaning></rmgroup></reading_meaning>
</character>
</kanjidic2>"#;

        let mut statements = schema_statements(conn);
        let summary =
            import_kanjidic2(&mut statements, xml.as_bytes(), &Kanjidic2Options::default(), false)
                .unwrap();
        drop(statements);

        assert_eq!(summary.entries, 2);
        assert_eq!(count(conn, "SELECT COUNT(*) FROM entries"), 2);
        assert_eq!(count(conn, "SELECT COUNT(*) FROM reading"), 2);
        assert_eq!(count(conn, "SELECT COUNT(*) FROM meaning"), 2);
        assert_eq!(
            count(conn, "SELECT strokeCount FROM entries WHERE id = 20108"),
            2
        );
    }

    #[test]
    fn test_parse_error_aborts_after_earlier_entries() {
        let db = setup_db();
        let conn = db.connection();
        let xml = r#"<kanjidic2>
<character><literal>一</literal></character>
<character><literal></literal></character>
</kanjidic2>"#;

        let mut statements = schema_statements(conn);
        let err =
            import_kanjidic2(&mut statements, xml.as_bytes(), &Kanjidic2Options::default(), false)
                .unwrap_err();
        drop(statements);

        assert!(matches!(err, IndexerError::Parse(_)));
        assert_eq!(count(conn, "SELECT COUNT(*) FROM entries"), 1);
    }

    #[test]
    fn test_duplicate_literal_is_a_statement_failure() {
        let db = setup_db();
        let conn = db.connection();
        let xml = r#"<kanjidic2>
<character><literal>一</literal></character>
<character><literal>一</literal></character>
</kanjidic2>"#;

        let mut statements = schema_statements(conn);
        let err =
            import_kanjidic2(&mut statements, xml.as_bytes(), &Kanjidic2Options::default(), false)
                .unwrap_err();
        assert!(matches!(err, IndexerError::Sqlite(_)));
    }

    fn schema_statements(conn: &Connection) -> Statements<'_> {
        Statements::prepare(conn).unwrap()
    }
}
