//! Database query functions

use kanjidic_core::{KanjiRecord, Meaning, Reading, ReadingType, SearchField, SearchHit};
use rusqlite::OptionalExtension;
use serde::Serialize;

use crate::connection::{DbError, KanjiDb};

/// Default number of search hits
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Stroke geometry stored for one kanji
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrokeCounts {
    /// Groups below the synthetic root
    pub groups: i64,
    pub strokes: i64,
}

impl KanjiDb {
    /// Get one entry with its readings, meanings and nanori in insertion order
    pub fn get_entry(&self, kanji: char) -> Result<Option<KanjiRecord>, DbError> {
        let codepoint = kanji as u32;

        let entry = self
            .conn
            .query_row(
                "SELECT grade, strokeCount, frequency, jlpt FROM entries WHERE id = ?1",
                [codepoint],
                |row| {
                    Ok(KanjiRecord {
                        codepoint,
                        grade: row.get(0)?,
                        stroke_count: row.get(1)?,
                        frequency: row.get(2)?,
                        jlpt: row.get(3)?,
                        ..Default::default()
                    })
                },
            )
            .optional()?;

        let Some(mut entry) = entry else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT readingText.reading, reading.type
             FROM reading
             JOIN readingText ON readingText.rowid = reading.docid
             WHERE reading.entry = ?1
             ORDER BY reading.docid",
        )?;
        let rows = stmt.query_map([codepoint], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;
        for row in rows {
            let (text, kind) = row?;
            if let Some(reading_type) = kind.as_deref().and_then(ReadingType::from_attr) {
                entry.readings.push(Reading { text, reading_type });
            }
        }

        let mut stmt = self.conn.prepare(
            "SELECT meaningText.meaning, meaning.lang
             FROM meaning
             JOIN meaningText ON meaningText.rowid = meaning.docid
             WHERE meaning.entry = ?1
             ORDER BY meaning.docid",
        )?;
        entry.meanings = stmt
            .query_map([codepoint], |row| {
                Ok(Meaning {
                    text: row.get(0)?,
                    lang: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT nanoriText.nanori
             FROM nanori
             JOIN nanoriText ON nanoriText.rowid = nanori.docid
             WHERE nanori.entry = ?1
             ORDER BY nanori.docid",
        )?;
        entry.nanori = stmt
            .query_map([codepoint], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(entry))
    }

    /// Search one text table.
    ///
    /// Meanings use FTS5 phrase matching; readings and nanori use substring
    /// matching, which the trigram tokenizer indexes. Hits come back most
    /// frequent kanji first.
    pub fn search(
        &self,
        query: &str,
        field: SearchField,
        limit: usize,
    ) -> Result<Vec<SearchHit>, DbError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let junction = field.as_str();
        let text_table = format!("{}Text", junction);
        let (condition, pattern) = match field {
            SearchField::Meaning => (
                format!("{} MATCH ?1", text_table),
                format!("\"{}\"", query.replace('"', "\"\"")),
            ),
            SearchField::Reading | SearchField::Nanori => (
                format!("{}.{} LIKE ?1", text_table, junction),
                format!("%{}%", query),
            ),
        };

        let sql = format!(
            "SELECT {j}.entry, {t}.{j}
             FROM {t}
             JOIN {j} ON {j}.docid = {t}.rowid
             JOIN entries ON entries.id = {j}.entry
             WHERE {cond}
             ORDER BY entries.frequency IS NULL, entries.frequency, {j}.docid
             LIMIT ?2",
            j = junction,
            t = text_table,
            cond = condition,
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let hits = stmt
            .query_map(rusqlite::params![pattern, limit as i64], |row| {
                Ok(SearchHit {
                    codepoint: row.get(0)?,
                    field,
                    text: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hits)
    }

    /// Count stroke groups and strokes stored for `kanji`
    pub fn stroke_counts(&self, kanji: char) -> Result<StrokeCounts, DbError> {
        let codepoint = kanji as u32;

        let groups: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM strokeGroups WHERE kanji = ?1 AND parentGroup IS NOT NULL",
            [codepoint],
            |row| row.get(0),
        )?;

        let strokes: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM strokes
             JOIN strokeGroups ON strokeGroups.id = strokes.parentGroup
             WHERE strokeGroups.kanji = ?1",
            [codepoint],
            |row| row.get(0),
        )?;

        Ok(StrokeCounts { groups, strokes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanjidic_indexer::{build_database, BuildConfig};
    use std::path::{Path, PathBuf};

    const KANJIDIC2: &str = r#"<kanjidic2>
<character>
<literal>一</literal>
<misc><grade>1</grade><stroke_count>1</stroke_count><freq>2</freq></misc>
<reading_meaning>
<rmgroup>
<reading r_type="ja_on">イチ</reading>
<reading r_type="ja_on">イツ</reading>
<reading r_type="ja_kun">ひと-</reading>
<reading r_type="ja_kun">ひと.つ</reading>
<meaning>one</meaning>
<meaning>one radical (no.1)</meaning>
<meaning m_lang="fr">un</meaning>
</rmgroup>
<nanori>かず</nanori>
<nanori>い</nanori>
</reading_meaning>
</character>
<character>
<literal>人</literal>
<misc><grade>1</grade><stroke_count>2</stroke_count><freq>5</freq></misc>
<reading_meaning>
<rmgroup>
<reading r_type="ja_on">ジン</reading>
<reading r_type="ja_kun">ひと</reading>
<meaning>person</meaning>
</rmgroup>
<nanori>と</nanori>
</reading_meaning>
</character>
<character>
<literal>壱</literal>
<misc><stroke_count>7</stroke_count></misc>
<reading_meaning>
<rmgroup>
<reading r_type="ja_on">イチ</reading>
<meaning>one (in documents)</meaning>
</rmgroup>
</reading_meaning>
</character>
</kanjidic2>"#;

    const KANJIVG: &str = r#"<kanjis>
<kanji midashi="人">
<strokegr element="人">
<stroke type="㇒" path="M1,1"/>
<stroke type="㇏" path="M2,2"/>
</strokegr>
</kanji>
</kanjis>"#;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn build(dir: &Path) -> KanjiDb {
        let config = BuildConfig {
            db_path: dir.join("kanjidic2.db"),
            kanjidic2_path: write_file(dir, "kanjidic2.xml", KANJIDIC2),
            kanjivg_path: Some(write_file(dir, "kanjivg.xml", KANJIVG)),
            level_files: vec![kanjidic_indexer::LevelFile::new(
                4,
                write_file(dir, "n4.txt", "人\n"),
            )],
            ..Default::default()
        };
        build_database(&config, |_| {}).unwrap();
        KanjiDb::open(&config.db_path).unwrap()
    }

    #[test]
    fn test_get_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let db = build(tmp.path());

        let entry = db.get_entry('一').unwrap().unwrap();
        assert_eq!(entry.codepoint, 0x4E00);
        assert_eq!(entry.grade, Some(1));
        assert_eq!(entry.frequency, Some(2));
        assert_eq!(entry.jlpt, None);
        assert_eq!(
            entry.readings_of(ReadingType::On).collect::<Vec<_>>(),
            vec!["イチ", "イツ"]
        );
        assert_eq!(
            entry.readings_of(ReadingType::Kun).collect::<Vec<_>>(),
            vec!["ひと-", "ひと.つ"]
        );
        let meanings: Vec<_> = entry.meanings.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(meanings, vec!["one", "one radical (no.1)"]);
        assert_eq!(entry.nanori, vec!["かず", "い"]);

        let person = db.get_entry('人').unwrap().unwrap();
        assert_eq!(person.jlpt, Some(4));
    }

    #[test]
    fn test_get_missing_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let db = build(tmp.path());
        assert!(db.get_entry('猫').unwrap().is_none());
    }

    #[test]
    fn test_search_meaning() {
        let tmp = tempfile::tempdir().unwrap();
        let db = build(tmp.path());

        let hits = db.search("one", SearchField::Meaning, 10).unwrap();
        let kanji: Vec<_> = hits.iter().filter_map(|h| h.character()).collect();
        // frequency-ranked entries first, unranked last
        assert_eq!(kanji, vec!['一', '一', '壱']);
        assert!(hits.iter().all(|h| h.field == SearchField::Meaning));

        let limited = db.search("one", SearchField::Meaning, 1).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_search_reading_and_nanori() {
        let tmp = tempfile::tempdir().unwrap();
        let db = build(tmp.path());

        let hits = db.search("ひと", SearchField::Reading, 10).unwrap();
        let kanji: Vec<_> = hits.iter().filter_map(|h| h.character()).collect();
        assert_eq!(kanji, vec!['一', '一', '人']);

        let hits = db.search("かず", SearchField::Nanori, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "かず");

        assert!(db.search("  ", SearchField::Reading, 10).unwrap().is_empty());
    }

    #[test]
    fn test_stroke_counts() {
        let tmp = tempfile::tempdir().unwrap();
        let db = build(tmp.path());

        assert_eq!(
            db.stroke_counts('人').unwrap(),
            StrokeCounts {
                groups: 1,
                strokes: 2
            }
        );
        assert_eq!(db.stroke_counts('一').unwrap(), StrokeCounts::default());
    }

    #[test]
    fn test_stats() {
        let tmp = tempfile::tempdir().unwrap();
        let db = build(tmp.path());

        let stats = db.stats().unwrap();
        assert_eq!(stats.entry_count, 3);
        assert_eq!(stats.reading_count, 7);
        assert_eq!(stats.meaning_count, 4);
        assert_eq!(stats.nanori_count, 3);
        assert_eq!(stats.jlpt_count, 1);
        assert_eq!(stats.stroke_group_count, 1);
        assert_eq!(stats.stroke_count, 2);
    }
}
