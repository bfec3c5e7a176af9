//! JSON output formatting

use kanjidic_core::{KanjiRecord, ReadingType, SearchHit};
use kanjidic_db::StrokeCounts;

/// Output an entry as JSON
pub fn format_entry(entry: &KanjiRecord, strokes: &StrokeCounts) -> serde_json::Value {
    serde_json::json!({
        "kanji": entry.character().map(String::from),
        "codepoint": entry.codepoint,
        "grade": entry.grade,
        "stroke_count": entry.stroke_count,
        "frequency": entry.frequency,
        "jlpt": entry.jlpt,
        "on": entry.readings_of(ReadingType::On).collect::<Vec<_>>(),
        "kun": entry.readings_of(ReadingType::Kun).collect::<Vec<_>>(),
        "meanings": entry.meanings,
        "nanori": entry.nanori,
        "stroke_groups": strokes.groups,
        "strokes": strokes.strokes,
    })
}

/// Output a search hit as JSON
pub fn format_hit(hit: &SearchHit) -> String {
    serde_json::json!({
        "kanji": hit.character().map(String::from),
        "codepoint": hit.codepoint,
        "field": hit.field,
        "text": hit.text,
    })
    .to_string()
}
