//! Human-readable output formatting

use super::colors::*;
use kanjidic_core::{format_codepoint, KanjiRecord, ReadingType, SearchHit};
use kanjidic_db::StrokeCounts;

/// Format one entry with everything stored for it
pub fn format_entry(entry: &KanjiRecord, strokes: &StrokeCounts) -> String {
    let mut lines = Vec::new();

    let kanji = entry.character().unwrap_or('\u{fffd}');
    lines.push(format!(
        "{} {}",
        colored_kanji(kanji),
        colored_codepoint(&format_codepoint(entry.codepoint))
    ));
    lines.push(String::new());

    let fields = [
        ("Grade", entry.grade.map(|v| v.to_string())),
        ("Strokes", entry.stroke_count.map(|v| v.to_string())),
        ("Frequency", entry.frequency.map(|v| v.to_string())),
        ("JLPT", entry.jlpt.map(|v| format!("N{}", v))),
    ];
    for (name, field) in fields {
        let text = field.unwrap_or_else(|| "-".to_string());
        lines.push(format!("  {}: {}", label(name), value(&text)));
    }

    for reading_type in ReadingType::ALL {
        let readings: Vec<&str> = entry.readings_of(reading_type).collect();
        if !readings.is_empty() {
            lines.push(format!(
                "  {}: {}",
                colored_reading_type(reading_type),
                readings.join("、")
            ));
        }
    }

    if !entry.nanori.is_empty() {
        lines.push(format!("  {}: {}", label("Nanori"), entry.nanori.join("、")));
    }

    if !entry.meanings.is_empty() {
        lines.push(String::new());
        for meaning in &entry.meanings {
            lines.push(format!("  [{}] {}", colored_lang(&meaning.lang), meaning.text));
        }
    }

    if strokes.groups + strokes.strokes > 0 {
        lines.push(String::new());
        lines.push(format!(
            "  {}: {} groups, {} strokes",
            label("KanjiVG"),
            strokes.groups,
            strokes.strokes
        ));
    }

    lines.join("\n")
}

/// Format a search hit as one line
pub fn format_hit(hit: &SearchHit) -> String {
    let kanji = hit.character().unwrap_or('\u{fffd}');
    format!(
        "{} {}  {}",
        colored_kanji(kanji),
        colored_codepoint(&format_codepoint(hit.codepoint)),
        hit.text
    )
}
