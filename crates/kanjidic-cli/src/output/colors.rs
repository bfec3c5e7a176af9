//! ANSI color helpers for terminal output

use colored::Colorize;
use kanjidic_core::ReadingType;

/// Get colored kanji
pub fn colored_kanji(kanji: char) -> String {
    kanji.to_string().bold().to_string()
}

/// Get colored reading type indicator
pub fn colored_reading_type(reading_type: ReadingType) -> String {
    match reading_type {
        ReadingType::On => "on".cyan().to_string(),
        ReadingType::Kun => "kun".green().to_string(),
    }
}

/// Get colored language tag
pub fn colored_lang(lang: &str) -> String {
    lang.magenta().to_string()
}

/// Get colored codepoint
pub fn colored_codepoint(codepoint: &str) -> String {
    codepoint.white().dimmed().to_string()
}

/// Get colored header
pub fn header(text: &str) -> String {
    text.bold().underline().to_string()
}

/// Get colored label
pub fn label(text: &str) -> String {
    text.white().dimmed().to_string()
}

/// Get colored value
pub fn value(text: &str) -> String {
    text.white().to_string()
}

/// Get colored success message
pub fn success(text: &str) -> String {
    format!("{} {}", "✓".green(), text)
}

/// Get colored warning message
pub fn warning(text: &str) -> String {
    format!("{} {}", "⚠".yellow(), text)
}

/// Get colored error message
pub fn error(text: &str) -> String {
    format!("{} {}", "✗".red(), text)
}

/// Format count with comma separators
pub fn format_count(n: i64) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}
