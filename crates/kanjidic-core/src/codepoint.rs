//! Single-character text to codepoint conversion

use crate::error::CodepointError;

/// Return the Unicode scalar value of a text that holds exactly one character.
///
/// Kanji outside the Basic Multilingual Plane (CJK Extension B and later) are
/// single `char`s in Rust, so they map to their full codepoint here.
pub fn single_char_to_codepoint(text: &str) -> Result<u32, CodepointError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(CodepointError::Empty),
        (Some(c), None) => Ok(c as u32),
        (Some(_), Some(_)) => Err(CodepointError::TooManyChars {
            text: text.to_string(),
            count: text.chars().count(),
        }),
    }
}

/// Inverse of [`single_char_to_codepoint`], `None` for invalid scalar values
pub fn codepoint_to_char(codepoint: u32) -> Option<char> {
    char::from_u32(codepoint)
}

/// Format a codepoint the way Unicode charts do (`U+4E00`)
pub fn format_codepoint(codepoint: u32) -> String {
    format!("U+{:04X}", codepoint)
}
