//! JLPT level overlay
//!
//! A level file lists one character per line. Every listed character that has
//! an entry gets the file's level; characters without an entry are ignored.

use kanjidic_core::{format_codepoint, single_char_to_codepoint};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::connection::IndexerError;
use crate::gateway::Statements;

const BOM: char = '\u{feff}';

/// Outcome of one level file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelResult {
    pub level: u8,
    /// Lines whose character updated an entry
    pub matched: usize,
    /// Lines whose character has no entry
    pub unmatched: usize,
}

/// Apply the level file at `path` to `entries.jlpt`.
pub fn apply_level_file(
    statements: &mut Statements<'_>,
    path: &Path,
    level: u8,
) -> Result<LevelResult, IndexerError> {
    let file = File::open(path).map_err(|source| IndexerError::LevelFileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut result = LevelResult {
        level,
        ..Default::default()
    };

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let mut text = line.trim_end_matches(['\r', '\n']);
        if index == 0 {
            text = text.trim_start_matches(BOM);
        }
        if text.is_empty() {
            continue;
        }

        let codepoint =
            single_char_to_codepoint(text).map_err(|source| IndexerError::LevelLine {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;

        if statements.update_jlpt(codepoint, level)? > 0 {
            result.matched += 1;
        } else {
            tracing::debug!(
                kanji = %format_codepoint(codepoint),
                level,
                "Level file character has no entry"
            );
            result.unmatched += 1;
        }
    }

    tracing::info!(
        level,
        matched = result.matched,
        unmatched = result.unmatched,
        file = %path.display(),
        "JLPT level applied"
    );

    Ok(result)
}
