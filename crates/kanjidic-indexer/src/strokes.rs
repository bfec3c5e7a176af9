//! KanjiVG pass: persist stroke trees for kanji already imported

use kanjidic_core::{format_codepoint, parse_kanjivg, KanjiStrokes};
use serde::Serialize;
use std::io::BufRead;

use crate::connection::IndexerError;
use crate::gateway::Statements;

/// What the stroke pass wrote and what it passed over
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrokeImportSummary {
    /// Kanji whose tree was written
    pub kanji: usize,
    /// Groups written, synthetic roots excluded
    pub groups: usize,
    pub strokes: usize,
    /// Kanji with no matching entry
    pub skipped_unknown: usize,
    /// Kanji whose `midashi` is not a single character
    pub skipped_invalid: usize,
}

/// Stream a KanjiVG document into `strokeGroups`/`strokes`.
///
/// Each kanji gets one synthetic root group (no parent, number 0, element set
/// to the kanji itself) above the groups found in the document.
pub fn import_kanjivg<R: BufRead>(
    statements: &mut Statements<'_>,
    input: R,
) -> Result<StrokeImportSummary, IndexerError> {
    let mut summary = StrokeImportSummary::default();

    let parsed = parse_kanjivg(input, |kanji: KanjiStrokes| -> Result<(), IndexerError> {
        let Some(codepoint) = kanji.codepoint else {
            tracing::debug!(midashi = %kanji.midashi, "Skipping kanji with invalid midashi");
            summary.skipped_invalid += 1;
            return Ok(());
        };

        if !statements.entry_exists(codepoint)? {
            tracing::debug!(
                kanji = %format_codepoint(codepoint),
                "Skipping strokes for kanji without entry"
            );
            summary.skipped_unknown += 1;
            return Ok(());
        }

        let mut root = kanji.root;
        root.number = 0;
        root.element = Some(codepoint);
        statements.insert_stroke_group(codepoint, None, &root)?;

        summary.kanji += 1;
        summary.groups += root.group_count() - 1;
        summary.strokes += root.stroke_count();
        Ok(())
    })?;

    tracing::info!(
        kanji = summary.kanji,
        groups = summary.groups,
        strokes = summary.strokes,
        "KanjiVG imported"
    );
    if summary.skipped_unknown + summary.skipped_invalid > 0 {
        tracing::warn!(
            seen = parsed.kanji,
            unknown = summary.skipped_unknown,
            invalid = summary.skipped_invalid,
            "KanjiVG kanji skipped"
        );
    }

    Ok(summary)
}
