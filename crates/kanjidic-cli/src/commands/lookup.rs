//! Lookup command - show one kanji

use anyhow::{bail, Result};
use kanjidic_core::single_char_to_codepoint;
use kanjidic_db::KanjiDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::{human, json};

pub fn run(cli: &Cli, db: &KanjiDb, kanji: &str) -> Result<()> {
    let codepoint = single_char_to_codepoint(kanji.trim())?;
    let Some(kanji) = char::from_u32(codepoint) else {
        bail!("Not a character: {}", kanji);
    };

    let Some(entry) = db.get_entry(kanji)? else {
        bail!("Kanji not found: {}", kanji);
    };
    let strokes = db.stroke_counts(kanji)?;

    match cli.format {
        OutputFormat::Human => {
            println!("{}", human::format_entry(&entry, &strokes));
        }
        OutputFormat::Json => {
            let output = json::format_entry(&entry, &strokes);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            let meanings: Vec<&str> = entry.meanings.iter().map(|m| m.text.as_str()).collect();
            println!("{}\t{}", kanji, meanings.join("; "));
        }
    }

    Ok(())
}
