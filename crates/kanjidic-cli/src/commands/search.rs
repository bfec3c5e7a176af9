//! Search command - full-text search over the text tables

use anyhow::Result;
use kanjidic_core::SearchField;
use kanjidic_db::KanjiDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human, json};

pub fn run(
    cli: &Cli,
    db: &KanjiDb,
    query: &str,
    field: SearchField,
    limit: usize,
) -> Result<()> {
    let hits = db.search(query, field, limit)?;

    match cli.format {
        OutputFormat::Human => {
            if hits.is_empty() {
                println!("{}", colors::warning(&format!("No matches for '{}'", query)));
                return Ok(());
            }
            println!(
                "{}",
                colors::header(&format!("{} matches in {}", hits.len(), field.as_str()))
            );
            println!();
            for hit in &hits {
                println!("{}", human::format_hit(hit));
            }
        }

        OutputFormat::Json => {
            // One object per line
            for hit in &hits {
                println!("{}", json::format_hit(hit));
            }
        }

        OutputFormat::Minimal => {
            let kanji: String = hits.iter().filter_map(|h| h.character()).collect();
            println!("{}", kanji);
        }
    }

    Ok(())
}
