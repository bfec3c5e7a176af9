//! Status command - show database statistics

use anyhow::Result;
use kanjidic_db::{DbError, KanjiDb};

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

pub fn run(cli: &Cli, db: Result<KanjiDb, DbError>) -> Result<()> {
    let db = match db {
        Ok(db) => db,
        Err(e) => {
            match cli.format {
                OutputFormat::Human => {
                    println!("{}", colors::error(&e.to_string()));
                    println!();
                    println!("Build the database first:");
                    println!("  kanjidic build");
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "status": "unavailable",
                        "error": e.to_string(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Minimal => {
                    eprintln!("unavailable");
                }
            }
            return Err(e.into());
        }
    };

    let stats = db.stats()?;

    match cli.format {
        OutputFormat::Human => {
            println!("{}", colors::header("Database Status"));
            println!();
            println!(
                "  {}: {}",
                colors::label("Database"),
                stats.db_path.display()
            );
            println!("  {}: {}", colors::label("Size"), stats.format_size());
            println!(
                "  {}: {}",
                colors::label("Revision"),
                colors::value(&stats.version.to_string())
            );
            println!();

            let counts = [
                ("Entries", stats.entry_count),
                ("With JLPT level", stats.jlpt_count),
                ("Readings", stats.reading_count),
                ("Meanings", stats.meaning_count),
                ("Nanori", stats.nanori_count),
                ("Stroke groups", stats.stroke_group_count),
                ("Strokes", stats.stroke_count),
            ];
            for (name, count) in counts {
                println!(
                    "  {}: {}",
                    colors::label(name),
                    colors::format_count(count)
                );
            }

            println!();
            println!("{}", colors::success("Database is ready"));
        }

        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        OutputFormat::Minimal => {
            println!("{}", stats.db_path.display());
        }
    }

    Ok(())
}
