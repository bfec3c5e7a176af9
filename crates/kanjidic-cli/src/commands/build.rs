//! Build command - create the database from the source documents

use anyhow::{Context, Result};
use kanjidic_indexer::{build_database, BuildConfig, BuildReport, LevelFile};
use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

/// Build flags after parsing
#[derive(Debug, Clone)]
pub struct BuildArgs {
    pub kanjidic2: PathBuf,
    pub kanjivg: Option<PathBuf>,
    pub jlpt_dir: PathBuf,
    pub languages: Vec<String>,
    pub entry_savepoints: bool,
    pub overwrite: bool,
}

impl BuildArgs {
    fn into_config(self, db_path: PathBuf) -> BuildConfig {
        BuildConfig {
            db_path,
            kanjidic2_path: self.kanjidic2,
            kanjivg_path: self.kanjivg,
            level_files: LevelFile::standard_set(&self.jlpt_dir),
            languages: self.languages,
            entry_savepoints: self.entry_savepoints,
            overwrite: self.overwrite,
        }
    }
}

pub fn run(cli: &Cli, args: BuildArgs) -> Result<()> {
    let config = args.into_config(cli.db_path.clone());
    tracing::debug!(?config, "Build configuration");

    let report = build_database(&config, |stage| {
        if let OutputFormat::Human = cli.format {
            eprintln!("{}", colors::label(&format!("{}...", stage)));
        }
    })
    .with_context(|| format!("Building {} failed", config.db_path.display()))?;

    match cli.format {
        OutputFormat::Human => {
            print_human(&report);
            println!("{}", colors::success("Committed"));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Minimal => println!("Committed"),
    }

    Ok(())
}

fn print_human(report: &BuildReport) {
    println!("{}", colors::header("Build Summary"));
    println!();
    println!(
        "  {}: {}",
        colors::label("Database"),
        report.db_path.display()
    );
    println!(
        "  {}: {}",
        colors::label("Entries"),
        colors::format_count(report.kanjidic2.entries as i64)
    );
    println!(
        "  {}: {}",
        colors::label("Readings"),
        colors::format_count(report.kanjidic2.readings as i64)
    );
    println!(
        "  {}: {}",
        colors::label("Meanings"),
        colors::format_count(report.kanjidic2.meanings as i64)
    );
    println!(
        "  {}: {}",
        colors::label("Nanori"),
        colors::format_count(report.kanjidic2.nanori as i64)
    );

    if let Some(strokes) = &report.strokes {
        println!(
            "  {}: {} kanji, {} groups, {} strokes",
            colors::label("KanjiVG"),
            colors::format_count(strokes.kanji as i64),
            colors::format_count(strokes.groups as i64),
            colors::format_count(strokes.strokes as i64)
        );
        let skipped = strokes.skipped_unknown + strokes.skipped_invalid;
        if skipped > 0 {
            println!(
                "  {}: {}",
                colors::label("KanjiVG skipped"),
                colors::format_count(skipped as i64)
            );
        }
    }

    for level in &report.levels {
        println!(
            "  {}: {} matched, {} without entry",
            colors::label(&format!("JLPT N{}", level.level)),
            level.matched,
            level.unmatched
        );
    }

    for path in &report.missing_level_files {
        println!(
            "{}",
            colors::warning(&format!("Level file not applied: {}", path.display()))
        );
    }

    println!();
}
