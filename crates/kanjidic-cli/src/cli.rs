//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use kanjidic_core::SearchField;
use std::path::PathBuf;

/// Build and query a kanji database from KANJIDIC2, KanjiVG and JLPT lists
#[derive(Parser, Debug)]
#[command(name = "kanjidic")]
#[command(version)]
#[command(about = "Build and query a kanji database from KANJIDIC2, KanjiVG and JLPT lists")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database path
    #[arg(long = "db", global = true, env = "KANJIDIC_DB_PATH", default_value = "kanjidic2.db")]
    pub db_path: PathBuf,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    pub format: OutputFormat,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// Minimal text output
    Minimal,
}

/// Text table a search runs against
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum FieldArg {
    #[default]
    Meaning,
    Reading,
    Nanori,
}

impl From<FieldArg> for SearchField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Meaning => SearchField::Meaning,
            FieldArg::Reading => SearchField::Reading,
            FieldArg::Nanori => SearchField::Nanori,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a fresh database in one transaction
    Build {
        /// KANJIDIC2 document
        #[arg(long, env = "KANJIDIC_KANJIDIC2", default_value = "3rdparty/kanjidic2.xml")]
        kanjidic2: PathBuf,

        /// KanjiVG document
        #[arg(long, env = "KANJIDIC_KANJIVG", default_value = "3rdparty/kanjivg.xml")]
        kanjivg: PathBuf,

        /// Skip the KanjiVG pass
        #[arg(long)]
        no_kanjivg: bool,

        /// Directory holding jlpt-level1.txt … jlpt-level4.txt
        #[arg(long, env = "KANJIDIC_JLPT_DIR", default_value = "data")]
        jlpt_dir: PathBuf,

        /// Meaning languages to keep
        #[arg(long, value_delimiter = ',', default_value = "en")]
        lang: Vec<String>,

        /// Roll back a failing entry before aborting
        #[arg(long)]
        entry_savepoints: bool,

        /// Replace an existing database file
        #[arg(long)]
        overwrite: bool,
    },

    /// Show database status and statistics
    Status,

    /// Show one kanji
    Lookup {
        /// The kanji, as a single character
        kanji: String,
    },

    /// Full-text search over meanings, readings or nanori
    Search {
        /// Search query
        query: String,

        /// Table to search
        #[arg(long, default_value = "meaning")]
        field: FieldArg,

        /// Limit results
        #[arg(short = 'n', long, default_value_t = kanjidic_db::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
}
