//! kanjidic - build and query the kanji database

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use kanjidic_db::KanjiDb;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Build writes the database; everything else reads it
    match &cli.command {
        Command::Build {
            kanjidic2,
            kanjivg,
            no_kanjivg,
            jlpt_dir,
            lang,
            entry_savepoints,
            overwrite,
        } => {
            let options = commands::build::BuildArgs {
                kanjidic2: kanjidic2.clone(),
                kanjivg: (!no_kanjivg).then(|| kanjivg.clone()),
                jlpt_dir: jlpt_dir.clone(),
                languages: lang.clone(),
                entry_savepoints: *entry_savepoints,
                overwrite: *overwrite,
            };
            return commands::build::run(&cli, options);
        }
        Command::Status => {
            return commands::status::run(&cli, KanjiDb::open(&cli.db_path));
        }
        _ => {}
    }

    let db = KanjiDb::open(&cli.db_path)?;

    match &cli.command {
        Command::Lookup { kanji } => commands::lookup::run(&cli, &db, kanji),

        Command::Search {
            query,
            field,
            limit,
        } => commands::search::run(&cli, &db, query, (*field).into(), *limit),

        // All other commands handled above
        _ => unreachable!(),
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,kanjidic_cli={level},kanjidic_core={level},kanjidic_indexer={level},kanjidic_db={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
