//! Build orchestration
//!
//! One build is one transaction: schema, KANJIDIC2 pass, KanjiVG pass, level
//! overlay and indexes are all committed together or not at all.

use kanjidic_core::{Kanjidic2Options, Kanjidic2Summary};
use rusqlite::Connection;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::connection::{IndexerDb, IndexerError};
use crate::gateway::Statements;
use crate::jlpt::{apply_level_file, LevelResult};
use crate::kanjidic2::import_kanjidic2;
use crate::schema;
use crate::strokes::{import_kanjivg, StrokeImportSummary};

/// Stage about to run, reported through the progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Schema,
    Kanjidic2,
    KanjiVg,
    Level(u8),
    Indexes,
    Commit,
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStage::Schema => write!(f, "Creating schema"),
            BuildStage::Kanjidic2 => write!(f, "Importing KANJIDIC2"),
            BuildStage::KanjiVg => write!(f, "Importing KanjiVG"),
            BuildStage::Level(level) => write!(f, "Applying JLPT level {}", level),
            BuildStage::Indexes => write!(f, "Creating indexes"),
            BuildStage::Commit => write!(f, "Committing"),
        }
    }
}

/// Opened dictionary documents
pub struct Inputs<'a> {
    pub kanjidic2: Box<dyn BufRead + 'a>,
    pub kanjivg: Option<Box<dyn BufRead + 'a>>,
}

impl Inputs<'static> {
    /// Open the documents named by `config`
    pub fn open(config: &BuildConfig) -> Result<Self, IndexerError> {
        let kanjidic2 = open_input(&config.kanjidic2_path)?;
        let kanjivg = match &config.kanjivg_path {
            Some(path) => Some(open_input(path)?),
            None => None,
        };
        Ok(Self { kanjidic2, kanjivg })
    }
}

impl<'a> Inputs<'a> {
    pub fn from_readers(
        kanjidic2: impl BufRead + 'a,
        kanjivg: Option<Box<dyn BufRead + 'a>>,
    ) -> Self {
        Self {
            kanjidic2: Box::new(kanjidic2),
            kanjivg,
        }
    }
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>, IndexerError> {
    let file = File::open(path).map_err(|source| IndexerError::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Result of a build
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub db_path: PathBuf,
    pub kanjidic2: Kanjidic2Summary,
    /// `None` when no KanjiVG document was configured
    pub strokes: Option<StrokeImportSummary>,
    pub levels: Vec<LevelResult>,
    /// Level files that could not be opened
    pub missing_level_files: Vec<PathBuf>,
}

/// Build a fresh database from the documents named in `config`.
///
/// Inputs and the target are opened before anything is written. Every later
/// failure drops the transaction uncommitted.
pub fn build_database<F>(
    config: &BuildConfig,
    mut on_progress: F,
) -> Result<BuildReport, IndexerError>
where
    F: FnMut(BuildStage),
{
    let inputs = Inputs::open(config)?;
    let mut db = IndexerDb::open_for_build(&config.db_path, config.overwrite)?;

    let tx = db.connection_mut().transaction()?;

    on_progress(BuildStage::Schema);
    schema::create_tables(&tx)?;

    let mut report = import_all(&tx, inputs, config, &mut on_progress)?;

    on_progress(BuildStage::Commit);
    tx.commit()?;

    report.db_path = config.db_path.clone();
    tracing::info!(db = %config.db_path.display(), "Committed");
    Ok(report)
}

/// Run every pass against a connection whose tables already exist.
///
/// The caller owns the transaction; nothing here commits.
pub fn import_all<F>(
    conn: &Connection,
    inputs: Inputs<'_>,
    config: &BuildConfig,
    on_progress: &mut F,
) -> Result<BuildReport, IndexerError>
where
    F: FnMut(BuildStage),
{
    let mut report = BuildReport::default();
    let mut statements = Statements::prepare(conn)?;

    on_progress(BuildStage::Kanjidic2);
    let options = Kanjidic2Options::with_languages(config.languages.iter().cloned());
    report.kanjidic2 = import_kanjidic2(
        &mut statements,
        inputs.kanjidic2,
        &options,
        config.entry_savepoints,
    )?;

    if let Some(kanjivg) = inputs.kanjivg {
        on_progress(BuildStage::KanjiVg);
        report.strokes = Some(import_kanjivg(&mut statements, kanjivg)?);
    }

    for level_file in &config.level_files {
        on_progress(BuildStage::Level(level_file.level));
        match apply_level_file(&mut statements, &level_file.path, level_file.level) {
            Ok(result) => report.levels.push(result),
            Err(IndexerError::LevelFileOpen { path, source }) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %source,
                    "Level file not applied"
                );
                report.missing_level_files.push(path);
            }
            Err(e) => return Err(e),
        }
    }

    drop(statements);

    on_progress(BuildStage::Indexes);
    schema::create_indexes(conn)?;

    Ok(report)
}
