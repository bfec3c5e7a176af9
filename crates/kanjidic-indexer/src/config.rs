//! Build configuration

use kanjidic_core::kanjidic2::DEFAULT_LANGUAGE;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::connection::default_db_path;

/// Default location of the KANJIDIC2 document
pub const DEFAULT_KANJIDIC2_PATH: &str = "3rdparty/kanjidic2.xml";

/// Default location of the KanjiVG document
pub const DEFAULT_KANJIVG_PATH: &str = "3rdparty/kanjivg.xml";

/// Default directory holding `jlpt-level{1..4}.txt`
pub const DEFAULT_JLPT_DIR: &str = "data";

/// JLPT levels covered by the standard level files
pub const JLPT_LEVELS: [u8; 4] = [1, 2, 3, 4];

/// A plain-text list of characters belonging to one JLPT level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelFile {
    pub level: u8,
    pub path: PathBuf,
}

impl LevelFile {
    pub fn new(level: u8, path: impl Into<PathBuf>) -> Self {
        Self {
            level,
            path: path.into(),
        }
    }

    /// `jlpt-level1.txt` … `jlpt-level4.txt` inside `dir`
    pub fn standard_set(dir: &Path) -> Vec<LevelFile> {
        JLPT_LEVELS
            .iter()
            .map(|&level| LevelFile::new(level, dir.join(format!("jlpt-level{}.txt", level))))
            .collect()
    }
}

/// Everything one build needs to know
#[derive(Debug, Clone, Serialize)]
pub struct BuildConfig {
    pub db_path: PathBuf,
    pub kanjidic2_path: PathBuf,
    /// `None` skips the stroke pass
    pub kanjivg_path: Option<PathBuf>,
    pub level_files: Vec<LevelFile>,
    /// Meaning languages to keep
    pub languages: Vec<String>,
    /// Wrap each entry in a savepoint so a failing entry leaves no rows
    pub entry_savepoints: bool,
    /// Delete an existing database file before building
    pub overwrite: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            kanjidic2_path: PathBuf::from(DEFAULT_KANJIDIC2_PATH),
            kanjivg_path: Some(PathBuf::from(DEFAULT_KANJIVG_PATH)),
            level_files: LevelFile::standard_set(Path::new(DEFAULT_JLPT_DIR)),
            languages: vec![DEFAULT_LANGUAGE.to_string()],
            entry_savepoints: false,
            overwrite: false,
        }
    }
}
