//! kanjidic-indexer - Import pipeline for the kanji database
//!
//! This crate owns all **write** operations. It creates the schema, streams
//! KANJIDIC2 and KanjiVG into it through one set of prepared statements,
//! overlays JLPT levels and finally builds the secondary indexes, all inside a
//! single transaction. The companion `kanjidic-db` crate reads the result.

pub mod builder;
pub mod config;
pub mod connection;
pub mod gateway;
pub mod jlpt;
pub mod kanjidic2;
pub mod schema;
pub mod strokes;

pub use builder::{build_database, import_all, BuildReport, BuildStage, Inputs};
pub use config::{BuildConfig, LevelFile};
pub use connection::{IndexerDb, IndexerError};
pub use gateway::Statements;
pub use jlpt::{apply_level_file, LevelResult};
pub use kanjidic2::import_kanjidic2;
pub use schema::{create_indexes, create_tables};
pub use strokes::{import_kanjivg, StrokeImportSummary};
