//! kanjidic-core - Record model and dictionary parsers for the kanji database
//!
//! This crate knows nothing about SQL. It turns the two XML dictionaries into
//! in-memory records and hands them, one at a time, to a caller-supplied sink.

pub mod codepoint;
pub mod error;
pub mod kanjidic2;
pub mod kanjivg;
pub mod types;
mod xml;

pub use codepoint::*;
pub use error::*;
pub use kanjidic2::{parse_kanjidic2, Kanjidic2Options, Kanjidic2Summary};
pub use kanjivg::{parse_kanjivg, KanjivgSummary, MAX_GROUP_DEPTH};
pub use types::*;

/// Schema revision stored in the `info` table of every database we build
pub const KANJIDIC2DB_REVISION: i32 = 1;
