//! kanjidic-db - Read-only access to a built kanji database
//!
//! Opens the file produced by `kanjidic-indexer`, checks its revision and
//! answers lookups and full-text searches.

pub mod connection;
pub mod queries;

pub use connection::*;
pub use queries::*;
