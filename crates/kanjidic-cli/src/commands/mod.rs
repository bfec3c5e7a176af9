//! CLI command implementations

pub mod build;
pub mod lookup;
pub mod search;
pub mod status;
