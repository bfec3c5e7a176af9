//! Error types for codepoint extraction and dictionary parsing

use thiserror::Error;

/// A field that should hold exactly one character did not
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodepointError {
    #[error("expected a single character, got an empty string")]
    Empty,

    #[error("expected a single character, got {count} in {text:?}")]
    TooManyChars { text: String, count: usize },
}

/// Dictionary parsing errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    #[error("<character> element without a <literal>")]
    MissingLiteral,

    #[error("invalid <literal>: {0}")]
    Literal(#[from] CodepointError),

    #[error("invalid number in <{field}>: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("stroke groups of {midashi:?} nested deeper than {max} levels")]
    TooDeep { midashi: String, max: usize },
}
