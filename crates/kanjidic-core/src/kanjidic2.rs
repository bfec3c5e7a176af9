//! Streaming KANJIDIC2 parser
//!
//! Walks `<kanjidic2>` one `<character>` at a time. Each element has its own
//! function that consumes events up to its closing tag, so nesting follows the
//! native call stack. A finished [`KanjiRecord`] is handed to the sink as soon
//! as its `</character>` is read; nothing is buffered beyond one entry.

use quick_xml::events::BytesStart;
use serde::Serialize;
use std::io::BufRead;
use std::str::FromStr;

use crate::codepoint::{format_codepoint, single_char_to_codepoint};
use crate::error::ParseError;
use crate::types::{KanjiRecord, Meaning, Reading, ReadingType};
use crate::xml::{element_name, XmlEvent, XmlStream};

/// Language assumed for a `<meaning>` without `m_lang`
pub const DEFAULT_LANGUAGE: &str = "en";

/// Parser options
#[derive(Debug, Clone)]
pub struct Kanjidic2Options {
    /// Meaning languages to keep, in storage order
    pub languages: Vec<String>,
}

impl Default for Kanjidic2Options {
    fn default() -> Self {
        Self {
            languages: vec![DEFAULT_LANGUAGE.to_string()],
        }
    }
}

impl Kanjidic2Options {
    pub fn with_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    fn keeps_language(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }
}

/// Counts gathered over one KANJIDIC2 pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Kanjidic2Summary {
    pub entries: usize,
    pub readings: usize,
    pub readings_discarded: usize,
    pub meanings: usize,
    pub meanings_discarded: usize,
    pub nanori: usize,
}

/// Parse a KANJIDIC2 document, handing every entry to `sink` in document order.
///
/// Parse failures are converted into the caller's error type so that a sink
/// error (typically a database failure) and a malformed document abort the
/// pass the same way.
pub fn parse_kanjidic2<R, E, F>(
    input: R,
    options: &Kanjidic2Options,
    mut sink: F,
) -> Result<Kanjidic2Summary, E>
where
    R: BufRead,
    E: From<ParseError>,
    F: FnMut(KanjiRecord) -> Result<(), E>,
{
    let mut stream = XmlStream::new(input);
    let mut summary = Kanjidic2Summary::default();

    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) if e.local_name().as_ref() == b"kanjidic2" => {
                parse_root(&mut stream, options, &mut summary, &mut sink)?;
            }
            XmlEvent::Start(e) => stream.skip_element(&element_name(&e))?,
            XmlEvent::Eof => return Ok(summary),
            XmlEvent::Empty(_) | XmlEvent::Text(_) | XmlEvent::End => {}
        }
    }
}

fn parse_root<R, E, F>(
    stream: &mut XmlStream<R>,
    options: &Kanjidic2Options,
    summary: &mut Kanjidic2Summary,
    sink: &mut F,
) -> Result<(), E>
where
    R: BufRead,
    E: From<ParseError>,
    F: FnMut(KanjiRecord) -> Result<(), E>,
{
    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) if e.local_name().as_ref() == b"character" => {
                let record = parse_character(stream, options, summary)?;
                summary.entries += 1;
                summary.readings += record.readings.len();
                summary.meanings += record.meanings.len();
                summary.nanori += record.nanori.len();
                tracing::trace!(kanji = %format_codepoint(record.codepoint), "Parsed entry");
                sink(record)?;
            }
            // <header> and anything unknown
            XmlEvent::Start(e) => stream.skip_element(&element_name(&e))?,
            XmlEvent::End => return Ok(()),
            XmlEvent::Eof => return Err(ParseError::UnexpectedEof("kanjidic2".to_string()).into()),
            XmlEvent::Empty(_) | XmlEvent::Text(_) => {}
        }
    }
}

fn parse_character<R: BufRead>(
    stream: &mut XmlStream<R>,
    options: &Kanjidic2Options,
    summary: &mut Kanjidic2Summary,
) -> Result<KanjiRecord, ParseError> {
    let mut literal = None;
    let mut record = KanjiRecord::default();

    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) => match e.local_name().as_ref() {
                b"literal" => {
                    let text = stream.read_text("literal")?;
                    literal = Some(single_char_to_codepoint(&text)?);
                }
                b"misc" => parse_misc(stream, &mut record)?,
                b"reading_meaning" => {
                    parse_reading_meaning(stream, options, summary, &mut record)?
                }
                _ => stream.skip_element(&element_name(&e))?,
            },
            XmlEvent::End => break,
            XmlEvent::Eof => return Err(ParseError::UnexpectedEof("character".to_string())),
            XmlEvent::Empty(_) | XmlEvent::Text(_) => {}
        }
    }

    record.codepoint = literal.ok_or(ParseError::MissingLiteral)?;
    Ok(record)
}

fn parse_misc<R: BufRead>(
    stream: &mut XmlStream<R>,
    record: &mut KanjiRecord,
) -> Result<(), ParseError> {
    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) => match e.local_name().as_ref() {
                b"grade" => record.grade = Some(read_number(stream, "grade")?),
                // Repeated counts overwrite each other; the last one is stored
                b"stroke_count" => record.stroke_count = Some(read_number(stream, "stroke_count")?),
                b"freq" => record.frequency = Some(read_number(stream, "freq")?),
                b"jlpt" => record.jlpt = Some(read_number(stream, "jlpt")?),
                _ => stream.skip_element(&element_name(&e))?,
            },
            XmlEvent::End => return Ok(()),
            XmlEvent::Eof => return Err(ParseError::UnexpectedEof("misc".to_string())),
            XmlEvent::Empty(_) | XmlEvent::Text(_) => {}
        }
    }
}

fn parse_reading_meaning<R: BufRead>(
    stream: &mut XmlStream<R>,
    options: &Kanjidic2Options,
    summary: &mut Kanjidic2Summary,
    record: &mut KanjiRecord,
) -> Result<(), ParseError> {
    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) => match e.local_name().as_ref() {
                b"rmgroup" => parse_rmgroup(stream, options, summary, record)?,
                b"nanori" => {
                    let text = stream.read_text("nanori")?;
                    record.nanori.push(text);
                }
                _ => stream.skip_element(&element_name(&e))?,
            },
            XmlEvent::End => return Ok(()),
            XmlEvent::Eof => return Err(ParseError::UnexpectedEof("reading_meaning".to_string())),
            XmlEvent::Empty(_) | XmlEvent::Text(_) => {}
        }
    }
}

fn parse_rmgroup<R: BufRead>(
    stream: &mut XmlStream<R>,
    options: &Kanjidic2Options,
    summary: &mut Kanjidic2Summary,
    record: &mut KanjiRecord,
) -> Result<(), ParseError> {
    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) => match e.local_name().as_ref() {
                b"reading" => parse_reading(stream, &e, summary, record)?,
                b"meaning" => parse_meaning(stream, &e, options, summary, record)?,
                _ => stream.skip_element(&element_name(&e))?,
            },
            XmlEvent::End => return Ok(()),
            XmlEvent::Eof => return Err(ParseError::UnexpectedEof("rmgroup".to_string())),
            XmlEvent::Empty(_) | XmlEvent::Text(_) => {}
        }
    }
}

fn parse_reading<R: BufRead>(
    stream: &mut XmlStream<R>,
    element: &BytesStart<'_>,
    summary: &mut Kanjidic2Summary,
    record: &mut KanjiRecord,
) -> Result<(), ParseError> {
    let r_type = stream.attr(element, &["r_type"])?;
    let text = stream.read_text("reading")?;

    match r_type.as_deref().and_then(ReadingType::from_attr) {
        Some(reading_type) => record.readings.push(Reading { text, reading_type }),
        None => summary.readings_discarded += 1,
    }
    Ok(())
}

fn parse_meaning<R: BufRead>(
    stream: &mut XmlStream<R>,
    element: &BytesStart<'_>,
    options: &Kanjidic2Options,
    summary: &mut Kanjidic2Summary,
    record: &mut KanjiRecord,
) -> Result<(), ParseError> {
    let lang = stream
        .attr(element, &["m_lang"])?
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let text = stream.read_text("meaning")?;

    if options.keeps_language(&lang) {
        record.meanings.push(Meaning { text, lang });
    } else {
        summary.meanings_discarded += 1;
    }
    Ok(())
}

fn read_number<R: BufRead, T: FromStr>(
    stream: &mut XmlStream<R>,
    field: &'static str,
) -> Result<T, ParseError> {
    let text = stream.read_text(field)?;
    text.trim().parse().map_err(|_| ParseError::InvalidNumber { field, value: text })
}
