//! Streaming KanjiVG parser
//!
//! `<kanjis>` holds one `<kanji midashi="…">` per character, each with a tree
//! of `<strokegr>` groups ending in `<stroke>` leaves. Groups nest to any depth
//! in the data, so [`parse_group`] recurses on itself and refuses to go deeper
//! than [`MAX_GROUP_DEPTH`].

use quick_xml::events::BytesStart;
use serde::Serialize;
use std::io::BufRead;

use crate::codepoint::single_char_to_codepoint;
use crate::error::ParseError;
use crate::types::{GroupChild, KanjiStrokes, Stroke, StrokeGroup};
use crate::xml::{element_name, XmlEvent, XmlStream};

/// Deepest stroke-group nesting accepted below a `<kanji>`
pub const MAX_GROUP_DEPTH: usize = 64;

/// Counts gathered over one KanjiVG pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KanjivgSummary {
    pub kanji: usize,
    pub groups: usize,
    pub strokes: usize,
}

/// Parse a KanjiVG document, handing each kanji's stroke tree to `sink`.
pub fn parse_kanjivg<R, E, F>(input: R, mut sink: F) -> Result<KanjivgSummary, E>
where
    R: BufRead,
    E: From<ParseError>,
    F: FnMut(KanjiStrokes) -> Result<(), E>,
{
    let mut stream = XmlStream::new(input);
    let mut summary = KanjivgSummary::default();

    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) if e.local_name().as_ref() == b"kanjis" => {
                parse_kanjis(&mut stream, &mut summary, &mut sink)?;
            }
            XmlEvent::Start(e) => stream.skip_element(&element_name(&e))?,
            XmlEvent::Eof => return Ok(summary),
            XmlEvent::Empty(_) | XmlEvent::Text(_) | XmlEvent::End => {}
        }
    }
}

fn parse_kanjis<R, E, F>(
    stream: &mut XmlStream<R>,
    summary: &mut KanjivgSummary,
    sink: &mut F,
) -> Result<(), E>
where
    R: BufRead,
    E: From<ParseError>,
    F: FnMut(KanjiStrokes) -> Result<(), E>,
{
    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) if e.local_name().as_ref() == b"kanji" => {
                let kanji = parse_kanji(stream, &e)?;
                summary.kanji += 1;
                // the synthetic root is not counted
                summary.groups += kanji.root.group_count() - 1;
                summary.strokes += kanji.root.stroke_count();
                tracing::trace!(midashi = %kanji.midashi, "Parsed stroke tree");
                sink(kanji)?;
            }
            XmlEvent::Empty(e) if e.local_name().as_ref() == b"kanji" => {
                let kanji = kanji_strokes(stream.attr(&e, &["midashi"])?, StrokeGroup::default());
                summary.kanji += 1;
                sink(kanji)?;
            }
            XmlEvent::Start(e) => stream.skip_element(&element_name(&e))?,
            XmlEvent::End => return Ok(()),
            XmlEvent::Eof => return Err(ParseError::UnexpectedEof("kanjis".to_string()).into()),
            XmlEvent::Empty(_) | XmlEvent::Text(_) => {}
        }
    }
}

fn parse_kanji<R: BufRead>(
    stream: &mut XmlStream<R>,
    element: &BytesStart<'_>,
) -> Result<KanjiStrokes, ParseError> {
    let midashi = stream.attr(element, &["midashi"])?;
    let label = midashi.clone().unwrap_or_default();
    let mut root = StrokeGroup::default();

    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) if e.local_name().as_ref() == b"strokegr" => {
                let number = next_group_number(&root);
                let group = parse_group(stream, &e, number, 1, &label)?;
                root.children.push(GroupChild::Group(group));
            }
            XmlEvent::Empty(e) if e.local_name().as_ref() == b"strokegr" => {
                let number = next_group_number(&root);
                let group = empty_group(stream, &e, number)?;
                root.children.push(GroupChild::Group(group));
            }
            XmlEvent::Start(e) => stream.skip_element(&element_name(&e))?,
            XmlEvent::End => break,
            XmlEvent::Eof => return Err(ParseError::UnexpectedEof("kanji".to_string())),
            XmlEvent::Empty(_) | XmlEvent::Text(_) => {}
        }
    }

    Ok(kanji_strokes(midashi, root))
}

/// Parse one `<strokegr>` whose start tag was just read, recursing into subgroups
fn parse_group<R: BufRead>(
    stream: &mut XmlStream<R>,
    element: &BytesStart<'_>,
    number: u32,
    depth: usize,
    midashi: &str,
) -> Result<StrokeGroup, ParseError> {
    if depth > MAX_GROUP_DEPTH {
        return Err(ParseError::TooDeep {
            midashi: midashi.to_string(),
            max: MAX_GROUP_DEPTH,
        });
    }

    let mut group = empty_group(stream, element, number)?;

    loop {
        match stream.next_event()? {
            XmlEvent::Start(e) => match e.local_name().as_ref() {
                b"strokegr" => {
                    let number = next_group_number(&group);
                    let child = parse_group(stream, &e, number, depth + 1, midashi)?;
                    group.children.push(GroupChild::Group(child));
                }
                b"stroke" => {
                    let stroke = parse_stroke(stream, &e)?;
                    stream.skip_element("stroke")?;
                    group.children.push(GroupChild::Stroke(stroke));
                }
                _ => stream.skip_element(&element_name(&e))?,
            },
            XmlEvent::Empty(e) => match e.local_name().as_ref() {
                b"strokegr" => {
                    let number = next_group_number(&group);
                    let child = empty_group(stream, &e, number)?;
                    group.children.push(GroupChild::Group(child));
                }
                b"stroke" => {
                    let stroke = parse_stroke(stream, &e)?;
                    group.children.push(GroupChild::Stroke(stroke));
                }
                _ => {}
            },
            XmlEvent::End => return Ok(group),
            XmlEvent::Eof => return Err(ParseError::UnexpectedEof("strokegr".to_string())),
            XmlEvent::Text(_) => {}
        }
    }
}

/// A group built from its start tag alone
fn empty_group<R: BufRead>(
    stream: &XmlStream<R>,
    element: &BytesStart<'_>,
    number: u32,
) -> Result<StrokeGroup, ParseError> {
    Ok(StrokeGroup {
        number,
        element: char_attr(stream, element, &["element", "kvg:element"])?,
        original: char_attr(stream, element, &["original", "kvg:original"])?,
        children: Vec::new(),
    })
}

fn parse_stroke<R: BufRead>(
    stream: &XmlStream<R>,
    element: &BytesStart<'_>,
) -> Result<Stroke, ParseError> {
    let stroke_type = stream
        .attr(element, &["type", "kvg:type"])?
        .and_then(|t| t.chars().next())
        .map(|c| c as u32);
    let path = stream.attr(element, &["path", "d"])?;
    Ok(Stroke { stroke_type, path })
}

/// Codepoint of a single-character attribute; anything else reads as absent
fn char_attr<R: BufRead>(
    stream: &XmlStream<R>,
    element: &BytesStart<'_>,
    names: &[&str],
) -> Result<Option<u32>, ParseError> {
    Ok(stream
        .attr(element, names)?
        .and_then(|v| single_char_to_codepoint(&v).ok()))
}

fn next_group_number(parent: &StrokeGroup) -> u32 {
    let groups = parent
        .children
        .iter()
        .filter(|c| matches!(c, GroupChild::Group(_)))
        .count();
    groups as u32 + 1
}

fn kanji_strokes(midashi: Option<String>, mut root: StrokeGroup) -> KanjiStrokes {
    let midashi = midashi.unwrap_or_default();
    let codepoint = single_char_to_codepoint(&midashi).ok();
    root.number = 0;
    root.element = codepoint;
    KanjiStrokes {
        midashi,
        codepoint,
        root,
    }
}
