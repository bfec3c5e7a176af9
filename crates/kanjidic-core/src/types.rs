//! Core type definitions for kanji records and stroke trees

use serde::{Deserialize, Serialize};

use crate::codepoint::codepoint_to_char;

/// Reading types kept from KANJIDIC2; every other `r_type` is discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingType {
    On,
    Kun,
}

impl ReadingType {
    /// Every reading type stored in the database
    pub const ALL: [ReadingType; 2] = [ReadingType::On, ReadingType::Kun];

    /// Parse a KANJIDIC2 `r_type` attribute
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "ja_on" => Some(ReadingType::On),
            "ja_kun" => Some(ReadingType::Kun),
            _ => None,
        }
    }

    /// Value stored in `reading.type` (the original attribute text)
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingType::On => "ja_on",
            ReadingType::Kun => "ja_kun",
        }
    }
}

/// A phonetic reading attached to a kanji
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub text: String,
    pub reading_type: ReadingType,
}

/// A language-tagged gloss attached to a kanji
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    pub text: String,
    pub lang: String,
}

/// One KANJIDIC2 `<character>` entry, accumulated while parsing.
///
/// Numeric fields are `None` when the element is absent from the source,
/// which is stored as SQL `NULL` rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiRecord {
    pub codepoint: u32,
    pub grade: Option<u8>,
    pub stroke_count: Option<u8>,
    pub frequency: Option<u16>,
    pub jlpt: Option<u8>,
    pub readings: Vec<Reading>,
    pub meanings: Vec<Meaning>,
    pub nanori: Vec<String>,
}

impl KanjiRecord {
    /// The kanji itself
    pub fn character(&self) -> Option<char> {
        codepoint_to_char(self.codepoint)
    }

    /// Readings of one type, in document order
    pub fn readings_of(&self, reading_type: ReadingType) -> impl Iterator<Item = &str> {
        self.readings
            .iter()
            .filter(move |r| r.reading_type == reading_type)
            .map(|r| r.text.as_str())
    }
}

/// A single stroke of a KanjiVG diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    /// Codepoint of the first character of the `type` attribute (e.g. `㇐`)
    pub stroke_type: Option<u32>,
    /// SVG path description
    pub path: Option<String>,
}

/// Child of a stroke group, kept in document (drawing) order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupChild {
    Group(StrokeGroup),
    Stroke(Stroke),
}

/// A node of the stroke-group tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeGroup {
    /// 1-based position among the parent's child groups, 0 for the root
    pub number: u32,
    /// Component this group draws
    pub element: Option<u32>,
    /// Component the element is a variant of
    pub original: Option<u32>,
    pub children: Vec<GroupChild>,
}

impl StrokeGroup {
    /// Number of groups in this subtree, this one included
    pub fn group_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| match c {
                GroupChild::Group(g) => g.group_count(),
                GroupChild::Stroke(_) => 0,
            })
            .sum::<usize>()
    }

    /// Number of strokes in this subtree
    pub fn stroke_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                GroupChild::Group(g) => g.stroke_count(),
                GroupChild::Stroke(_) => 1,
            })
            .sum()
    }

    /// Strokes of this subtree in drawing order
    pub fn strokes(&self) -> Vec<&Stroke> {
        let mut out = Vec::new();
        self.collect_strokes(&mut out);
        out
    }

    fn collect_strokes<'a>(&'a self, out: &mut Vec<&'a Stroke>) {
        for child in &self.children {
            match child {
                GroupChild::Group(g) => g.collect_strokes(out),
                GroupChild::Stroke(s) => out.push(s),
            }
        }
    }
}

/// Stroke data for one KanjiVG `<kanji>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiStrokes {
    /// Raw `midashi` attribute
    pub midashi: String,
    /// Codepoint of `midashi`, `None` when it is not a single character
    pub codepoint: Option<u32>,
    /// Synthetic root group; the document's groups are its children
    pub root: StrokeGroup,
}

/// Which full-text table a search runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    Meaning,
    Reading,
    Nanori,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Meaning => "meaning",
            SearchField::Reading => "reading",
            SearchField::Nanori => "nanori",
        }
    }
}

/// A full-text search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub codepoint: u32,
    pub field: SearchField,
    pub text: String,
}

impl SearchHit {
    pub fn character(&self) -> Option<char> {
        codepoint_to_char(self.codepoint)
    }
}
