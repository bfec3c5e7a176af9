//! Thin event stream over `quick_xml` shared by both dictionary parsers

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

use crate::error::ParseError;

/// Events the parsers care about; declarations, comments and DOCTYPE are dropped
pub(crate) enum XmlEvent {
    Start(BytesStart<'static>),
    Empty(BytesStart<'static>),
    Text(String),
    End,
    Eof,
}

pub(crate) struct XmlStream<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> XmlStream<R> {
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::with_capacity(8192),
        }
    }

    pub fn next_event(&mut self) -> Result<XmlEvent, ParseError> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(source) => return Err(xml_error(&self.reader, source)),
            };

            return match event {
                Event::Start(e) => Ok(XmlEvent::Start(e.into_owned())),
                Event::Empty(e) => Ok(XmlEvent::Empty(e.into_owned())),
                Event::Text(t) => match t.unescape() {
                    Ok(text) => Ok(XmlEvent::Text(text.into_owned())),
                    Err(source) => Err(xml_error(&self.reader, source)),
                },
                Event::CData(c) => Ok(XmlEvent::Text(String::from_utf8_lossy(&c).into_owned())),
                Event::End(_) => Ok(XmlEvent::End),
                Event::Eof => Ok(XmlEvent::Eof),
                _ => continue,
            };
        }
    }

    /// Collect the text content of the element whose start tag was just read.
    /// Nested markup inside it is skipped.
    pub fn read_text(&mut self, element: &str) -> Result<String, ParseError> {
        let mut text = String::new();
        loop {
            match self.next_event()? {
                XmlEvent::Text(t) => text.push_str(&t),
                XmlEvent::Start(_) => self.skip_element(element)?,
                XmlEvent::Empty(_) => {}
                XmlEvent::End => return Ok(text),
                XmlEvent::Eof => return Err(ParseError::UnexpectedEof(element.to_string())),
            }
        }
    }

    /// Consume everything up to and including the end tag of the element
    /// whose start tag was just read.
    pub fn skip_element(&mut self, element: &str) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_event()? {
                XmlEvent::Start(_) => depth += 1,
                XmlEvent::End => depth -= 1,
                XmlEvent::Eof => return Err(ParseError::UnexpectedEof(element.to_string())),
                XmlEvent::Empty(_) | XmlEvent::Text(_) => {}
            }
        }
        Ok(())
    }

    /// Value of the first attribute in `names` present on `element`
    pub fn attr(
        &self,
        element: &BytesStart<'_>,
        names: &[&str],
    ) -> Result<Option<String>, ParseError> {
        for name in names {
            let attr = element
                .try_get_attribute(*name)
                .map_err(|e| xml_error(&self.reader, quick_xml::Error::from(e)))?;
            if let Some(attr) = attr {
                let value = attr
                    .unescape_value()
                    .map_err(|e| xml_error(&self.reader, quick_xml::Error::from(e)))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }
}

fn xml_error<R>(reader: &Reader<R>, source: quick_xml::Error) -> ParseError {
    ParseError::Xml {
        position: reader.buffer_position() as u64,
        source,
    }
}

/// Local (namespace-free) element name as an owned string, for diagnostics
pub(crate) fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}
