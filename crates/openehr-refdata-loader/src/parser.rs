//! Generic XML element reader.
//!
//! Provides a pull parser over reference documents built on `quick-xml`.
//! Only element boundaries and attributes are surfaced: every reference
//! document stores its data in attributes, never in text content.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::types::{RefDataError, RefDataResult};

/// Trait for types that can be built from the attributes of one element.
///
/// Implement this trait for each record type of a reference document.
pub trait XmlRecord: Sized {
    /// Local name of the element this record is read from.
    const ELEMENT: &'static str;

    /// Builds a record from element attributes.
    ///
    /// Missing attributes take their empty/zero value; this never fails.
    fn from_attributes(attributes: &Attributes) -> Self;
}

/// The attributes of one element, keyed by local name, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Gets the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Gets an attribute as an owned string, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Gets a numeric attribute; absent or malformed values are 0.
    pub fn integer(&self, name: &str) -> u32 {
        self.get(name).map(parse::integer).unwrap_or(0)
    }

    /// Gets a boolean attribute; only the literal `"true"` is true.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(parse::flag)
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the element has no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_start(start: &BytesStart<'_>) -> quick_xml::Result<Self> {
        let mut values = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            // Unknown entity references are kept verbatim rather than failing the document.
            let value = match attribute.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&attribute.value).into_owned(),
            };
            values.push((key, value));
        }
        Ok(Self(values))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An element boundary read from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// An opening (or self-closing) tag.
    Open {
        /// Local element name, without namespace prefix.
        name: String,
        /// Element attributes.
        attributes: Attributes,
        /// True for `<element/>`; no matching `Close` follows.
        self_closing: bool,
    },
    /// A closing tag.
    Close {
        /// Local element name, without namespace prefix.
        name: String,
    },
}

/// A streaming reader over the elements of an XML document.
///
/// Malformed markup (including mismatched end tags) yields one error and
/// ends the iteration.
pub struct XmlEventReader<'a> {
    reader: Reader<&'a [u8]>,
    elements_read: usize,
    /// Names of the elements opened but not yet closed.
    open_elements: Vec<String>,
    finished: bool,
}

impl<'a> XmlEventReader<'a> {
    /// Creates a reader over a document held in memory.
    pub fn new(content: &'a str) -> Self {
        Self {
            reader: Reader::from_str(content),
            elements_read: 0,
            open_elements: Vec::new(),
            finished: false,
        }
    }

    /// Returns the number of opening tags read so far.
    pub fn elements_read(&self) -> usize {
        self.elements_read
    }

    fn open(&mut self, start: &BytesStart<'_>, self_closing: bool) -> RefDataResult<XmlEvent> {
        self.elements_read += 1;
        let attributes = Attributes::from_start(start).map_err(|e| self.xml_error(e))?;
        Ok(XmlEvent::Open {
            name: local_name(start.local_name().as_ref()),
            attributes,
            self_closing,
        })
    }

    fn xml_error(&mut self, source: quick_xml::Error) -> RefDataError {
        self.finished = true;
        RefDataError::Xml {
            position: self.reader.error_position() as u64,
            source,
        }
    }
}

impl Iterator for XmlEventReader<'_> {
    type Item = RefDataResult<XmlEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(start)) => {
                    let event = self.open(&start, false);
                    if let Ok(XmlEvent::Open { name, .. }) = &event {
                        self.open_elements.push(name.clone());
                    }
                    return Some(event);
                }
                Ok(Event::Empty(start)) => return Some(self.open(&start, true)),
                Ok(Event::End(end)) => {
                    self.open_elements.pop();
                    return Some(Ok(XmlEvent::Close {
                        name: local_name(end.local_name().as_ref()),
                    }))
                }
                Ok(Event::Eof) => {
                    self.finished = true;
                    return self.open_elements.pop().map(|element| {
                        Err(RefDataError::Truncated {
                            element,
                            position: self.reader.buffer_position() as u64,
                        })
                    });
                }
                // Declarations, comments, text and the like carry no data
                Ok(_) => continue,
                Err(e) => return Some(Err(self.xml_error(e))),
            }
        }
    }
}

fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Helper functions for parsing attribute values.
pub mod parse {
    use openehr_refdata_types::well_known;

    /// Parses an unsigned integer, falling back to 0 when malformed.
    pub fn integer(value: &str) -> u32 {
        value.trim().parse::<u32>().unwrap_or(0)
    }

    /// Parses a flag: only the literal `"true"` is true.
    pub fn flag(value: &str) -> bool {
        value == well_known::PRIMARY_TRUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(content: &str) -> Vec<RefDataResult<XmlEvent>> {
        XmlEventReader::new(content).collect()
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse::integer("124"), 124);
        assert_eq!(parse::integer(" 7 "), 7);
        assert_eq!(parse::integer("abc"), 0);
        assert_eq!(parse::integer(""), 0);
        assert_eq!(parse::integer("-3"), 0);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse::flag("true"));
        assert!(!parse::flag("True"));
        assert!(!parse::flag("1"));
        assert!(!parse::flag("false"));
    }

    #[test]
    fn test_attributes_accessors() {
        let attributes: Attributes = [("id", "3"), ("Text", "Temperature"), ("primary", "true")]
            .into_iter()
            .collect();

        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes.get("Text"), Some("Temperature"));
        assert_eq!(attributes.text("missing"), "");
        assert_eq!(attributes.integer("id"), 3);
        assert_eq!(attributes.integer("Text"), 0);
        assert!(attributes.flag("primary"));
        assert!(!attributes.flag("missing"));
    }

    #[test]
    fn test_reads_open_and_close_events() {
        let events = collect(
            r#"<?xml version="1.0"?>
            <!-- comment -->
            <root a="1"><child b="x &amp; y"/></root>"#,
        );

        let events: Vec<XmlEvent> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(events.len(), 3);

        match &events[0] {
            XmlEvent::Open {
                name,
                attributes,
                self_closing,
            } => {
                assert_eq!(name, "root");
                assert_eq!(attributes.get("a"), Some("1"));
                assert!(!self_closing);
            }
            other => panic!("unexpected event {:?}", other),
        }

        match &events[1] {
            XmlEvent::Open {
                name,
                attributes,
                self_closing,
            } => {
                assert_eq!(name, "child");
                assert_eq!(attributes.get("b"), Some("x & y"));
                assert!(self_closing);
            }
            other => panic!("unexpected event {:?}", other),
        }

        assert_eq!(
            events[2],
            XmlEvent::Close {
                name: "root".to_string()
            }
        );
    }

    #[test]
    fn test_namespace_prefix_is_stripped() {
        let events = collect(r#"<t:root xmlns:t="urn:x"><t:leaf t:id="5"/></t:root>"#);
        let names: Vec<String> = events
            .into_iter()
            .filter_map(|e| match e.unwrap() {
                XmlEvent::Open {
                    name, attributes, ..
                } => Some(format!("{}:{}", name, attributes.integer("id"))),
                XmlEvent::Close { .. } => None,
            })
            .collect();

        assert_eq!(names, vec!["root:0", "leaf:5"]);
    }

    #[test]
    fn test_mismatched_end_tag_is_an_error() {
        let mut reader = XmlEventReader::new("<a><b></a>");
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_ok());

        let error = reader.next().unwrap().unwrap_err();
        assert!(matches!(error, RefDataError::Xml { .. }));

        // Iteration stops after the first error
        assert!(reader.next().is_none());
        assert_eq!(reader.elements_read(), 2);
    }

    #[test]
    fn test_unclosed_element_at_end_of_input_is_an_error() {
        let events = collect(r#"<root><child a="1"/><open>"#);
        assert_eq!(events.len(), 4);
        assert!(events[..3].iter().all(|e| e.is_ok()));

        match &events[3] {
            Err(RefDataError::Truncated { element, .. }) => assert_eq!(element, "open"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_truncated_reader_stops() {
        let mut reader = XmlEventReader::new("<root>");
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
