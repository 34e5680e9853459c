//! Forward-only element cursor over an in-memory document.
//!
//! Subtree readers take the cursor by `&mut` and return once they have
//! consumed their element's end tag, so the caller always resumes at the
//! next sibling.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use tracing::debug;

use crate::{NfoError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A start tag the cursor stopped on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// `<tag/>`: there is no content or end tag to consume.
    pub empty: bool,
    start: usize,
}

impl Element {
    fn from_start(e: &BytesStart<'_>, empty: bool, start: usize) -> Self {
        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = match attr.unescape_value() {
                    Ok(v) => v.into_owned(),
                    Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
                };
                (key, value)
            })
            .collect();
        Self {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            attributes,
            empty,
            start,
        }
    }

    /// Lower-cased tag name used for dispatch.
    pub fn tag(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Attribute value, matching the name case-insensitively.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Direct text plus `(tag, text)` for each child element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub text: String,
    pub children: Vec<(String, String)>,
}

impl Fields {
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|(k, _)| k == tag)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

pub struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
    input: &'a [u8],
}

impl<'a> XmlCursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(false);
        Self { reader, input }
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    /// Offset of the `<` opening the tag that was just read.
    fn tag_start(&self) -> usize {
        let end = self.position().min(self.input.len());
        self.input[..end]
            .iter()
            .rposition(|&b| b == b'<')
            .unwrap_or(0)
    }

    fn element(&self, e: &BytesStart<'_>, empty: bool) -> Element {
        Element::from_start(e, empty, self.tag_start())
    }

    fn unexpected_eof(parent: &str) -> NfoError {
        NfoError::Malformed(format!("unexpected end of document inside <{parent}>"))
    }

    /// Next top-level element, or `None` at end of input.
    pub fn next_root(&mut self) -> Result<Option<Element>> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return Ok(Some(self.element(&e, false))),
                Event::Empty(e) => return Ok(Some(self.element(&e, true))),
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Next child element of `parent`, or `None` once `parent`'s end tag
    /// has been consumed.
    pub fn next_child(&mut self, parent: &Element) -> Result<Option<Element>> {
        if parent.empty {
            return Ok(None);
        }
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return Ok(Some(self.element(&e, false))),
                Event::Empty(e) => return Ok(Some(self.element(&e, true))),
                Event::End(_) => return Ok(None),
                Event::Eof => return Err(Self::unexpected_eof(&parent.name)),
                _ => {}
            }
        }
    }

    /// Text content of `el`, trimmed. Text inside nested elements is not
    /// included; those elements are skipped.
    pub fn read_text(&mut self, el: &Element) -> Result<String> {
        if el.empty {
            return Ok(String::new());
        }
        let mut text = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => match t.unescape() {
                    Ok(s) => text.push_str(&s),
                    Err(e) => {
                        debug!(element = %el.name, error = %e, "keeping unescaped text");
                        text.push_str(&String::from_utf8_lossy(&t));
                    }
                },
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(nested) => {
                    self.reader.read_to_end(nested.name())?;
                }
                Event::End(_) => break,
                Event::Eof => return Err(Self::unexpected_eof(&el.name)),
                _ => {}
            }
        }
        Ok(text.trim().to_string())
    }

    /// Direct text of `el` together with the text of each child element.
    pub fn read_fields(&mut self, el: &Element) -> Result<Fields> {
        let mut fields = Fields::default();
        if el.empty {
            return Ok(fields);
        }
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => {
                    let s: Cow<'_, str> = match t.unescape() {
                        Ok(s) => s,
                        Err(_) => Cow::Owned(String::from_utf8_lossy(&t).into_owned()),
                    };
                    fields.text.push_str(&s);
                }
                Event::CData(c) => fields.text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(e) => {
                    let child = Element::from_start(&e, false, 0);
                    let value = self.read_text(&child)?;
                    fields.children.push((child.tag(), value));
                }
                Event::Empty(e) => {
                    let child = Element::from_start(&e, true, 0);
                    fields.children.push((child.tag(), String::new()));
                }
                Event::End(_) => break,
                Event::Eof => return Err(Self::unexpected_eof(&el.name)),
                _ => {}
            }
        }
        fields.text = fields.text.trim().to_string();
        Ok(fields)
    }

    /// Consume `el` and everything inside it.
    pub fn skip(&mut self, el: &Element) -> Result<()> {
        if !el.empty {
            self.reader.read_to_end(QName(el.name.as_bytes()))?;
        }
        Ok(())
    }

    /// Consume `el` and return its exact source bytes, tags included.
    pub fn raw(&mut self, el: &Element) -> Result<&'a [u8]> {
        self.skip(el)?;
        let end = self.position();
        self.input
            .get(el.start..end)
            .ok_or_else(|| NfoError::Malformed(format!("element <{}> out of range", el.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_children_and_skips_subtrees() {
        let xml = br#"<?xml version="1.0"?>
<movie>
  <title>Alien</title>
  <unknown><deep><deeper>x</deeper></deep></unknown>
  <year>1979</year>
  <empty/>
</movie>"#;
        let mut cursor = XmlCursor::new(xml);
        let root = cursor.next_root().unwrap().unwrap();
        assert_eq!(root.name, "movie");

        let mut seen = Vec::new();
        while let Some(child) = cursor.next_child(&root).unwrap() {
            match child.tag().as_str() {
                "title" | "year" => {
                    let text = cursor.read_text(&child).unwrap();
                    seen.push(format!("{}={}", child.name, text));
                }
                _ => {
                    cursor.skip(&child).unwrap();
                    seen.push(child.name.clone());
                }
            }
        }
        assert_eq!(seen, vec!["title=Alien", "unknown", "year=1979", "empty"]);
        assert!(cursor.next_root().unwrap().is_none());
    }

    #[test]
    fn attributes_are_case_insensitive_and_unescaped() {
        let mut cursor = XmlCursor::new(br#"<uniqueid Type="imdb" note="a &amp; b">tt0078748</uniqueid>"#);
        let el = cursor.next_root().unwrap().unwrap();
        assert_eq!(el.attr("type"), Some("imdb"));
        assert_eq!(el.attr("NOTE"), Some("a & b"));
        assert_eq!(cursor.read_text(&el).unwrap(), "tt0078748");
    }

    #[test]
    fn text_handles_entities_and_cdata() {
        let mut cursor = XmlCursor::new(b"<plot> Tom &amp; Jerry <![CDATA[<b>bold</b>]]> </plot>");
        let el = cursor.next_root().unwrap().unwrap();
        assert_eq!(cursor.read_text(&el).unwrap(), "Tom & Jerry <b>bold</b>");
    }

    #[test]
    fn raw_returns_exact_bytes() {
        let xml = b"<movie>\n  <custom a=\"1\">keep <b>me</b></custom>\n  <title>x</title>\n</movie>";
        let mut cursor = XmlCursor::new(xml);
        let root = cursor.next_root().unwrap().unwrap();
        let custom = cursor.next_child(&root).unwrap().unwrap();
        let raw = cursor.raw(&custom).unwrap();
        assert_eq!(raw, b"<custom a=\"1\">keep <b>me</b></custom>");
        let title = cursor.next_child(&root).unwrap().unwrap();
        assert_eq!(cursor.read_text(&title).unwrap(), "x");
    }

    #[test]
    fn fields_collects_children() {
        let mut cursor = XmlCursor::new(b"<set tmdbcolid=\"8091\">\n <name>Alien Collection</name>\n <overview/>\n</set>");
        let el = cursor.next_root().unwrap().unwrap();
        let fields = cursor.read_fields(&el).unwrap();
        assert_eq!(fields.text, "");
        assert_eq!(fields.get("name"), Some("Alien Collection"));
        assert_eq!(fields.get("overview"), None);
    }

    #[test]
    fn mismatched_tags_are_errors() {
        let mut cursor = XmlCursor::new(b"<movie><title>x</year></movie>");
        let root = cursor.next_root().unwrap().unwrap();
        let title = cursor.next_child(&root).unwrap().unwrap();
        assert!(cursor.read_text(&title).is_err());
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut cursor = XmlCursor::new(b"<movie><title>x</title>");
        let root = cursor.next_root().unwrap().unwrap();
        let title = cursor.next_child(&root).unwrap().unwrap();
        cursor.read_text(&title).unwrap();
        assert!(cursor.next_child(&root).is_err());
    }

    #[test]
    fn bom_is_ignored() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"<season><seasonnumber>2</seasonnumber></season>");
        let mut cursor = XmlCursor::new(&bytes);
        assert_eq!(cursor.next_root().unwrap().unwrap().name, "season");
    }
}
