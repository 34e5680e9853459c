//! Sidecar writer.
//!
//! Each document is written as: root start, common fields (provider ids
//! on the first document only), kind fields, stream details, foreign
//! elements carried over from the previous file, root end.

mod common;
mod kinds;
mod media;

use std::fmt::Display;

use nfo_core::{DateFormat, MetadataRecord, NfoOptions};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::Result;
use crate::merge::foreign_elements;
use crate::schema::TagSchema;
use crate::split::{document_count, overview_segment, title_segment};
use crate::text::sanitize;

const INDENT: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct NfoWriter {
    options: NfoOptions,
}

impl NfoWriter {
    pub fn new(options: NfoOptions) -> Self {
        Self { options }
    }

    /// Serialize `record`. Elements of `prior` this save does not manage
    /// are copied through unchanged when the record is a single document.
    pub fn write(&self, record: &MetadataRecord, prior: Option<&[u8]>) -> Result<Vec<u8>> {
        let dates = self.options.date_format()?;
        let count = document_count(record);
        let foreign = match prior {
            Some(prior) if count == 1 => {
                foreign_elements(prior, &TagSchema::for_record(record, &self.options))
            }
            _ => Vec::new(),
        };

        let mut out = XmlOut::new();
        out.declaration()?;
        let root = record.kind.root_element();
        for index in 0..count {
            let doc = Document {
                options: &self.options,
                dates: &dates,
                index,
                count,
            };
            out.start(root)?;
            common::write(&doc, &mut out, record)?;
            kinds::write(&doc, &mut out, record)?;
            media::write(&mut out, record)?;
            for element in &foreign {
                out.raw(element)?;
            }
            out.end(root)?;
        }
        Ok(out.finish())
    }
}

/// One root document of the output.
pub(crate) struct Document<'a> {
    pub options: &'a NfoOptions,
    pub dates: &'a DateFormat,
    pub index: usize,
    pub count: usize,
}

impl Document<'_> {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_single(&self) -> bool {
        self.count == 1
    }

    pub fn title<'r>(&self, title: &'r str) -> &'r str {
        title_segment(title, self.index, self.count)
    }

    pub fn overview(&self, overview: &str) -> String {
        overview_segment(overview, self.index, self.count)
    }
}

/// Thin layer over the event writer. Every text value passes through
/// [`sanitize`].
pub(crate) struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', INDENT),
        }
    }

    fn declaration(&mut self) -> Result<()> {
        self.writer.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("utf-8"),
            Some("yes"),
        )))?;
        Ok(())
    }

    pub fn start(&mut self, name: &str) -> Result<()> {
        self.start_with(name, &[])
    }

    pub fn start_with(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for (key, value) in attrs {
            start.push_attribute((*key, &*sanitize(value)));
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// `<name>value</name>`, written even when `value` is empty.
    pub fn element(&mut self, name: &str, value: &str) -> Result<()> {
        self.element_with(name, &[], value)
    }

    pub fn element_with(&mut self, name: &str, attrs: &[(&str, &str)], value: &str) -> Result<()> {
        self.start_with(name, attrs)?;
        let value = sanitize(value);
        self.writer
            .write_event(Event::Text(BytesText::new(&value)))?;
        self.end(name)
    }

    /// Written only when `value` is present and not blank.
    pub fn opt<T: Display>(&mut self, name: &str, value: Option<T>) -> Result<()> {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.element(name, &value)?;
            }
        }
        Ok(())
    }

    pub fn each<'v>(&mut self, name: &str, values: impl IntoIterator<Item = &'v String>) -> Result<()> {
        for value in values {
            self.opt(name, Some(value))?;
        }
        Ok(())
    }

    /// Source bytes of an element from another document, on a line of
    /// their own.
    pub fn raw(&mut self, element: &[u8]) -> Result<()> {
        self.writer.write_indent()?;
        self.writer.get_mut().extend_from_slice(element);
        Ok(())
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
