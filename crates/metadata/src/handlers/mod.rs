//! Element handlers, keyed by lower-cased tag name.
//!
//! Lookup order for a child of the root element:
//! 1. the item kind's own table
//! 2. the common table
//! 3. the `<provider>id` naming rule
//! 4. otherwise the subtree is skipped unvisited

mod common;
mod kinds;
mod nested;

use std::collections::HashMap;

use nfo_core::{DateFormat, ItemKind, MetadataRecord};

use crate::Result;
use crate::cursor::{Element, XmlCursor};
use crate::links::LinkExtractor;
use crate::registry::ProviderRegistry;

/// Per-call state handlers read from. Built fresh for every parse.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub kind: ItemKind,
    pub registry: ProviderRegistry,
    pub dates: DateFormat,
    pub links: LinkExtractor,
}

pub type TextFn = fn(&ParseContext, &mut MetadataRecord, &str);
pub type SubtreeFn =
    fn(&ParseContext, &mut MetadataRecord, &mut XmlCursor<'_>, &Element) -> Result<()>;

#[derive(Clone, Copy)]
pub enum Handler {
    /// Receives the element's trimmed, non-empty text.
    Text(TextFn),
    /// Reads the element itself (attributes or children) and must consume
    /// its end tag.
    Subtree(SubtreeFn),
    /// Text stored as an id of the named provider.
    ProviderId(&'static str),
}

pub type HandlerTable = HashMap<&'static str, Handler>;

/// Handler registered for `tag` (already lower-cased), kind table first.
pub fn lookup(kind: ItemKind, tag: &str) -> Option<Handler> {
    kinds::table(kind)
        .and_then(|t| t.get(tag))
        .or_else(|| common::TABLE.get(tag))
        .copied()
}

/// Run `handler` on `el`, leaving the cursor just past its end tag.
pub fn apply(
    handler: Handler,
    ctx: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    match handler {
        Handler::Text(f) => {
            let text = cursor.read_text(el)?;
            if !text.is_empty() {
                f(ctx, record, &text);
            }
        }
        Handler::Subtree(f) => f(ctx, record, cursor, el)?,
        Handler::ProviderId(provider) => {
            let text = cursor.read_text(el)?;
            record.provider_ids.set(provider, &text);
        }
    }
    Ok(())
}
