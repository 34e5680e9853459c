//! Sidecar parser: one dispatch loop over the root's children, with
//! handlers looked up per tag.

use nfo_core::{ItemKind, MetadataRecord, NfoOptions};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cursor::{Element, XmlCursor};
use crate::handlers::{self, ParseContext};
use crate::links::LinkExtractor;
use crate::registry::ProviderRegistry;
use crate::split::combine_documents;
use crate::{NfoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// The whole input must be well-formed.
    Strict,
    /// Text after the last closing tag is scanned for provider links and
    /// structural errors are swallowed.
    Salvage,
}

impl ParseMode {
    pub fn for_kind(kind: ItemKind) -> Self {
        if kind.supports_salvage() {
            Self::Salvage
        } else {
            Self::Strict
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NfoParser {
    options: NfoOptions,
}

impl NfoParser {
    pub fn new(options: NfoOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NfoOptions {
        &self.options
    }

    /// Parse every document in `input` and fold them into one record.
    pub fn parse(
        &self,
        kind: ItemKind,
        input: &[u8],
        token: &CancellationToken,
    ) -> Result<MetadataRecord> {
        let documents = self.parse_documents(kind, input, token)?;
        combine_documents(documents).ok_or_else(no_root)
    }

    /// One record per root element, using the kind's default mode.
    pub fn parse_documents(
        &self,
        kind: ItemKind,
        input: &[u8],
        token: &CancellationToken,
    ) -> Result<Vec<MetadataRecord>> {
        self.parse_with_mode(kind, ParseMode::for_kind(kind), input, token)
    }

    pub fn parse_with_mode(
        &self,
        kind: ItemKind,
        mode: ParseMode,
        input: &[u8],
        token: &CancellationToken,
    ) -> Result<Vec<MetadataRecord>> {
        let ctx = ParseContext {
            kind,
            registry: ProviderRegistry::from_options(&self.options),
            dates: self.options.date_format()?,
            links: LinkExtractor::for_kind(kind),
        };
        match mode {
            ParseMode::Strict => {
                let mut records = Vec::new();
                read_documents(&ctx, input, MetadataRecord::new(kind), token, &mut records)?;
                if records.is_empty() {
                    return Err(no_root());
                }
                Ok(records)
            }
            ParseMode::Salvage => salvage(&ctx, input, token),
        }
    }
}

fn no_root() -> NfoError {
    NfoError::Malformed("document has no root element".into())
}

/// Parse the well-formed prefix of `input`, taking provider ids from
/// whatever follows the last closing tag.
fn salvage(
    ctx: &ParseContext,
    input: &[u8],
    token: &CancellationToken,
) -> Result<Vec<MetadataRecord>> {
    let text = String::from_utf8_lossy(input);
    let mut seed = MetadataRecord::new(ctx.kind);

    let Some(end) = last_closing_tag_end(&text) else {
        // Not XML at all, typically a pasted URL.
        seed.provider_ids = ctx.links.extract(&text);
        return Ok(vec![seed]);
    };
    seed.provider_ids = ctx.links.extract(&text[end + 1..]);

    let mut records = Vec::new();
    let prefix = text[..=end].as_bytes();
    match read_documents(ctx, prefix, seed.clone(), token, &mut records) {
        Ok(()) => {}
        Err(e) if e.is_structural() => {
            debug!(kind = %ctx.kind, error = %e, "ignoring malformed sidecar content");
        }
        Err(e) => return Err(e),
    }
    if records.is_empty() {
        records.push(seed);
    }
    Ok(records)
}

/// Byte offset of the `>` ending the last `</...>` in `text`.
fn last_closing_tag_end(text: &str) -> Option<usize> {
    let open = text.rfind("</")?;
    text[open..].find('>').map(|off| open + off)
}

/// Read root elements into `records`. The first record starts from
/// `seed`; it is pushed even when its body fails so partial state survives.
fn read_documents(
    ctx: &ParseContext,
    input: &[u8],
    seed: MetadataRecord,
    token: &CancellationToken,
    records: &mut Vec<MetadataRecord>,
) -> Result<()> {
    let mut cursor = XmlCursor::new(input);
    let mut seed = Some(seed);

    while let Some(root) = cursor.next_root()? {
        if token.is_cancelled() {
            return Err(NfoError::Cancelled);
        }
        if !records.is_empty() {
            if !ctx.kind.supports_multiple_documents() {
                break;
            }
            if !root.name.eq_ignore_ascii_case(ctx.kind.root_element()) {
                debug!(element = %root.name, "skipping unexpected root element");
                cursor.skip(&root)?;
                continue;
            }
        }

        let mut record = seed
            .take()
            .unwrap_or_else(|| MetadataRecord::new(ctx.kind));
        let outcome = read_root(ctx, &mut cursor, &root, &mut record, token);
        records.push(record);
        outcome?;
    }
    Ok(())
}

fn read_root(
    ctx: &ParseContext,
    cursor: &mut XmlCursor<'_>,
    root: &Element,
    record: &mut MetadataRecord,
    token: &CancellationToken,
) -> Result<()> {
    while let Some(child) = cursor.next_child(root)? {
        if token.is_cancelled() {
            return Err(NfoError::Cancelled);
        }
        let tag = child.tag();
        if let Some(handler) = handlers::lookup(ctx.kind, &tag) {
            handlers::apply(handler, ctx, record, cursor, &child)?;
        } else if let Some(provider) = ctx.registry.provider_for_tag(&tag) {
            let value = cursor.read_text(&child)?;
            record.provider_ids.set(provider, &value);
        } else {
            cursor.skip(&child)?;
        }
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
