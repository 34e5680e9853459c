#![allow(clippy::type_complexity, clippy::collapsible_if)]
//! Reading and writing XML sidecar metadata files.

pub mod cursor;
pub mod handlers;
pub mod links;
pub mod merge;
pub mod parser;
pub mod provider;
pub mod registry;
pub mod saver;
pub mod schema;
pub mod split;
pub mod text;
pub mod writer;

pub use links::LinkExtractor;
pub use parser::{NfoParser, ParseMode};
pub use provider::{LocalMetadata, LocalMetadataSource, NfoProvider};
pub use registry::ProviderRegistry;
pub use saver::NfoSaver;
pub use schema::TagSchema;
pub use writer::NfoWriter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NfoError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("operation cancelled")]
    Cancelled,
    #[error("no local metadata path for {0}")]
    NoLocalPath(String),
    #[error(transparent)]
    Core(#[from] nfo_core::CoreError),
}

impl NfoError {
    /// Errors caused by the document's structure rather than by I/O or
    /// cancellation. Salvage mode swallows these.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Xml(_) | Self::Attribute(_) | Self::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, NfoError>;
