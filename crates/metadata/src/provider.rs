use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use nfo_core::{MetadataRecord, NfoOptions};
use nfo_scanner::{ItemLocation, MetadataFs, find_existing};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::Result;
use crate::parser::NfoParser;
use crate::split::combine_documents;

/// A sidecar found and parsed for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalMetadata {
    pub path: PathBuf,
    /// All documents folded into one record.
    pub record: MetadataRecord,
    /// One record per root element, in file order.
    pub documents: Vec<MetadataRecord>,
}

/// Source of metadata stored next to the media.
#[async_trait::async_trait]
pub trait LocalMetadataSource: Send + Sync {
    /// `Ok(None)` when the item has no sidecar.
    async fn fetch(
        &self,
        location: &ItemLocation,
        token: &CancellationToken,
    ) -> Result<Option<LocalMetadata>>;

    /// Whether the item's sidecar was modified after `since`.
    async fn has_changed(&self, location: &ItemLocation, since: DateTime<Utc>) -> Result<bool>;
}

pub struct NfoProvider<F> {
    fs: F,
    parser: NfoParser,
}

impl<F: MetadataFs> NfoProvider<F> {
    pub fn new(fs: F, options: NfoOptions) -> Self {
        Self {
            fs,
            parser: NfoParser::new(options),
        }
    }

    /// Path of the item's existing sidecar, if any.
    pub async fn locate(&self, location: &ItemLocation) -> Option<PathBuf> {
        let prefer = self.parser.options().prefer_alternate_movie_name;
        let candidates = location.candidates(prefer);
        if candidates.is_empty() {
            debug!(path = %location.path, "no local sidecar candidates");
            return None;
        }
        find_existing(&self.fs, &candidates).await
    }
}

#[async_trait::async_trait]
impl<F: MetadataFs> LocalMetadataSource for NfoProvider<F> {
    async fn fetch(
        &self,
        location: &ItemLocation,
        token: &CancellationToken,
    ) -> Result<Option<LocalMetadata>> {
        let Some(path) = self.locate(location).await else {
            return Ok(None);
        };
        let bytes = match self.fs.read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "sidecar removed before read");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let documents = self
            .parser
            .parse_documents(location.kind, &bytes, token)?;
        let Some(record) = combine_documents(documents.clone()) else {
            return Ok(None);
        };
        debug!(path = %path.display(), documents = documents.len(), "read sidecar");
        Ok(Some(LocalMetadata {
            path,
            record,
            documents,
        }))
    }

    async fn has_changed(&self, location: &ItemLocation, since: DateTime<Utc>) -> Result<bool> {
        let Some(path) = self.locate(location).await else {
            return Ok(false);
        };
        let modified = self.fs.last_write_time(&path).await?;
        Ok(modified > since)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
