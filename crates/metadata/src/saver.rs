use std::path::PathBuf;

use nfo_core::{MetadataRecord, NfoOptions};
use nfo_scanner::{ItemLocation, MetadataFs};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::writer::NfoWriter;
use crate::{NfoError, Result};

/// Writes records to the item's default sidecar location.
pub struct NfoSaver<F> {
    fs: F,
    options: NfoOptions,
}

impl<F: MetadataFs> NfoSaver<F> {
    pub fn new(fs: F, options: NfoOptions) -> Self {
        Self { fs, options }
    }

    /// Sidecar path a save of `location` targets.
    pub fn save_path(&self, location: &ItemLocation) -> Option<PathBuf> {
        location
            .candidates(self.options.prefer_alternate_movie_name)
            .first()
            .map(|c| c.to_path_buf())
    }

    /// Serialize `record` over the item's sidecar, keeping elements of the
    /// existing file this save does not manage.
    pub async fn save(
        &self,
        record: &MetadataRecord,
        location: &ItemLocation,
        token: &CancellationToken,
    ) -> Result<PathBuf> {
        let path = self
            .save_path(location)
            .ok_or_else(|| NfoError::NoLocalPath(location.path.clone()))?;

        let prior = match self.fs.read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no previous sidecar to merge");
                None
            }
        };

        let bytes = NfoWriter::new(self.options.clone()).write(record, prior.as_deref())?;
        if token.is_cancelled() {
            return Err(NfoError::Cancelled);
        }
        self.fs.write(&path, &bytes).await?;
        info!(path = %path.display(), kind = %record.kind, "saved sidecar");
        Ok(path)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use nfo_core::ItemKind;
    use nfo_scanner::LocalFs;

    #[tokio::test]
    async fn saves_to_first_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("Alien (1979).mkv");
        let location = ItemLocation::new(ItemKind::Movie, media.to_string_lossy());
        let mut record = MetadataRecord::new(ItemKind::Movie);
        record.title = Some("Alien".into());

        let saver = NfoSaver::new(LocalFs, NfoOptions::default());
        let path = saver
            .save(&record, &location, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "Alien (1979).nfo");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<title>Alien</title>"));
    }

    #[tokio::test]
    async fn remote_item_has_no_local_path() {
        let location = ItemLocation::new(ItemKind::Movie, "http://example.com/a.mkv");
        let saver = NfoSaver::new(LocalFs, NfoOptions::default());
        let err = saver
            .save(
                &MetadataRecord::new(ItemKind::Movie),
                &location,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, NfoError::NoLocalPath(_)));
    }

    #[tokio::test]
    async fn cancelled_save_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let location = ItemLocation::new(ItemKind::Series, dir.path().to_string_lossy());
        let token = CancellationToken::new();
        token.cancel();

        let saver = NfoSaver::new(LocalFs, NfoOptions::default());
        let err = saver
            .save(&MetadataRecord::new(ItemKind::Series), &location, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, NfoError::Cancelled));
        assert!(!dir.path().join("tvshow.nfo").exists());
    }
}
